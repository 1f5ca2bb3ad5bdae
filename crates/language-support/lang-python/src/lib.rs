//! Python grammar adapter
//!
//! Wraps `tree-sitter-python` behind the generic [`Language`] trait and
//! exposes its tree cursor through [`SyntaxCursor`].

use anyhow::Result;
use pt_span::Span;
use pt_syntax::{Language, SyntaxCursor, SyntaxKind};
use tree_sitter::{Parser, Tree, TreeCursor};

/// Python language implementation
pub struct PythonLanguage;

impl PythonLanguage {
    /// Creates a new Python language adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PythonLanguage {
    fn default() -> Self {
        Self::new()
    }
}

impl Language for PythonLanguage {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &[&'static str] {
        &["py"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(&self.tree_sitter_language())?;

        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("tree-sitter parse failed"))
    }

    fn classify(&self, kind: &'static str) -> SyntaxKind {
        classify(kind)
    }
}

/// Map a tree-sitter-python kind name onto [`SyntaxKind`]
#[must_use]
pub fn classify(kind: &'static str) -> SyntaxKind {
    match kind {
        "module" => SyntaxKind::Module,
        "expression_statement" => SyntaxKind::ExpressionStatement,
        "assignment" => SyntaxKind::Assignment,
        "integer" => SyntaxKind::Integer,
        "float" => SyntaxKind::Float,
        "identifier" => SyntaxKind::Identifier,
        "binary_operator" => SyntaxKind::BinaryOperator,
        "call" => SyntaxKind::Call,
        "argument_list" => SyntaxKind::ArgumentList,
        "comment" => SyntaxKind::Comment,
        "ERROR" => SyntaxKind::Error,
        "=" => SyntaxKind::Equals,
        "+" => SyntaxKind::Plus,
        "-" => SyntaxKind::Minus,
        "*" => SyntaxKind::Star,
        "/" => SyntaxKind::Slash,
        "(" => SyntaxKind::LParen,
        ")" => SyntaxKind::RParen,
        "," => SyntaxKind::Comma,
        ";" => SyntaxKind::Semicolon,
        other => SyntaxKind::Unknown(other),
    }
}

/// [`SyntaxCursor`] over a tree-sitter-python tree
pub struct PythonCursor<'tree> {
    inner: TreeCursor<'tree>,
}

impl<'tree> PythonCursor<'tree> {
    /// Creates a cursor positioned at the root of `tree`
    #[must_use]
    pub fn new(tree: &'tree Tree) -> Self {
        Self { inner: tree.walk() }
    }

    /// Wraps an existing tree-sitter cursor
    #[must_use]
    pub const fn from_tree_cursor(inner: TreeCursor<'tree>) -> Self {
        Self { inner }
    }
}

impl SyntaxCursor for PythonCursor<'_> {
    fn kind(&self) -> SyntaxKind {
        classify(self.inner.node().kind())
    }

    fn span(&self) -> Span {
        let node = self.inner.node();
        Span::from_offsets(node.start_byte(), node.end_byte())
    }

    fn goto_first_child(&mut self) -> bool {
        self.inner.goto_first_child()
    }

    fn goto_next_sibling(&mut self) -> bool {
        self.inner.goto_next_sibling()
    }

    fn goto_parent(&mut self) -> bool {
        self.inner.goto_parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Tree {
        PythonLanguage::new().parse(source).expect("grammar loads")
    }

    #[test]
    fn test_assignment_is_wrapped_in_expression_statement() {
        let tree = parse("x = 1\n");
        let mut cursor = PythonCursor::new(&tree);

        assert_eq!(cursor.kind(), SyntaxKind::Module);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::ExpressionStatement);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::Assignment);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::Identifier);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::Equals);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::Integer);
        assert_eq!(cursor.span(), Span::new(4, 5));
    }

    #[test]
    fn test_call_shape() {
        let tree = parse("print(1 + 2)\n");
        let mut cursor = PythonCursor::new(&tree);

        assert!(cursor.goto_first_child());
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::Call);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::Identifier);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::ArgumentList);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::LParen);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::BinaryOperator);
    }

    #[test]
    fn test_lower_node_matches_cursor_view() {
        let language = PythonLanguage::new();
        let source = "a + 1.5\n";
        let tree = parse(source);
        let root = language.lower_node(&tree.root_node());

        assert_eq!(root.kind, SyntaxKind::Module);
        let statement = &root.children[0];
        assert_eq!(statement.kind, SyntaxKind::ExpressionStatement);
        let binary = &statement.children[0];
        assert_eq!(binary.kind, SyntaxKind::BinaryOperator);
        let kinds: Vec<_> = binary.children.iter().map(|child| child.kind).collect();
        assert_eq!(
            kinds,
            [SyntaxKind::Identifier, SyntaxKind::Plus, SyntaxKind::Float]
        );
    }

    #[test]
    fn test_unlisted_kinds_are_carried_by_name() {
        assert_eq!(classify("while_statement"), SyntaxKind::Unknown("while_statement"));
        assert_eq!(classify("ERROR"), SyntaxKind::Error);
    }
}
