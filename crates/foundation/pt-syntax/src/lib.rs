//! Generic syntax tree types and the cursor contract used by lowering
//!
//! A grammar adapter classifies its node kinds into [`SyntaxKind`] and hands
//! out a [`SyntaxCursor`]. The same contract is implemented by [`NodeCursor`]
//! over an owned [`SyntaxNode`] tree, which is what tests build by hand.

mod cursor;

pub use cursor::{NodeCursor, SyntaxCursor};

use anyhow::Result;
use pt_span::Span;
use std::fmt;

/// Node kinds the lowering core distinguishes
///
/// Every grammar kind outside this set is carried verbatim in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Root of a source file
    Module,
    /// Statement wrapping a single expression or assignment
    ExpressionStatement,
    /// `name = value`
    Assignment,
    /// Integer literal
    Integer,
    /// Floating point literal
    Float,
    /// Identifier
    Identifier,
    /// Binary operation
    BinaryOperator,
    /// Call expression
    Call,
    /// Parenthesised call arguments
    ArgumentList,
    /// Comment
    Comment,
    /// Region the grammar could not parse
    Error,
    /// `=` token
    Equals,
    /// `+` token
    Plus,
    /// `-` token
    Minus,
    /// `*` token
    Star,
    /// `/` token
    Slash,
    /// `(` token
    LParen,
    /// `)` token
    RParen,
    /// `,` token
    Comma,
    /// `;` token
    Semicolon,
    /// Any other grammar kind
    Unknown(&'static str),
}

impl SyntaxKind {
    /// Grammar extras that carry no structure
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Grammar name of this kind
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::ExpressionStatement => "expression_statement",
            Self::Assignment => "assignment",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Identifier => "identifier",
            Self::BinaryOperator => "binary_operator",
            Self::Call => "call",
            Self::ArgumentList => "argument_list",
            Self::Comment => "comment",
            Self::Error => "ERROR",
            Self::Equals => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Owned, immutable syntax tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// The kind of this node
    pub kind: SyntaxKind,
    /// Source location
    pub span: Span,
    /// Child nodes in source order
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Creates an interior node
    #[must_use]
    pub const fn new(kind: SyntaxKind, span: Span, children: Vec<Self>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    /// Creates a node without children
    #[must_use]
    pub const fn leaf(kind: SyntaxKind, span: Span) -> Self {
        Self::new(kind, span, Vec::new())
    }

    /// Cursor positioned at this node
    #[must_use]
    pub fn cursor(&self) -> NodeCursor<'_> {
        NodeCursor::new(self)
    }
}

/// Trait for language-specific grammar adapters
pub trait Language: Send + Sync + 'static {
    /// Name of the language
    fn name(&self) -> &'static str;

    /// File extensions this language handles
    fn extensions(&self) -> &[&'static str];

    /// tree-sitter language instance
    fn tree_sitter_language(&self) -> tree_sitter::Language;

    /// Parse source code to concrete syntax tree
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or parsing is aborted
    fn parse(&self, source: &str) -> Result<tree_sitter::Tree>;

    /// Map a grammar kind name onto [`SyntaxKind`]
    fn classify(&self, kind: &'static str) -> SyntaxKind;

    /// Convert a tree-sitter node and its descendants to an owned tree
    fn lower_node(&self, node: &tree_sitter::Node<'_>) -> SyntaxNode {
        let mut cursor = node.walk();
        let children = node
            .children(&mut cursor)
            .map(|child| self.lower_node(&child))
            .collect();

        SyntaxNode::new(
            self.classify(node.kind()),
            Span::from_offsets(node.start_byte(), node.end_byte()),
            children,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_uses_grammar_names() {
        assert_eq!(SyntaxKind::ExpressionStatement.to_string(), "expression_statement");
        assert_eq!(SyntaxKind::Plus.to_string(), "+");
        assert_eq!(SyntaxKind::Unknown("while_statement").to_string(), "while_statement");
    }

    #[test]
    fn test_only_comments_are_trivia() {
        assert!(SyntaxKind::Comment.is_trivia());
        assert!(!SyntaxKind::Identifier.is_trivia());
        assert!(!SyntaxKind::Error.is_trivia());
    }
}
