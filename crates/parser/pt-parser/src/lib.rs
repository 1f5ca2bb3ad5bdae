//! Parser infrastructure for Petrel
//!
//! This crate runs the tree-sitter Python grammar and turns the error and
//! missing nodes it recovers into diagnostics.

pub mod error;

pub use error::ParseError;

use lang_python::PythonLanguage;
use miette::{NamedSource, SourceSpan};
use pt_syntax::Language as _;
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Result of parsing a source file
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Concrete syntax tree, present whenever the grammar ran
    pub tree: Option<Tree>,
    /// Parse errors with detailed diagnostics
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Whether the source parsed without any syntax error
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.tree.is_some() && self.errors.is_empty()
    }
}

/// Parse source code using the Python grammar adapter
#[must_use]
pub fn parse_source(source: &str) -> ParseResult {
    let language = PythonLanguage::new();

    match language.parse(source) {
        Ok(tree) => {
            let mut errors = Vec::new();

            if tree.root_node().has_error() {
                collect_errors(&tree.root_node(), source, &mut errors);
            }
            debug!(bytes = source.len(), errors = errors.len(), "parsed source");

            ParseResult {
                tree: Some(tree),
                errors,
            }
        }
        Err(err) => ParseResult {
            tree: None,
            errors: vec![ParseError::GrammarUnavailable {
                reason: err.to_string(),
            }],
        },
    }
}

fn named_source(source: &str) -> NamedSource<String> {
    NamedSource::new("<input>", source.to_string())
}

fn node_span(node: &Node<'_>) -> SourceSpan {
    (node.start_byte(), node.end_byte() - node.start_byte()).into()
}

/// Walk the tree depth-first, turning `ERROR` and `MISSING` nodes into errors
fn collect_errors(node: &Node<'_>, source: &str, errors: &mut Vec<ParseError>) {
    if node.is_error() {
        errors.push(error_node(node, source));
    } else if node.is_missing() {
        errors.push(missing_node(node, source));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(&child, source, errors);
    }
}

/// Classify an `ERROR` node by the construct it interrupted
fn error_node(node: &Node<'_>, source: &str) -> ParseError {
    let span = node_span(node);
    let parent = node.parent();

    match parent.as_ref().map(Node::kind) {
        Some("argument_list" | "parenthesized_expression") => {
            match parent.and_then(|open| opening_paren(&open, source)) {
                Some(opening) => ParseError::UnclosedParen {
                    expected_close: span,
                    opening: (opening, 1).into(),
                    src: named_source(source),
                },
                None => invalid_input(node, source, span),
            }
        }
        Some("assignment") => ParseError::InvalidAssignment {
            span,
            src: named_source(source),
        },
        Some("binary_operator") => ParseError::IncompleteOperation {
            span,
            src: named_source(source),
        },
        _ => invalid_input(node, source, span),
    }
}

/// A token the grammar inserted; a missing `)` is reported against its `(`
fn missing_node(node: &Node<'_>, source: &str) -> ParseError {
    let position = node.start_byte();
    let expected = node.kind();

    let opening = node
        .parent()
        .filter(|_| expected == ")")
        .and_then(|parent| opening_paren(&parent, source));
    if let Some(opening) = opening {
        return ParseError::UnclosedParen {
            expected_close: (position, 1).into(),
            opening: (opening, 1).into(),
            src: named_source(source),
        };
    }

    let found = source
        .get(position..)
        .and_then(|rest| rest.split_whitespace().next())
        .map_or_else(
            || "end of file".to_string(),
            |word| format!("`{}`", word.chars().take(10).collect::<String>()),
        );
    ParseError::MissingToken {
        expected: expected.to_string(),
        found,
        span: (position, 1).into(),
        src: named_source(source),
    }
}

fn invalid_input(node: &Node<'_>, source: &str, span: SourceSpan) -> ParseError {
    let text = source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default();
    ParseError::InvalidInput {
        token: text.lines().next().unwrap_or(text).to_string(),
        span,
        src: named_source(source),
    }
}

/// Byte offset of the first `(` inside `node`
fn opening_paren(node: &Node<'_>, source: &str) -> Option<usize> {
    let start = node.start_byte();
    let text = source.get(start..node.end_byte())?;

    text.find('(').map(|offset| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::files::SimpleFiles;
    use codespan_reporting::term;

    #[test]
    fn test_parse_success() {
        let result = parse_source("x = 1\nprint(x + 2)\n");

        assert!(result.errors.is_empty());
        assert!(result.tree.is_some());
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_with_syntax_error() {
        let result = parse_source("print(1 +\n");

        assert!(!result.errors.is_empty());
        assert!(!result.is_ok());
        let error_msg = format!("{}", result.errors[0]);
        assert!(
            error_msg.contains("never closed")
                || error_msg.contains("expected")
                || error_msg.contains("invalid")
                || error_msg.contains("incomplete"),
            "error should describe the problem: {error_msg}"
        );
    }

    #[test]
    fn test_error_renders_with_source_context() {
        let source = "x = (1 +\ny = 2\n";
        let result = parse_source(source);

        assert!(!result.errors.is_empty());

        let mut files = SimpleFiles::new();
        let file_id = files.add("<input>", source);
        let diagnostic = result.errors[0].to_codespan_diagnostic(file_id);

        let mut buffer = Vec::new();
        #[allow(deprecated, reason = "the writer-based emit is the one that renders into a buffer")]
        term::emit(&mut buffer, &term::Config::default(), &files, &diagnostic).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("error"), "{output}");
        assert!(output.contains("<input>"), "{output}");
    }

    #[test]
    fn test_opening_paren() {
        let source = "print(1";
        let result = parse_source(source);
        let tree = result.tree.expect("tree");
        assert_eq!(opening_paren(&tree.root_node(), source), Some(5));
    }
}
