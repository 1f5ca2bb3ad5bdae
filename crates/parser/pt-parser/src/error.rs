//! Syntax errors recovered from the Python grammar
//!
//! tree-sitter never fails outright on bad input; it inserts `MISSING` tokens
//! and wraps what it could not place in `ERROR` nodes. Each of those becomes
//! one [`ParseError`].

#![allow(
    unused_assignments,
    reason = "miette's derive reads the variant fields the compiler reports as unread"
)]

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A syntax error in Python source
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum ParseError {
    /// Input the grammar could not fit into any statement
    #[error("invalid syntax near `{token}`")]
    #[diagnostic(
        code(syntax::invalid_input),
        help("only assignments, `print(...)`, `globals()` and expressions are understood")
    )]
    InvalidInput {
        /// First line of the rejected input
        token: String,
        /// Offending location
        #[label("not valid here")]
        span: SourceSpan,
        /// Source the labels point into
        #[source_code]
        src: NamedSource<String>,
    },

    /// Token the grammar had to invent to keep going
    #[error("expected `{expected}` before {found}")]
    #[diagnostic(code(syntax::missing_token))]
    MissingToken {
        /// Grammar kind of the invented token
        expected: String,
        /// What follows instead
        found: String,
        /// Offending location
        #[label("`{expected}` belongs here")]
        span: SourceSpan,
        /// Source the labels point into
        #[source_code]
        src: NamedSource<String>,
    },

    /// Call or parenthesised group without its `)`
    #[error("`(` was never closed")]
    #[diagnostic(code(syntax::unclosed_paren), help("add `)` to finish the call"))]
    UnclosedParen {
        /// Where the `)` was expected
        #[label("expected `)` here")]
        expected_close: SourceSpan,
        /// The `(` left open
        #[label("opened here")]
        opening: SourceSpan,
        /// Source the labels point into
        #[source_code]
        src: NamedSource<String>,
    },

    /// Assignment with a broken target or value
    #[error("invalid assignment")]
    #[diagnostic(
        code(syntax::invalid_assignment),
        help("Python assignments have the form `name = value`")
    )]
    InvalidAssignment {
        /// Offending location
        #[label("cannot be part of an assignment")]
        span: SourceSpan,
        /// Source the labels point into
        #[source_code]
        src: NamedSource<String>,
    },

    /// Binary operator missing an operand
    #[error("incomplete binary expression")]
    #[diagnostic(
        code(syntax::incomplete_operation),
        help("`+` needs an operand on both sides, as in `a + 1`")
    )]
    IncompleteOperation {
        /// Offending location
        #[label("operand expected")]
        span: SourceSpan,
        /// Source the labels point into
        #[source_code]
        src: NamedSource<String>,
    },

    /// The grammar itself could not be run
    #[error("could not run the Python grammar: {reason}")]
    #[diagnostic(code(syntax::grammar_unavailable))]
    GrammarUnavailable {
        /// Error reported by tree-sitter
        reason: String,
    },
}

impl ParseError {
    /// Convert to codespan diagnostic for rustc-style output
    ///
    /// The first label is primary, later ones are secondary.
    #[must_use]
    pub fn to_codespan_diagnostic<FileId: Copy>(&self, file_id: FileId) -> CodespanDiagnostic<FileId> {
        let labels = Diagnostic::labels(self)
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(index, labeled)| {
                let range = labeled.offset()..labeled.offset() + labeled.len();
                let label = if index == 0 {
                    Label::primary(file_id, range)
                } else {
                    Label::secondary(file_id, range)
                };
                match labeled.label() {
                    Some(message) => label.with_message(message),
                    None => label,
                }
            })
            .collect();

        let mut diagnostic = CodespanDiagnostic::error()
            .with_message(self.to_string())
            .with_labels(labels);
        if let Some(code) = Diagnostic::code(self) {
            diagnostic = diagnostic.with_code(code.to_string());
        }
        if let Some(help) = Diagnostic::help(self) {
            diagnostic = diagnostic.with_notes(vec![help.to_string()]);
        }
        diagnostic
    }

    /// Attach the named source that labels point into
    #[must_use]
    pub fn with_source(mut self, name: impl AsRef<str>, source: impl Into<String>) -> Self {
        match &mut self {
            Self::InvalidInput { src, .. }
            | Self::MissingToken { src, .. }
            | Self::UnclosedParen { src, .. }
            | Self::InvalidAssignment { src, .. }
            | Self::IncompleteOperation { src, .. } => *src = NamedSource::new(name, source.into()),
            Self::GrammarUnavailable { .. } => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::diagnostic::LabelStyle;

    fn input(source: &str) -> NamedSource<String> {
        NamedSource::new("<input>", source.to_string())
    }

    #[test]
    fn test_with_source_renames_file() {
        let err = ParseError::InvalidInput {
            token: "$".to_string(),
            span: (2, 1).into(),
            src: input("x $ 1"),
        };

        match err.with_source("script.py", "x $ 1") {
            ParseError::InvalidInput { src, token, .. } => {
                assert_eq!(src.name(), "script.py");
                assert_eq!(token, "$");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_help_becomes_a_note() {
        let err = ParseError::InvalidAssignment {
            span: (0, 3).into(),
            src: input("1 = x"),
        };

        let diagnostic = err.to_codespan_diagnostic(0usize);
        assert_eq!(diagnostic.message, "invalid assignment");
        assert_eq!(diagnostic.code.as_deref(), Some("syntax::invalid_assignment"));
        assert_eq!(diagnostic.notes, ["Python assignments have the form `name = value`"]);
        assert_eq!(diagnostic.labels[0].range, 0..3);
    }

    #[test]
    fn test_unclosed_paren_points_at_both_ends() {
        let err = ParseError::UnclosedParen {
            expected_close: (7, 1).into(),
            opening: (5, 1).into(),
            src: input("print(1"),
        };

        let diagnostic = err.to_codespan_diagnostic(());
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!(diagnostic.labels[0].style, LabelStyle::Primary);
        assert_eq!(diagnostic.labels[0].range, 7..8);
        assert_eq!(diagnostic.labels[1].style, LabelStyle::Secondary);
        assert_eq!(diagnostic.labels[1].message, "opened here");
    }

    #[test]
    fn test_grammar_failure_has_no_labels() {
        let err = ParseError::GrammarUnavailable {
            reason: "incompatible language version".to_string(),
        };

        let diagnostic = err.to_codespan_diagnostic(());
        assert!(diagnostic.labels.is_empty());
        assert_eq!(
            diagnostic.message,
            "could not run the Python grammar: incompatible language version"
        );
    }
}
