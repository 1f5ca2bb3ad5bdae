//! Lowering errors

#![allow(
    unused_assignments,
    reason = "miette's derive reads the variant fields the compiler reports as unread"
)]

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use miette::{Diagnostic, SourceSpan};
use pt_span::Span;
use pt_syntax::SyntaxKind;
use thiserror::Error;

/// A syntax node that is outside the supported language or has an unexpected shape
///
/// Every variant carries the offending byte range and the source text it covers.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LoweringError {
    /// Node kind that has no AST counterpart at this position
    #[error("cannot lower `{kind}` as {construct}: `{text}`")]
    #[diagnostic(code(lower::unsupported_node))]
    UnsupportedNode {
        /// What the node was expected to be ("expression", "statement", ...)
        construct: &'static str,
        /// Kind that was found
        kind: SyntaxKind,
        /// Offending source text
        text: String,
        /// Offending location
        #[label("unsupported {construct}")]
        span: SourceSpan,
    },

    /// A child or sibling the construct requires is absent
    #[error("expected {expected} near `{text}`")]
    #[diagnostic(code(lower::missing_node))]
    MissingNode {
        /// Description of the absent node
        expected: &'static str,
        /// Source text of the node the search started from
        text: String,
        /// Location of the node the search started from
        #[label("{expected} missing here")]
        span: SourceSpan,
    },

    /// Binary operator other than `+`
    #[error("unsupported operator `{text}`")]
    #[diagnostic(code(lower::unsupported_operator), help("only `+` is supported"))]
    UnsupportedOperator {
        /// Operator token
        text: String,
        /// Operator location
        #[label("unsupported operator")]
        span: SourceSpan,
    },

    /// Call to anything but a builtin
    #[error("unsupported call to `{text}`")]
    #[diagnostic(
        code(lower::unsupported_call),
        help("only `print` and `globals` can be called")
    )]
    UnsupportedCall {
        /// Callee text
        text: String,
        /// Callee location
        #[label("not a builtin")]
        span: SourceSpan,
    },

    /// Builtin called with the wrong number of arguments
    #[error("`{callee}` takes {expected} argument(s) but {found} were given")]
    #[diagnostic(code(lower::argument_count))]
    ArgumentCount {
        /// Builtin name
        callee: &'static str,
        /// Arguments the builtin takes
        expected: usize,
        /// Arguments supplied
        found: usize,
        /// Source text of the argument list
        text: String,
        /// Argument list location
        #[label("expected {expected} argument(s)")]
        span: SourceSpan,
    },

    /// Assignment target that is not a single name
    #[error("cannot assign to `{text}`")]
    #[diagnostic(
        code(lower::invalid_target),
        help("assignment targets must be a single variable name")
    )]
    InvalidTarget {
        /// Target text
        text: String,
        /// Target location
        #[label("invalid assignment target")]
        span: SourceSpan,
    },

    /// Numeric literal that does not denote a number
    #[error("invalid number literal `{text}`")]
    #[diagnostic(code(lower::invalid_number))]
    InvalidNumber {
        /// Literal text
        text: String,
        /// Literal location
        #[label("not a number")]
        span: SourceSpan,
    },
}

impl LoweringError {
    /// Byte range of the offending node
    #[must_use]
    pub fn span(&self) -> Span {
        let span = match self {
            Self::UnsupportedNode { span, .. }
            | Self::MissingNode { span, .. }
            | Self::UnsupportedOperator { span, .. }
            | Self::UnsupportedCall { span, .. }
            | Self::ArgumentCount { span, .. }
            | Self::InvalidTarget { span, .. }
            | Self::InvalidNumber { span, .. } => span,
        };
        Span::from_offsets(span.offset(), span.offset() + span.len())
    }

    /// Source text of the offending node
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::UnsupportedNode { text, .. }
            | Self::MissingNode { text, .. }
            | Self::UnsupportedOperator { text, .. }
            | Self::UnsupportedCall { text, .. }
            | Self::ArgumentCount { text, .. }
            | Self::InvalidTarget { text, .. }
            | Self::InvalidNumber { text, .. } => text,
        }
    }

    /// Convert to codespan diagnostic for rustc-style output
    #[must_use]
    pub fn to_codespan_diagnostic<FileId: Copy>(&self, file_id: FileId) -> CodespanDiagnostic<FileId> {
        let labels = Diagnostic::labels(self)
            .into_iter()
            .flatten()
            .map(|labeled| {
                let start = labeled.offset();
                let label = Label::primary(file_id, start..start + labeled.len());
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
}

/// Convert a span into miette's offset/length form
pub(crate) fn source_span(span: Span) -> SourceSpan {
    (span.start as usize, span.len() as usize).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_and_text_round_trip() {
        let err = LoweringError::UnsupportedOperator {
            text: "-".to_string(),
            span: source_span(Span::new(8, 9)),
        };

        assert_eq!(err.span(), Span::new(8, 9));
        assert_eq!(err.text(), "-");
        assert_eq!(err.to_string(), "unsupported operator `-`");
    }

    #[test]
    fn test_codespan_diagnostic_carries_code_label_and_help() {
        let err = LoweringError::UnsupportedCall {
            text: "input".to_string(),
            span: source_span(Span::new(0, 5)),
        };

        let diagnostic = err.to_codespan_diagnostic(());
        assert_eq!(diagnostic.message, "unsupported call to `input`");
        assert_eq!(diagnostic.code.as_deref(), Some("lower::unsupported_call"));
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 0..5);
        assert_eq!(diagnostic.labels[0].message, "not a builtin");
        assert_eq!(diagnostic.notes, ["only `print` and `globals` can be called"]);
    }

    #[test]
    fn test_unsupported_node_message_names_kind() {
        let err = LoweringError::UnsupportedNode {
            construct: "statement",
            kind: SyntaxKind::Unknown("while_statement"),
            text: "while x: pass".to_string(),
            span: source_span(Span::new(0, 13)),
        };

        assert_eq!(
            err.to_string(),
            "cannot lower `while_statement` as statement: `while x: pass`"
        );
    }
}
