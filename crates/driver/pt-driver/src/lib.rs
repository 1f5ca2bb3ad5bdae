//! Lowering driver
//!
//! Runs the grammar over source text, rejects syntax errors, and lowers the
//! resulting tree to a [`Program`]. Each call uses a fresh tree and cursor.

pub mod config;

pub use config::DriverConfig;

use anyhow::{Context, Result};
use codespan_reporting::diagnostic::Diagnostic as CodespanDiagnostic;
use codespan_reporting::files::{Error as FilesError, SimpleFiles};
use codespan_reporting::term::{self, DisplayStyle};
use lang_python::PythonCursor;
use miette::Diagnostic;
use pt_ast::Program;
use pt_ast_lower::LoweringError;
use pt_parser::ParseError;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to turn source text into a program
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    /// The grammar reported syntax errors
    #[error("source contains {} syntax error(s)", .0.len())]
    #[diagnostic(code(driver::syntax))]
    Syntax(#[related] Vec<ParseError>),

    /// The tree contains a construct outside the supported language
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lowering(#[from] LoweringError),
}

/// Parse and lower source text
///
/// # Errors
///
/// Returns [`DriverError::Syntax`] when the grammar reports errors (unless
/// the configuration asks to lower anyway) and [`DriverError::Lowering`]
/// when the tree contains unsupported constructs.
pub fn lower_source(source: &str, config: &DriverConfig) -> Result<Program, DriverError> {
    let parse = pt_parser::parse_source(source);
    let errors: Vec<ParseError> = parse
        .errors
        .into_iter()
        .map(|err| err.with_source(config.file_name.as_str(), source))
        .collect();

    let Some(tree) = parse.tree else {
        return Err(DriverError::Syntax(errors));
    };
    if !errors.is_empty() {
        if !config.lower_despite_syntax_errors {
            debug!(file = %config.file_name, errors = errors.len(), "rejecting source with syntax errors");
            return Err(DriverError::Syntax(errors));
        }
        warn!(file = %config.file_name, errors = errors.len(), "lowering despite syntax errors");
    }

    let program = pt_ast_lower::lower_program(PythonCursor::new(&tree), source)?;
    debug!(file = %config.file_name, statements = program.len(), "lowered source");
    Ok(program)
}

/// Read and lower a source file
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not lower.
pub fn lower_file(path: impl AsRef<Path>, config: &DriverConfig) -> Result<Program> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let config = config.clone().with_file_name(path.display().to_string());
    lower_source(&source, &config).with_context(|| format!("failed to lower {}", path.display()))
}

/// Codespan diagnostics for a driver error
#[must_use]
pub fn to_codespan_diagnostics<FileId: Copy>(
    error: &DriverError,
    file_id: FileId,
) -> Vec<CodespanDiagnostic<FileId>> {
    match error {
        DriverError::Syntax(errors) => errors
            .iter()
            .map(|err| err.to_codespan_diagnostic(file_id))
            .collect(),
        DriverError::Lowering(err) => vec![err.to_codespan_diagnostic(file_id)],
    }
}

/// Render a driver error as rustc-style text
///
/// # Errors
///
/// Returns an error if a diagnostic points outside `source`.
pub fn render_diagnostics(
    error: &DriverError,
    source: &str,
    config: &DriverConfig,
) -> Result<String, FilesError> {
    let mut files = SimpleFiles::new();
    let file_id = files.add(config.file_name.as_str(), source);

    let term_config = term::Config {
        display_style: if config.short_diagnostics {
            DisplayStyle::Short
        } else {
            DisplayStyle::Rich
        },
        ..term::Config::default()
    };

    let mut buffer = Vec::new();
    for diagnostic in to_codespan_diagnostics(error, file_id) {
        #[allow(deprecated, reason = "the writer-based emit is the one that renders into a buffer")]
        term::emit(&mut buffer, &term_config, &files, &diagnostic)?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_ast::{Expr, Stmt};

    #[test]
    fn test_lower_source() {
        let program = lower_source("x = 1\nprint(x + 2)\n", &DriverConfig::default()).unwrap();

        assert_eq!(
            program.stmts,
            [
                Stmt::Assign {
                    name: "x".to_string(),
                    value: Expr::number(1.0),
                },
                Stmt::Print {
                    argument: Expr::add(Expr::identifier("x"), Expr::number(2.0)),
                },
            ]
        );
    }

    #[test]
    fn test_syntax_errors_are_rejected_by_default() {
        let err = lower_source("x = (1 +\n", &DriverConfig::default()).unwrap_err();
        match &err {
            DriverError::Syntax(errors) => assert!(!errors.is_empty()),
            DriverError::Lowering(other) => panic!("expected syntax error, got {other}"),
        }
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_lowering_despite_syntax_errors_reports_lowering_error() {
        let config = DriverConfig {
            lower_despite_syntax_errors: true,
            ..DriverConfig::default()
        };
        let err = lower_source("x = )\n", &config).unwrap_err();
        assert!(matches!(err, DriverError::Lowering(_)), "{err:?}");
    }

    #[test]
    fn test_render_lowering_error() {
        let source = "while x:\n    x\n";
        let config = DriverConfig::default().with_file_name("loop.py");
        let err = lower_source(source, &config).unwrap_err();

        let rendered = render_diagnostics(&err, source, &config).unwrap();
        assert!(rendered.contains("loop.py"), "{rendered}");
        assert!(rendered.contains("while_statement"), "{rendered}");
        assert!(rendered.contains("lower::unsupported_node"), "{rendered}");
    }

    #[test]
    fn test_short_rendering_is_one_line_per_error() {
        let source = "print(1 - 2)\n";
        let config = DriverConfig {
            short_diagnostics: true,
            ..DriverConfig::default()
        };
        let err = lower_source(source, &config).unwrap_err();

        let rendered = render_diagnostics(&err, source, &config).unwrap();
        assert_eq!(rendered.lines().count(), 1, "{rendered}");
        assert!(rendered.contains("unsupported operator `-`"), "{rendered}");
    }

    #[test]
    fn test_lower_file_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.py");
        fs::write(&path, "x += 1\n").unwrap();

        let err = lower_file(&path, &DriverConfig::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("bad.py"), "{message}");
        assert!(message.contains("augmented_assignment"), "{message}");
    }

    #[test]
    fn test_lower_file_missing() {
        let err = lower_file("/definitely/not/here.py", &DriverConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
