//! CST → AST lowering
//!
//! Walks a concrete syntax tree through a [`SyntaxCursor`] and produces the
//! minimal [`Program`] consumed by later stages. Lowering is fail-fast: the
//! first unsupported or malformed node aborts the pass with a
//! [`LoweringError`] and no partial AST is returned.

pub mod error;
mod lower;

pub use error::LoweringError;

use lower::Lowerer;
use pt_ast::{Expr, Program, Stmt};
use pt_syntax::{SyntaxCursor, SyntaxNode};
use tracing::debug;

/// Lower the module under `cursor` to a program
///
/// # Errors
///
/// Returns the first node that is not part of the supported language or
/// does not have the expected shape.
pub fn lower_program<Cursor: SyntaxCursor>(cursor: Cursor, source: &str) -> Result<Program, LoweringError> {
    let program = Lowerer::new(cursor, source).lower_program();
    match &program {
        Ok(program) => debug!(statements = program.len(), "lowered program"),
        Err(err) => debug!(error = %err, "lowering failed"),
    }
    program
}

/// Lower the statement under `cursor`, leaving the cursor where it was
///
/// # Errors
///
/// Returns an error if the statement is unsupported or malformed.
pub fn lower_stmt<Cursor: SyntaxCursor>(cursor: &mut Cursor, source: &str) -> Result<Stmt, LoweringError> {
    Lowerer::new(cursor, source).lower_stmt()
}

/// Lower the expression under `cursor`, leaving the cursor where it was
///
/// # Errors
///
/// Returns an error if the expression is unsupported or malformed.
pub fn lower_expr<Cursor: SyntaxCursor>(cursor: &mut Cursor, source: &str) -> Result<Expr, LoweringError> {
    Lowerer::new(cursor, source).lower_expr()
}

/// Lower an owned syntax tree
///
/// # Errors
///
/// See [`lower_program`].
pub fn lower_syntax_tree(root: &SyntaxNode, source: &str) -> Result<Program, LoweringError> {
    lower_program(root.cursor(), source)
}
