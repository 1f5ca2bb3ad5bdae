//! Cursor-driven CST → AST lowering
//!
//! Every descent goes through [`Lowerer::with_children`], which ascends again
//! before returning, so each lowering call leaves the cursor on the node it
//! started from, on success and on error.

use crate::error::{source_span, LoweringError};
use pt_ast::{BinaryOp, Expr, Program, Stmt};
use pt_span::Span;
use pt_syntax::{SyntaxCursor, SyntaxKind};
use std::result;
use tracing::trace;

type Result<Lowered> = result::Result<Lowered, LoweringError>;

/// Builtins callable as statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Print,
    Globals,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "globals" => Some(Self::Globals),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Globals => "globals",
        }
    }

    const fn arity(self) -> usize {
        match self {
            Self::Print => 1,
            Self::Globals => 0,
        }
    }
}

/// Lowering state for one pass over one tree
pub(crate) struct Lowerer<'src, Cursor> {
    cursor: Cursor,
    source: &'src str,
}

impl<'src, Cursor: SyntaxCursor> Lowerer<'src, Cursor> {
    pub(crate) const fn new(cursor: Cursor, source: &'src str) -> Self {
        Self { cursor, source }
    }

    /// Lower the module under the cursor
    pub(crate) fn lower_program(&mut self) -> Result<Program> {
        match self.cursor.kind() {
            SyntaxKind::Module => {}
            _ => return Err(self.unsupported("program")),
        }

        let mut stmts = Vec::new();
        self.for_each_child(|this| {
            match this.cursor.kind() {
                SyntaxKind::Semicolon => {}
                _ => stmts.push(this.lower_stmt()?),
            }
            Ok(())
        })?;
        Ok(Program::new(stmts))
    }

    /// Lower the statement under the cursor
    pub(crate) fn lower_stmt(&mut self) -> Result<Stmt> {
        trace!(kind = %self.cursor.kind(), "lowering statement");

        match self.cursor.kind() {
            SyntaxKind::Assignment => self.lower_assignment(),
            SyntaxKind::ExpressionStatement => {
                self.with_children("expression", |this| {
                    let stmt = this.lower_statement_body()?;
                    this.expect_end("statement")?;
                    Ok(stmt)
                })
            }
            SyntaxKind::Module
            | SyntaxKind::Integer
            | SyntaxKind::Float
            | SyntaxKind::Identifier
            | SyntaxKind::BinaryOperator
            | SyntaxKind::Call
            | SyntaxKind::ArgumentList
            | SyntaxKind::Comment
            | SyntaxKind::Error
            | SyntaxKind::Equals
            | SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Star
            | SyntaxKind::Slash
            | SyntaxKind::LParen
            | SyntaxKind::RParen
            | SyntaxKind::Comma
            | SyntaxKind::Semicolon
            | SyntaxKind::Unknown(_) => Err(self.unsupported("statement")),
        }
    }

    /// Lower the single child of an expression statement
    fn lower_statement_body(&mut self) -> Result<Stmt> {
        match self.cursor.kind() {
            SyntaxKind::Assignment => self.lower_assignment(),
            SyntaxKind::Call => self.lower_call(),
            _ => Ok(Stmt::Expr {
                expr: self.lower_expr()?,
            }),
        }
    }

    fn lower_assignment(&mut self) -> Result<Stmt> {
        self.with_children("assignment target", |this| {
            if this.cursor.kind() != SyntaxKind::Identifier {
                return Err(LoweringError::InvalidTarget {
                    text: this.text().to_string(),
                    span: source_span(this.cursor.span()),
                });
            }
            let name = this.text().to_string();

            this.advance("`=`")?;
            if this.cursor.kind() != SyntaxKind::Equals {
                return Err(this.unsupported("assignment"));
            }

            this.advance("assigned value")?;
            let value = this.lower_expr()?;
            this.expect_end("assignment")?;

            Ok(Stmt::Assign { name, value })
        })
    }

    fn lower_call(&mut self) -> Result<Stmt> {
        self.with_children("callee", |this| {
            let builtin = match this.cursor.kind() {
                SyntaxKind::Identifier => Builtin::from_name(this.text()),
                _ => None,
            };
            let Some(builtin) = builtin else {
                return Err(LoweringError::UnsupportedCall {
                    text: this.text().to_string(),
                    span: source_span(this.cursor.span()),
                });
            };

            this.advance("argument list")?;
            if this.cursor.kind() != SyntaxKind::ArgumentList {
                return Err(this.unsupported("argument list"));
            }
            let mut arguments = this.lower_arguments()?;
            if arguments.len() != builtin.arity() {
                return Err(LoweringError::ArgumentCount {
                    callee: builtin.name(),
                    expected: builtin.arity(),
                    found: arguments.len(),
                    text: this.text().to_string(),
                    span: source_span(this.cursor.span()),
                });
            }
            this.expect_end("call")?;

            Ok(match builtin {
                Builtin::Globals => Stmt::Globals,
                Builtin::Print => Stmt::Print {
                    argument: arguments.remove(0),
                },
            })
        })
    }

    fn lower_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut arguments = Vec::new();
        self.for_each_child(|this| {
            match this.cursor.kind() {
                SyntaxKind::LParen | SyntaxKind::RParen | SyntaxKind::Comma => {}
                _ => arguments.push(this.lower_expr()?),
            }
            Ok(())
        })?;
        Ok(arguments)
    }

    /// Lower the expression under the cursor
    pub(crate) fn lower_expr(&mut self) -> Result<Expr> {
        trace!(kind = %self.cursor.kind(), "lowering expression");

        match self.cursor.kind() {
            SyntaxKind::Integer | SyntaxKind::Float => {
                let text = self.text();
                parse_number(self.cursor.kind(), text)
                    .map(Expr::number)
                    .ok_or_else(|| LoweringError::InvalidNumber {
                        text: text.to_string(),
                        span: source_span(self.cursor.span()),
                    })
            }
            SyntaxKind::Identifier => Ok(Expr::identifier(self.text())),
            SyntaxKind::BinaryOperator => self.lower_binary(),
            SyntaxKind::Module
            | SyntaxKind::ExpressionStatement
            | SyntaxKind::Assignment
            | SyntaxKind::Call
            | SyntaxKind::ArgumentList
            | SyntaxKind::Comment
            | SyntaxKind::Error
            | SyntaxKind::Equals
            | SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Star
            | SyntaxKind::Slash
            | SyntaxKind::LParen
            | SyntaxKind::RParen
            | SyntaxKind::Comma
            | SyntaxKind::Semicolon
            | SyntaxKind::Unknown(_) => Err(self.unsupported("expression")),
        }
    }

    fn lower_binary(&mut self) -> Result<Expr> {
        self.with_children("left operand", |this| {
            let left = this.lower_expr()?;

            this.advance("operator")?;
            let op = match this.cursor.kind() {
                SyntaxKind::Plus => BinaryOp::Add,
                _ => {
                    return Err(LoweringError::UnsupportedOperator {
                        text: this.text().to_string(),
                        span: source_span(this.cursor.span()),
                    })
                }
            };

            this.advance("right operand")?;
            let right = this.lower_expr()?;
            this.expect_end("binary expression")?;

            Ok(Expr::binary(op, left, right))
        })
    }

    // Navigation

    /// Run `lower` on the first non-trivia child, then return to the current node
    fn with_children<Lowered>(
        &mut self,
        expected: &'static str,
        lower: impl FnOnce(&mut Self) -> Result<Lowered>,
    ) -> Result<Lowered> {
        let parent = self.cursor.span();
        if !self.cursor.goto_first_child() {
            return Err(self.missing(expected, parent));
        }

        let result = if self.skip_trivia() {
            lower(self)
        } else {
            Err(self.missing(expected, parent))
        };
        self.cursor.goto_parent();
        result
    }

    /// Run `visit` on every non-trivia child, then return to the current node
    fn for_each_child(&mut self, mut visit: impl FnMut(&mut Self) -> Result<()>) -> Result<()> {
        if !self.cursor.goto_first_child() {
            return Ok(());
        }

        let result = loop {
            if !self.cursor.kind().is_trivia() {
                if let Err(err) = visit(self) {
                    break Err(err);
                }
            }
            if !self.cursor.goto_next_sibling() {
                break Ok(());
            }
        };
        self.cursor.goto_parent();
        result
    }

    /// Move forward past trivia; false when only trivia remained
    fn skip_trivia(&mut self) -> bool {
        while self.cursor.kind().is_trivia() {
            if !self.cursor.goto_next_sibling() {
                return false;
            }
        }
        true
    }

    /// Move to the next non-trivia sibling
    fn advance(&mut self, expected: &'static str) -> Result<()> {
        let from = self.cursor.span();
        if self.cursor.goto_next_sibling() && self.skip_trivia() {
            Ok(())
        } else {
            Err(self.missing(expected, from))
        }
    }

    /// Fail if a non-trivia sibling follows the current node
    fn expect_end(&mut self, construct: &'static str) -> Result<()> {
        while self.cursor.goto_next_sibling() {
            if !self.cursor.kind().is_trivia() {
                return Err(self.unsupported(construct));
            }
        }
        Ok(())
    }

    // Errors

    fn text(&self) -> &'src str {
        self.cursor.span().slice(self.source)
    }

    fn unsupported(&self, construct: &'static str) -> LoweringError {
        LoweringError::UnsupportedNode {
            construct,
            kind: self.cursor.kind(),
            text: self.text().to_string(),
            span: source_span(self.cursor.span()),
        }
    }

    fn missing(&self, expected: &'static str, near: Span) -> LoweringError {
        LoweringError::MissingNode {
            expected,
            text: near.slice(self.source).to_string(),
            span: source_span(near),
        }
    }
}

/// Parse literal text the way Python reads numbers, rounded to the nearest `f64`
///
/// Floats too large for `f64` become infinite.
fn parse_number(kind: SyntaxKind, text: &str) -> Option<f64> {
    let digits = text.replace('_', "").to_ascii_lowercase();

    if kind == SyntaxKind::Integer {
        for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if let Some(rest) = digits.strip_prefix(prefix) {
                return parse_radix(rest, radix);
            }
        }
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
    }

    digits.parse().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() || !digits.chars().all(|digit| digit.is_digit(radix)) {
        return None;
    }

    match u128::from_str_radix(digits, radix) {
        Ok(value) => Some(value as f64),
        // Wider than 128 bits
        Err(_) => digits.chars().try_fold(0.0_f64, |value, digit| {
            digit
                .to_digit(radix)
                .map(|place| value.mul_add(f64::from(radix), f64::from(place)))
        }),
    }
}
