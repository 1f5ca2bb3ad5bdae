//! Abstract syntax tree handed to interpreters and code generators
//!
//! The tree is a plain value: every node owns its children and no node
//! records a source position.

use serde::{Deserialize, Serialize};
use std::{fmt, slice, vec};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Numeric literal
    Number {
        /// Literal value
        value: f64,
    },
    /// Variable reference
    Identifier {
        /// Variable name
        name: String,
    },
    /// Binary operation
    BinaryOp {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
}

impl Expr {
    /// Numeric literal
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Number { value }
    }

    /// Variable reference
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    /// Binary operation
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left + right`
    #[must_use]
    pub fn add(left: Self, right: Self) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Addition (+)
    Add,
}

impl BinaryOp {
    /// Source spelling of the operator
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
        }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `name = value`
    Assign {
        /// Assigned variable
        name: String,
        /// Assigned value
        value: Expr,
    },
    /// Expression evaluated for its effect
    Expr {
        /// The expression
        expr: Expr,
    },
    /// `print(argument)`
    Print {
        /// Printed value
        argument: Expr,
    },
    /// `globals()`
    Globals,
}

/// Statements of one source file in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    /// Top-level statements
    pub stmts: Vec<Stmt>,
}

impl Program {
    /// Creates a program from statements
    #[must_use]
    pub const fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    /// Number of top-level statements
    #[must_use]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Whether the program has no statements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Iterate statements in source order
    pub fn iter(&self) -> slice::Iter<'_, Stmt> {
        self.stmts.iter()
    }
}

impl From<Vec<Stmt>> for Program {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self::new(stmts)
    }
}

impl FromIterator<Stmt> for Program {
    fn from_iter<Iter: IntoIterator<Item = Stmt>>(iter: Iter) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Program {
    type Item = Stmt;
    type IntoIter = vec::IntoIter<Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.into_iter()
    }
}

impl<'program> IntoIterator for &'program Program {
    type Item = &'program Stmt;
    type IntoIter = slice::Iter<'program, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// S-expression dump used in snapshots and debugging output.

impl fmt::Display for BinaryOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.symbol())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { value } => write!(formatter, "{value}"),
            Self::Identifier { name } => formatter.write_str(name),
            Self::BinaryOp { op, left, right } => write!(formatter, "({op} {left} {right})"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { name, value } => write!(formatter, "(= {name} {value})"),
            Self::Expr { expr } => write!(formatter, "(expr {expr})"),
            Self::Print { argument } => write!(formatter, "(print {argument})"),
            Self::Globals => formatter.write_str("(globals)"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            writeln!(formatter, "{stmt}")?;
        }
        Ok(())
    }
}
