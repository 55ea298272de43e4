//! The "parse tree with labelled rule contexts" the AST builder (C1) consumes.
//!
//! Binary expressions and call/member suffixes are intentionally left flat
//! here (`BinaryChain`, `Suffixed`) — reshaping that flat grammar output into
//! precedence-correct, receiver-first nesting is exactly the job the
//! specification assigns to the builder, not the parser.

use crate::location::Range;
use crate::ops::{BinaryOp, PrefixOp};

#[derive(Debug, Clone)]
pub enum PExpr {
    Identifier { kind: IdentKind, range: Range },
    Prefix { op: PrefixOp, operand: Box<PExpr>, range: Range },
    BinaryChain { first: Box<PExpr>, tail: Vec<(BinaryOp, PExpr)>, range: Range },
    Ternary { cond: Box<PExpr>, then: Box<PExpr>, or_else: Box<PExpr>, range: Range },
    Suffixed { base: Box<PExpr>, suffixes: Vec<Suffix>, range: Range },
    Parentheses { inner: Box<PExpr>, range: Range },
}

#[derive(Debug, Clone)]
pub enum IdentKind {
    Int(u64),
    Float(f64),
    Name(String),
}

#[derive(Debug, Clone)]
pub enum Suffix {
    Call { args: Vec<PExpr>, range: Range },
    Member { name: String, range: Range },
}

impl PExpr {
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            PExpr::Identifier { range, .. }
            | PExpr::Prefix { range, .. }
            | PExpr::BinaryChain { range, .. }
            | PExpr::Ternary { range, .. }
            | PExpr::Suffixed { range, .. }
            | PExpr::Parentheses { range, .. } => *range,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PParam {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub enum PStmt {
    Declare { name: String, type_name: Option<String>, init: PExpr, range: Range },
    Assign { target: PExpr, value: PExpr, range: Range },
    ExpressionStmt(PExpr, Range),
    Block(Vec<PStmt>, Range),
    If { cond: PExpr, then_block: Box<PStmt>, or_else: Option<Box<PStmt>>, range: Range },
    While { cond: PExpr, body: Box<PStmt>, range: Range },
    Break(Range),
    Continue(Range),
    Return(Option<PExpr>, Range),
    Function {
        name: String,
        params: Vec<PParam>,
        return_type: Option<String>,
        body: Box<PStmt>,
        range: Range,
    },
    Class { name: String, members: Vec<PParam>, methods: Vec<PStmt>, range: Range },
}

impl PStmt {
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            PStmt::Declare { range, .. }
            | PStmt::Assign { range, .. }
            | PStmt::ExpressionStmt(_, range)
            | PStmt::Block(_, range)
            | PStmt::If { range, .. }
            | PStmt::While { range, .. }
            | PStmt::Break(range)
            | PStmt::Continue(range)
            | PStmt::Return(_, range)
            | PStmt::Function { range, .. }
            | PStmt::Class { range, .. } => *range,
        }
    }
}

/// Root context: a source file's top-level items.
#[derive(Debug, Clone, Default)]
pub struct Walang {
    pub items: Vec<PStmt>,
}
