//! The AST's closed sum of expression and statement kinds, arena-stored with
//! stable `u32` ids rather than reference-counted shared pointers.
//!
//! Node ids are handed out by [`Ast`] and never reused, so a `Location`
//! recorded by an earlier compiler stage (e.g. a type-checker's
//! `node_types` map) stays valid for the whole compilation.

use rustc_hash::FxHashMap;

use crate::location::Range;
use crate::ops::{BinaryOp, PrefixOp};

pub type ExprId = u32;
pub type StmtId = u32;

#[derive(Debug, Clone)]
pub enum Literal {
    Int(u64),
    Float(f64),
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `Identifier` per the data model: an integer/float literal or a name.
    IntLiteral(u64),
    FloatLiteral(f64),
    Name(String),
    Prefix(PrefixOp, ExprId),
    Binary(BinaryOp, ExprId, ExprId),
    Ternary { cond: ExprId, then: ExprId, or_else: ExprId },
    Call { callee: ExprId, args: Vec<ExprId> },
    Member { receiver: ExprId, name: String },
    /// Transparent: collapsed away by the builder. Kept in the sum for
    /// fidelity with the data model; never constructed by [`crate::builder`].
    Parentheses(ExprId),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: ExprId,
    pub range: Range,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(StmtId),
    If(StmtId),
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Declare { name: String, type_name: Option<String>, init: ExprId },
    Assign { target: ExprId, value: ExprId },
    ExpressionStmt(ExprId),
    Block(Vec<StmtId>),
    If { cond: ExprId, then_block: StmtId, or_else: Option<ElseBranch> },
    While { cond: ExprId, body: StmtId },
    Break,
    Continue,
    Return(Option<ExprId>),
    Function { name: String, params: Vec<Param>, return_type: Option<String>, body: StmtId },
    Class { name: String, members: Vec<Param>, methods: Vec<StmtId> },
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: StmtId,
    pub range: Range,
    pub kind: StmtKind,
}

/// Arena-backed AST for one compiled source file.
///
/// Mirrors the teacher's `Arena<AstNode>` shape (flat `FxHashMap` keyed by a
/// monotonically increasing id) but splits expressions and statements into
/// separate tables since the closed sum never mixes the two.
#[derive(Debug, Default)]
pub struct Ast {
    exprs: FxHashMap<ExprId, Expr>,
    stmts: FxHashMap<StmtId, Stmt>,
    next_id: u32,
    /// Top-level statements in source order: globals, functions, classes.
    pub top_level: Vec<StmtId>,
}

impl Ast {
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1, ..Self::default() }
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn alloc_expr(&mut self, range: Range, kind: ExprKind) -> ExprId {
        let id = self.fresh_id();
        self.exprs.insert(id, Expr { id, range, kind });
        id
    }

    pub fn alloc_stmt(&mut self, range: Range, kind: StmtKind) -> StmtId {
        let id = self.fresh_id();
        self.stmts.insert(id, Stmt { id, range, kind });
        id
    }

    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        self.exprs.get(&id).expect("dangling ExprId")
    }

    #[must_use]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        self.stmts.get(&id).expect("dangling StmtId")
    }

    /// Renders an expression as the parenthesised-prefix `to_string` form
    /// used by the parser/AST round-trip properties, e.g. `(ADD a (MUL 2 3))`.
    #[must_use]
    pub fn expr_to_sexpr(&self, id: ExprId) -> String {
        match &self.expr(id).kind {
            ExprKind::IntLiteral(v) => v.to_string(),
            ExprKind::FloatLiteral(v) => v.to_string(),
            ExprKind::Name(n) => n.clone(),
            ExprKind::Prefix(op, e) => format!("({op} {})", self.expr_to_sexpr(*e)),
            ExprKind::Binary(op, l, r) => {
                format!("({} {} {})", op.sexpr_name(), self.expr_to_sexpr(*l), self.expr_to_sexpr(*r))
            }
            ExprKind::Ternary { cond, then, or_else } => format!(
                "({} ? {} : {})",
                self.expr_to_sexpr(*cond),
                self.expr_to_sexpr(*then),
                self.expr_to_sexpr(*or_else)
            ),
            ExprKind::Call { callee, args } => {
                let args = args.iter().map(|a| self.expr_to_sexpr(*a)).collect::<Vec<_>>().join(", ");
                format!("{}({args})", self.expr_to_sexpr(*callee))
            }
            ExprKind::Member { receiver, name } => format!("{}.{name}", self.expr_to_sexpr(*receiver)),
            ExprKind::Parentheses(e) => self.expr_to_sexpr(*e),
        }
    }
}
