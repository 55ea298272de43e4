//! AST builder (C1): reshapes the parser's flat binary/suffix lists into
//! precedence-correct, receiver-first trees and allocates them into an
//! [`Ast`] arena with ranges attached.

use crate::location::Range;
use crate::nodes::{Ast, ElseBranch, ExprId, ExprKind, Param, StmtId, StmtKind};
use crate::ops::BinaryOp;
use crate::parse_tree::{IdentKind, PExpr, PParam, PStmt, Suffix, Walang};

pub fn build(tree: &Walang, ast: &mut Ast) {
    for item in &tree.items {
        let id = build_stmt(item, ast);
        ast.top_level.push(id);
    }
}

fn build_params(params: &[PParam]) -> Vec<Param> {
    params.iter().map(|p| Param { name: p.name.clone(), type_name: p.type_name.clone() }).collect()
}

fn build_stmt(stmt: &PStmt, ast: &mut Ast) -> StmtId {
    let range = stmt.range();
    match stmt {
        PStmt::Declare { name, type_name, init, .. } => {
            let init = build_expr(init, ast);
            ast.alloc_stmt(
                range,
                StmtKind::Declare { name: name.clone(), type_name: type_name.clone(), init },
            )
        }
        PStmt::Assign { target, value, .. } => {
            let target = build_expr(target, ast);
            let value = build_expr(value, ast);
            ast.alloc_stmt(range, StmtKind::Assign { target, value })
        }
        PStmt::ExpressionStmt(e, _) => {
            let e = build_expr(e, ast);
            ast.alloc_stmt(range, StmtKind::ExpressionStmt(e))
        }
        PStmt::Block(stmts, _) => {
            let ids = stmts.iter().map(|s| build_stmt(s, ast)).collect();
            ast.alloc_stmt(range, StmtKind::Block(ids))
        }
        PStmt::If { cond, then_block, or_else, .. } => {
            let cond = build_expr(cond, ast);
            let then_block = build_stmt(then_block, ast);
            let or_else = or_else.as_ref().map(|branch| match branch.as_ref() {
                PStmt::If { .. } => ElseBranch::If(build_stmt(branch, ast)),
                _ => ElseBranch::Block(build_stmt(branch, ast)),
            });
            ast.alloc_stmt(range, StmtKind::If { cond, then_block, or_else })
        }
        PStmt::While { cond, body, .. } => {
            let cond = build_expr(cond, ast);
            let body = build_stmt(body, ast);
            ast.alloc_stmt(range, StmtKind::While { cond, body })
        }
        PStmt::Break(_) => ast.alloc_stmt(range, StmtKind::Break),
        PStmt::Continue(_) => ast.alloc_stmt(range, StmtKind::Continue),
        PStmt::Return(expr, _) => {
            let expr = expr.as_ref().map(|e| build_expr(e, ast));
            ast.alloc_stmt(range, StmtKind::Return(expr))
        }
        PStmt::Function { name, params, return_type, body, .. } => {
            let params = build_params(params);
            let body = build_stmt(body, ast);
            ast.alloc_stmt(
                range,
                StmtKind::Function { name: name.clone(), params, return_type: return_type.clone(), body },
            )
        }
        PStmt::Class { name, members, methods, .. } => {
            let members = build_params(members);
            let methods = methods.iter().map(|m| build_stmt(m, ast)).collect();
            ast.alloc_stmt(range, StmtKind::Class { name: name.clone(), members, methods })
        }
    }
}

fn build_expr(expr: &PExpr, ast: &mut Ast) -> ExprId {
    match expr {
        PExpr::Identifier { kind, range } => {
            let kind = match kind {
                IdentKind::Int(v) => ExprKind::IntLiteral(*v),
                IdentKind::Float(v) => ExprKind::FloatLiteral(*v),
                IdentKind::Name(n) => ExprKind::Name(n.clone()),
            };
            ast.alloc_expr(*range, kind)
        }
        PExpr::Prefix { op, operand, range } => {
            let operand = build_expr(operand, ast);
            ast.alloc_expr(*range, ExprKind::Prefix(*op, operand))
        }
        PExpr::BinaryChain { first, tail, range } => {
            let first = build_expr(first, ast);
            fold_binary_chain(first, tail, ast, *range)
        }
        PExpr::Ternary { cond, then, or_else, range } => {
            let cond = build_expr(cond, ast);
            let then = build_expr(then, ast);
            let or_else = build_expr(or_else, ast);
            ast.alloc_expr(*range, ExprKind::Ternary { cond, then, or_else })
        }
        PExpr::Suffixed { base, suffixes, range } => {
            let base = build_expr(base, ast);
            fold_suffix_chain(base, suffixes, ast, *range)
        }
        PExpr::Parentheses { inner, .. } => build_expr(inner, ast),
    }
}

/// Precedence climbing over the parser's flat `(op, operand)` tail list.
///
/// Equivalent to the builder's rotate-based description in the operator
/// spec: a higher-precedence operator than the one currently being
/// accumulated grabs operands to its right first (recursing with a raised
/// minimum precedence) before the lower-precedence operator combines with
/// its now-complete right-hand side. Equal precedence never recurses, which
/// gives left-associativity.
fn fold_binary_chain(
    first: ExprId,
    tail: &[(BinaryOp, PExpr)],
    ast: &mut Ast,
    range: Range,
) -> ExprId {
    let mut built: Vec<(BinaryOp, ExprId)> =
        tail.iter().map(|(op, e)| (*op, build_expr(e, ast))).collect();
    let mut iter = built.drain(..).peekable();
    climb(first, &mut iter, 0, ast, range)
}

fn climb(
    mut lhs: ExprId,
    iter: &mut std::iter::Peekable<std::vec::Drain<'_, (BinaryOp, ExprId)>>,
    min_prec: u8,
    ast: &mut Ast,
    range: Range,
) -> ExprId {
    while let Some(&(op, _)) = iter.peek() {
        if op.precedence() < min_prec {
            break;
        }
        let (op, mut rhs) = iter.next().unwrap();
        while let Some(&(next_op, _)) = iter.peek() {
            if next_op.precedence() > op.precedence() {
                rhs = climb(rhs, iter, op.precedence() + 1, ast, range);
            } else {
                break;
            }
        }
        lhs = ast.alloc_expr(range, ExprKind::Binary(op, lhs, rhs));
    }
    lhs
}

/// Rewraps a flat call/member suffix list receiver-first: `base(a).m(b)`
/// becomes `Member(Call(base, [a]), m)` wrapped again by the trailing call.
fn fold_suffix_chain(base: ExprId, suffixes: &[Suffix], ast: &mut Ast, range: Range) -> ExprId {
    let mut acc = base;
    for suffix in suffixes {
        acc = match suffix {
            Suffix::Call { args, .. } => {
                let args = args.iter().map(|a| build_expr(a, ast)).collect();
                ast.alloc_expr(range, ExprKind::Call { callee: acc, args })
            }
            Suffix::Member { name, .. } => {
                ast.alloc_expr(range, ExprKind::Member { receiver: acc, name: name.clone() })
            }
        };
    }
    acc
}
