//! Statement lowering (C5b): declarations, assignment, structured control
//! flow, and jumps.
//!
//! `while`/`break`/`continue` lower to plain `wasm` `block`/`loop`/`if`, with
//! `br` targets computed from a `depth` parameter threaded through the walk
//! rather than derived from the instruction stream after the fact — each
//! recursive call already knows how many structured constructs enclose it.

use wasm_encoder::{BlockType, Instruction};
use walang_ast::{Ast, ElseBranch, Range, StmtId, StmtKind};
use walang_type_checker::{builtin_from_name, IrType, TypeCheckError};

use crate::expr::{lower_expr_with_expected, resolve_lvalue};
use crate::func::FuncCtx;
use crate::module::ModuleCtx;
use crate::storage::emit_write;

fn resolve_type_name(ctx: &FuncCtx, name: &str, range: Range) -> Result<IrType, TypeCheckError> {
    if let Some(t) = builtin_from_name(name) {
        return Ok(t);
    }
    if let Some(&id) = ctx.symbols.classes.get(name) {
        return Ok(IrType::Class(id));
    }
    Err(TypeCheckError::UnknownSymbol { name: name.to_string(), range })
}

fn scalar_count(ctx: &FuncCtx, ty: &IrType, range: Range) -> Result<u32, TypeCheckError> {
    let slots = ty.underlying(&ctx.symbols.class_table).map_err(|()| TypeCheckError::CannotResolveSymbol { range })?;
    Ok(u32::try_from(slots.len()).unwrap_or(u32::MAX))
}

/// Lowers one statement. `depth` is the number of structured `wasm`
/// constructs (`block`/`loop`/`if`-branch) already entered at this point in
/// the walk — see `lower_while` for how `break`/`continue` targets are
/// derived from it.
pub fn lower_stmt(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    id: StmtId,
    func: &mut Vec<Instruction<'static>>,
    depth: u32,
) -> Result<(), TypeCheckError> {
    let stmt = ast.stmt(id);
    let range = stmt.range;
    match &stmt.kind {
        StmtKind::Declare { name, type_name, init } => {
            let declared_ty = type_name.as_ref().map(|n| resolve_type_name(ctx, n, range)).transpose()?;
            let mut actual_ty = lower_expr_with_expected(ctx, module, ast, *init, func, declared_ty.as_ref())?;
            let final_ty = match &declared_ty {
                Some(dt) => actual_ty
                    .try_resolve_to(dt)
                    .map_err(|m| TypeCheckError::TypeConvertError {
                        from: m.from.display_name(&ctx.symbols.class_table),
                        to: m.to.display_name(&ctx.symbols.class_table),
                        range,
                    })?,
                None => actual_ty,
            };
            let count = scalar_count(ctx, &final_ty, range)?;
            let base = ctx
                .locals
                .declare(name, final_ty, &ctx.symbols.class_table)
                .ok_or(TypeCheckError::RedefinedSymbol { name: name.clone(), range })?;
            emit_write(module, func, &walang_type_checker::Symbol::Local(base), count);
            Ok(())
        }
        StmtKind::Assign { target, value } => {
            let target_range = ast.expr(*target).range;
            let (sym, target_ty) = resolve_lvalue(&ctx.locals, ctx.symbols, ast, *target, target_range)?;
            let mut actual_ty = lower_expr_with_expected(ctx, module, ast, *value, func, Some(&target_ty))?;
            let final_ty = actual_ty.try_resolve_to(&target_ty).map_err(|m| TypeCheckError::TypeConvertError {
                from: m.from.display_name(&ctx.symbols.class_table),
                to: m.to.display_name(&ctx.symbols.class_table),
                range,
            })?;
            let count = scalar_count(ctx, &final_ty, range)?;
            emit_write(module, func, &sym, count);
            Ok(())
        }
        StmtKind::ExpressionStmt(e) => {
            let ty = lower_expr_with_expected(ctx, module, ast, *e, func, None)?;
            let count = scalar_count(ctx, &ty, range)?;
            for _ in 0..count {
                func.push(Instruction::Drop);
            }
            Ok(())
        }
        StmtKind::Block(stmts) => {
            ctx.locals.push_scope();
            for &s in stmts {
                lower_stmt(ctx, module, ast, s, func, depth)?;
            }
            ctx.locals.pop_scope();
            Ok(())
        }
        StmtKind::If { cond, then_block, or_else } => {
            lower_condition(ctx, module, ast, *cond, func, range)?;
            func.push(Instruction::If(BlockType::Empty));
            lower_stmt(ctx, module, ast, *then_block, func, depth + 1)?;
            if let Some(branch) = or_else {
                func.push(Instruction::Else);
                match branch {
                    ElseBranch::Block(id) => lower_stmt(ctx, module, ast, *id, func, depth + 1)?,
                    ElseBranch::If(id) => lower_stmt(ctx, module, ast, *id, func, depth + 1)?,
                }
            }
            func.push(Instruction::End);
            Ok(())
        }
        StmtKind::While { cond, body } => lower_while(ctx, module, ast, *cond, *body, func, depth, range),
        StmtKind::Break => {
            let target = ctx.break_target().ok_or(TypeCheckError::JumpStatementError {
                which: "break".to_string(),
                range,
            })?;
            func.push(Instruction::Br(depth - target));
            Ok(())
        }
        StmtKind::Continue => {
            let target = ctx.continue_target().ok_or(TypeCheckError::JumpStatementError {
                which: "continue".to_string(),
                range,
            })?;
            func.push(Instruction::Br(depth - target));
            Ok(())
        }
        StmtKind::Return(value) => {
            if let Some(e) = value {
                let ret_ty = ctx.return_type.clone();
                lower_expr_with_expected(ctx, module, ast, *e, func, Some(&ret_ty))?;
            }
            func.push(Instruction::Return);
            Ok(())
        }
        StmtKind::Function { .. } | StmtKind::Class { .. } => {
            unreachable!("functions/classes are top-level items, never nested in a function body")
        }
    }
}

/// Lowers `cond`, wrapping an `i64` result down to `i32` (`wasm`'s `if`
/// needs an `i32` condition) and validating it against the same
/// `Condition` placeholder the ternary uses.
fn lower_condition(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    cond: walang_ast::ExprId,
    func: &mut Vec<Instruction<'static>>,
    range: Range,
) -> Result<(), TypeCheckError> {
    let cond_ty = lower_expr_with_expected(ctx, module, ast, cond, func, None)?;
    let mut condition_slot = IrType::Condition(None);
    condition_slot.try_resolve_to(&cond_ty).map_err(|m| TypeCheckError::TypeConvertError {
        from: m.from.display_name(&ctx.symbols.class_table),
        to: m.to.display_name(&ctx.symbols.class_table),
        range,
    })?;
    if matches!(cond_ty, IrType::I64 | IrType::U64) {
        func.push(Instruction::I32WrapI64);
    }
    Ok(())
}

/// `block { loop { if cond { body; br continue } else { br break } } }`.
///
/// Entering the block raises the nesting depth by one — that's the `break`
/// target, since branching there exits straight past the loop. Entering the
/// loop raises it by one more — the `continue` target, since branching
/// there restarts the loop header. The `if`/`else` arms raise it a third
/// time; `lower_stmt`'s `depth` parameter carries that count to any nested
/// `break`/`continue`, however deep inside the body it is.
#[allow(clippy::too_many_arguments)]
fn lower_while(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    cond: walang_ast::ExprId,
    body: StmtId,
    func: &mut Vec<Instruction<'static>>,
    depth: u32,
    range: Range,
) -> Result<(), TypeCheckError> {
    let break_target = depth + 1;
    let continue_target = depth + 2;
    ctx.enter_loop(break_target, continue_target);

    func.push(Instruction::Block(BlockType::Empty));
    func.push(Instruction::Loop(BlockType::Empty));
    lower_condition(ctx, module, ast, cond, func, range)?;
    func.push(Instruction::If(BlockType::Empty));
    lower_stmt(ctx, module, ast, body, func, depth + 3)?;
    func.push(Instruction::Br((depth + 3) - continue_target));
    func.push(Instruction::Else);
    func.push(Instruction::Br((depth + 3) - break_target));
    func.push(Instruction::End);
    func.push(Instruction::End);
    func.push(Instruction::End);

    ctx.exit_loop();
    Ok(())
}
