//! Expression lowering (C5a): `lower_expr` walks an [`ExprId`] and emits the
//! instructions that leave its value's flattened scalars on the stack,
//! returning the type it produced.
//!
//! `Declare`/`Assign`/`Return` pass an `expected` type down into this walk so
//! a literal can resolve against the target's annotation *before* an
//! enclosing binary operator's per-type table is consulted — see
//! `lower_expr_with_expected`'s doc comment for why this matters.

use wasm_encoder::{BlockType, Instruction};
use walang_ast::{Ast, BinaryOp, ExprId, ExprKind, PrefixOp, Range};
use walang_type_checker::{
    resolve_call_target, resolve_member, resolve_name, CallTarget, ClassInfo, ConvertMismatch, IrType,
    LocalScope, Symbol, SymbolTable, TypeCheckError, WasmType,
};

use crate::func::FuncCtx;
use crate::module::{wasm_val_type, ModuleCtx};
use crate::ops;
use crate::storage::emit_read;

fn convert_err(m: ConvertMismatch, classes: &[ClassInfo], range: Range) -> TypeCheckError {
    TypeCheckError::TypeConvertError { from: m.from.display_name(classes), to: m.to.display_name(classes), range }
}

fn scalar_count(ty: &IrType, symbols: &SymbolTable, range: Range) -> Result<u32, TypeCheckError> {
    let slots = ty.underlying(&symbols.class_table).map_err(|()| TypeCheckError::CannotResolveSymbol { range })?;
    Ok(u32::try_from(slots.len()).unwrap_or(u32::MAX))
}

/// Resolves an addressable expression (a name or a member chain rooted in
/// one) to the symbol and type it denotes, without emitting any code. Used
/// for call callees and assignment targets, which are never themselves
/// lowered as values.
pub fn resolve_lvalue(
    locals: &LocalScope,
    symbols: &SymbolTable,
    ast: &Ast,
    id: ExprId,
    range: Range,
) -> Result<(Symbol, IrType), TypeCheckError> {
    match &ast.expr(id).kind {
        ExprKind::Name(name) => resolve_name(symbols, locals, name, range),
        ExprKind::Member { receiver, name } => {
            let recv_range = ast.expr(*receiver).range;
            let (recv_sym, recv_ty) = resolve_lvalue(locals, symbols, ast, *receiver, recv_range)?;
            resolve_member(symbols, recv_sym, &recv_ty, name, range)
        }
        ExprKind::Parentheses(inner) => resolve_lvalue(locals, symbols, ast, *inner, range),
        _ => Err(TypeCheckError::CannotResolveSymbol { range }),
    }
}

/// A shallow, non-emitting type probe used only where a result type must be
/// known before any instruction for that expression can be chosen (the
/// ternary's `if` block type when no outer context supplies one). Mirrors
/// the type-level rules of `lower_expr_with_expected` without mirroring its
/// code generation.
fn infer_type(ctx: &FuncCtx, ast: &Ast, id: ExprId) -> Result<IrType, TypeCheckError> {
    let expr = ast.expr(id);
    match &expr.kind {
        ExprKind::IntLiteral(_) => Ok(IrType::I32),
        ExprKind::FloatLiteral(_) => Ok(IrType::F32),
        ExprKind::Name(_) | ExprKind::Member { .. } => {
            resolve_lvalue(&ctx.locals, ctx.symbols, ast, id, expr.range).map(|(_, ty)| ty)
        }
        ExprKind::Call { callee, .. } => {
            let callee_range = ast.expr(*callee).range;
            let (sym, ty) = resolve_lvalue(&ctx.locals, ctx.symbols, ast, *callee, callee_range)?;
            let target = resolve_call_target(sym, &ty, callee_range)?;
            Ok(match target {
                CallTarget::Constructor(id) => IrType::Class(id),
                CallTarget::Function { signature, .. } | CallTarget::Method { signature, .. } => {
                    signature.return_type
                }
            })
        }
        ExprKind::Prefix(_, operand) => infer_type(ctx, ast, *operand),
        ExprKind::Binary(op, l, _) => {
            if is_comparison(*op) {
                Ok(IrType::I32)
            } else {
                infer_type(ctx, ast, *l)
            }
        }
        ExprKind::Ternary { then, .. } => infer_type(ctx, ast, *then),
        ExprKind::Parentheses(inner) => infer_type(ctx, ast, *inner),
    }
}

fn is_comparison(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
}

pub fn lower_expr(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    id: ExprId,
    func: &mut Vec<Instruction<'static>>,
) -> Result<IrType, TypeCheckError> {
    lower_expr_with_expected(ctx, module, ast, id, func, None)
}

/// Lowers `id`, threading `expected` into literal resolution and into
/// `Binary`/`Prefix`/`Ternary`/`Parentheses` sub-expressions so an
/// annotated `Declare`/`Assign`/`Return` forces its whole initializer
/// expression toward the target type *before* the per-type operator table
/// sees the operands — e.g. `let a:f32 = 0 && 4;` must see two `f32`
/// operands (and fail with `InvalidOperator`), not two default-`i32`
/// operands later rejected by a type mismatch against `f32`.
///
/// `Call` argument lowering deliberately does *not* thread `expected`: each
/// argument is lowered independently to its own default type, then coerced
/// against the parameter type, matching the spec's `TypeConvertError` for
/// `foo(1.5)` against an `i32` parameter.
pub fn lower_expr_with_expected(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    id: ExprId,
    func: &mut Vec<Instruction<'static>>,
    expected: Option<&IrType>,
) -> Result<IrType, TypeCheckError> {
    let expr = ast.expr(id);
    let range = expr.range;
    match &expr.kind {
        ExprKind::IntLiteral(v) => {
            let ty = literal_int_type(expected);
            func.push(int_const(&ty, *v));
            Ok(ty)
        }
        ExprKind::FloatLiteral(v) => {
            let ty = literal_float_type(expected);
            func.push(float_const(&ty, *v));
            Ok(ty)
        }
        ExprKind::Name(name) => {
            let (sym, ty) = resolve_name(ctx.symbols, &ctx.locals, name, range)?;
            let count = scalar_count(&ty, ctx.symbols, range)?;
            emit_read(module, func, &sym, count);
            coerce(ty, expected, &ctx.symbols.class_table, range)
        }
        ExprKind::Member { .. } => {
            let (sym, ty) = resolve_lvalue(&ctx.locals, ctx.symbols, ast, id, range)?;
            let count = scalar_count(&ty, ctx.symbols, range)?;
            emit_read(module, func, &sym, count);
            coerce(ty, expected, &ctx.symbols.class_table, range)
        }
        ExprKind::Parentheses(inner) => lower_expr_with_expected(ctx, module, ast, *inner, func, expected),
        ExprKind::Prefix(op, operand) => lower_prefix(ctx, module, ast, *op, *operand, func, expected, range),
        ExprKind::Binary(op, l, r) => lower_binary(ctx, module, ast, *op, *l, *r, func, expected, range),
        ExprKind::Ternary { cond, then, or_else } => {
            lower_ternary(ctx, module, ast, *cond, *then, *or_else, func, expected, range)
        }
        ExprKind::Call { callee, args } => lower_call(ctx, module, ast, *callee, args, func, range),
    }
}

fn coerce(
    ty: IrType,
    expected: Option<&IrType>,
    classes: &[ClassInfo],
    range: Range,
) -> Result<IrType, TypeCheckError> {
    match expected {
        Some(e) => {
            let mut t = ty;
            t.try_resolve_to(e).map_err(|m| convert_err(m, classes, range))
        }
        None => Ok(ty),
    }
}

fn literal_int_type(expected: Option<&IrType>) -> IrType {
    match expected.and_then(IrType::concrete) {
        Some(IrType::F32) => IrType::F32,
        Some(IrType::F64) => IrType::F64,
        Some(IrType::U32) => IrType::U32,
        Some(IrType::I64) => IrType::I64,
        Some(IrType::U64) => IrType::U64,
        _ => IrType::I32,
    }
}

fn literal_float_type(expected: Option<&IrType>) -> IrType {
    match expected.and_then(IrType::concrete) {
        Some(IrType::F64) => IrType::F64,
        _ => IrType::F32,
    }
}

fn int_const(ty: &IrType, v: u64) -> Instruction<'static> {
    match ty {
        IrType::I32 | IrType::U32 => Instruction::I32Const(v as i32),
        IrType::I64 | IrType::U64 => Instruction::I64Const(v as i64),
        IrType::F32 => Instruction::F32Const(v as f32),
        IrType::F64 => Instruction::F64Const(v as f64),
        _ => Instruction::I32Const(v as i32),
    }
}

fn float_const(ty: &IrType, v: f64) -> Instruction<'static> {
    match ty {
        IrType::F64 => Instruction::F64Const(v),
        _ => Instruction::F32Const(v as f32),
    }
}

#[allow(clippy::too_many_arguments)]
fn lower_prefix(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    op: PrefixOp,
    operand: ExprId,
    func: &mut Vec<Instruction<'static>>,
    expected: Option<&IrType>,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    match op {
        PrefixOp::Plus => lower_expr_with_expected(ctx, module, ast, operand, func, expected),
        PrefixOp::Not => {
            let ty = lower_expr_with_expected(ctx, module, ast, operand, func, expected)?;
            ops::lower_prefix(op, &ty, func, range)?;
            Ok(ty)
        }
        PrefixOp::Minus => {
            // `0 - x`: the zero must precede `x` on the stack, but `x`'s
            // type is only known once it is lowered — so `x` is spilled to
            // a scratch local and re-read after the zero constant.
            let ty = lower_expr_with_expected(ctx, module, ast, operand, func, expected)?;
            if !ty.is_integer() && !ty.is_float() {
                return Err(TypeCheckError::InvalidOperator {
                    type_name: ty.display_name(&ctx.symbols.class_table),
                    op: op.to_string(),
                    range,
                });
            }
            let temp = ctx.locals.fresh_temp(ops::wasm_of(&ty));
            func.push(Instruction::LocalSet(temp));
            func.push(ops::zero_const(&ty));
            func.push(Instruction::LocalGet(temp));
            func.push(ops::sub_const(&ty));
            Ok(ty)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn lower_binary(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    op: BinaryOp,
    l: ExprId,
    r: ExprId,
    func: &mut Vec<Instruction<'static>>,
    expected: Option<&IrType>,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        return lower_short_circuit(ctx, module, ast, op, l, r, func, expected, range);
    }
    let lty = lower_expr_with_expected(ctx, module, ast, l, func, expected)?;
    let rty = lower_expr_with_expected(ctx, module, ast, r, func, expected.or(Some(&lty)))?;
    if rty != lty {
        return Err(convert_err(
            ConvertMismatch { from: rty, to: lty },
            &ctx.symbols.class_table,
            range,
        ));
    }
    let result_ty = ops::binary_result_type(op, &lty, &ctx.symbols.class_table, range)?;
    ops::lower_binary(op, &lty, &ctx.symbols.class_table, func, range)?;
    Ok(result_ty)
}

#[allow(clippy::too_many_arguments)]
fn lower_short_circuit(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    op: BinaryOp,
    l: ExprId,
    r: ExprId,
    func: &mut Vec<Instruction<'static>>,
    expected: Option<&IrType>,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    let lty = lower_expr_with_expected(ctx, module, ast, l, func, expected)?;
    if !lty.is_integer() {
        return Err(TypeCheckError::InvalidOperator {
            type_name: lty.display_name(&ctx.symbols.class_table),
            op: op.to_string(),
            range,
        });
    }
    let temp = ctx.locals.fresh_temp(ops::wasm_of(&lty));
    func.push(Instruction::LocalSet(temp));
    func.push(Instruction::LocalGet(temp));
    let val_type = wasm_val_type(ops::wasm_of(&lty)).expect("integer operand is always scalar");
    func.push(Instruction::If(BlockType::Result(val_type)));
    match op {
        BinaryOp::And => {
            let rty = lower_expr_with_expected(ctx, module, ast, r, func, Some(&lty))?;
            if rty != lty {
                return Err(convert_err(ConvertMismatch { from: rty, to: lty }, &ctx.symbols.class_table, range));
            }
            func.push(Instruction::Else);
            func.push(Instruction::LocalGet(temp));
        }
        BinaryOp::Or => {
            func.push(Instruction::LocalGet(temp));
            func.push(Instruction::Else);
            let rty = lower_expr_with_expected(ctx, module, ast, r, func, Some(&lty))?;
            if rty != lty {
                return Err(convert_err(ConvertMismatch { from: rty, to: lty }, &ctx.symbols.class_table, range));
            }
        }
        _ => unreachable!("only And/Or reach lower_short_circuit"),
    }
    func.push(Instruction::End);
    Ok(lty)
}

#[allow(clippy::too_many_arguments)]
fn lower_ternary(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    cond: ExprId,
    then: ExprId,
    or_else: ExprId,
    func: &mut Vec<Instruction<'static>>,
    expected: Option<&IrType>,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    let cond_ty = lower_expr_with_expected(ctx, module, ast, cond, func, None)?;
    let mut condition_slot = IrType::Condition(None);
    condition_slot
        .try_resolve_to(&cond_ty)
        .map_err(|m| convert_err(m, &ctx.symbols.class_table, range))?;
    if matches!(cond_ty, IrType::I64 | IrType::U64) {
        func.push(Instruction::I32WrapI64);
    }

    let result_ty = match expected {
        Some(e) => e.concrete().cloned().unwrap_or_else(|| e.clone()),
        None => infer_type(ctx, ast, then)?,
    };
    let val_type =
        wasm_val_type(ops::wasm_of(&result_ty)).ok_or(TypeCheckError::CannotResolveSymbol { range })?;
    func.push(Instruction::If(BlockType::Result(val_type)));
    let then_ty = lower_expr_with_expected(ctx, module, ast, then, func, Some(&result_ty))?;
    func.push(Instruction::Else);
    let else_ty = lower_expr_with_expected(ctx, module, ast, or_else, func, Some(&result_ty))?;
    func.push(Instruction::End);
    if then_ty != result_ty || else_ty != result_ty {
        return Err(TypeCheckError::CannotResolveSymbol { range });
    }
    Ok(result_ty)
}

fn lower_call(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    callee: ExprId,
    args: &[ExprId],
    func: &mut Vec<Instruction<'static>>,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    let callee_range = ast.expr(callee).range;
    let (callee_sym, callee_ty) = resolve_lvalue(&ctx.locals, ctx.symbols, ast, callee, callee_range)?;
    let target = resolve_call_target(callee_sym, &callee_ty, callee_range)?;
    match target {
        CallTarget::Constructor(class_id) => {
            if !args.is_empty() {
                return Err(TypeCheckError::ArgumentCountError { expected: 0, actual: args.len(), range });
            }
            let class = ctx.symbols.class(class_id);
            for (_, member_ty) in class.members.clone() {
                for wty in member_ty.underlying(&ctx.symbols.class_table).unwrap_or_default() {
                    func.push(ops::zero_const_wasm(wty));
                }
            }
            Ok(IrType::Class(class_id))
        }
        CallTarget::Function { name, signature } => {
            lower_call_args(ctx, module, ast, args, &signature.params, func, range)?;
            func.push(Instruction::Call(module.func_index(&name)));
            Ok(signature.return_type)
        }
        CallTarget::Method { receiver, mangled_name, signature } => {
            let this_ty = signature.params.first().cloned().unwrap_or(IrType::None);
            let this_count = scalar_count(&this_ty, ctx.symbols, range)?;
            emit_read(module, func, &receiver, this_count);
            let param_rest = &signature.params[1.min(signature.params.len())..];
            lower_call_args(ctx, module, ast, args, param_rest, func, range)?;
            func.push(Instruction::Call(module.func_index(&mangled_name)));
            Ok(signature.return_type)
        }
    }
}

fn lower_call_args(
    ctx: &mut FuncCtx,
    module: &ModuleCtx,
    ast: &Ast,
    args: &[ExprId],
    params: &[IrType],
    func: &mut Vec<Instruction<'static>>,
    range: Range,
) -> Result<(), TypeCheckError> {
    if args.len() != params.len() {
        return Err(TypeCheckError::ArgumentCountError { expected: params.len(), actual: args.len(), range });
    }
    for (arg_id, param_ty) in args.iter().zip(params) {
        let mut actual = lower_expr_with_expected(ctx, module, ast, *arg_id, func, None)?;
        actual
            .try_resolve_to(param_ty)
            .map_err(|m| convert_err(m, &ctx.symbols.class_table, ast.expr(*arg_id).range))?;
    }
    Ok(())
}
