//! Per-type prefix/binary operator dispatch tables (C5). A tagged-sum match
//! in two functions, replacing the virtual `handlePrefixOp`/`handleBinaryOp`
//! dispatch on a type base class with a plain `match` over [`IrType`].

use wasm_encoder::Instruction;
use walang_ast::{BinaryOp, PrefixOp, Range};
use walang_type_checker::{ClassInfo, IrType, TypeCheckError, WasmType};

#[must_use]
pub fn wasm_of(ty: &IrType) -> WasmType {
    match ty {
        IrType::I32 | IrType::U32 => WasmType::I32,
        IrType::I64 | IrType::U64 => WasmType::I64,
        IrType::F32 => WasmType::F32,
        IrType::F64 => WasmType::F64,
        _ => WasmType::None,
    }
}

/// `+x` is a no-op; `not x` is `eqz` on an int and an error on a float.
///
/// `-x` is handled entirely in `expr.rs`: the spec lowers it as `0 - x`
/// (float included — a subtraction from zero, not a dedicated negate
/// instruction), which requires the zero constant to be pushed *before* the
/// operand, so that case never reaches this per-instruction dispatcher.
pub fn lower_prefix(
    op: PrefixOp,
    ty: &IrType,
    func: &mut Vec<Instruction<'static>>,
    range: Range,
) -> Result<(), TypeCheckError> {
    match (op, wasm_of(ty)) {
        (PrefixOp::Plus, _) => {}
        (PrefixOp::Not, WasmType::I32) => func.push(Instruction::I32Eqz),
        (PrefixOp::Not, WasmType::I64) => func.push(Instruction::I64Eqz),
        (PrefixOp::Not, WasmType::F32 | WasmType::F64) => {
            return Err(TypeCheckError::InvalidOperator {
                type_name: "float".into(),
                op: "not".into(),
                range,
            })
        }
        (PrefixOp::Not, WasmType::None) => {
            return Err(TypeCheckError::InvalidOperator { type_name: "void".into(), op: op.to_string(), range })
        }
        (PrefixOp::Minus, _) => unreachable!("Minus is lowered directly in expr.rs"),
    }
    Ok(())
}

/// Emits `i32.const 0`/`i64.const 0`/`f32.const 0`/`f64.const 0` matching
/// `ty`'s width, for the `-x` → `0 - x` lowering.
pub fn zero_const(ty: &IrType) -> Instruction<'static> {
    match wasm_of(ty) {
        WasmType::I32 => Instruction::I32Const(0),
        WasmType::I64 => Instruction::I64Const(0),
        WasmType::F32 => Instruction::F32Const(0.0),
        WasmType::F64 => Instruction::F64Const(0.0),
        WasmType::None => Instruction::I32Const(0),
    }
}

/// The subtraction instruction used for `0 - x`.
pub fn sub_const(ty: &IrType) -> Instruction<'static> {
    match wasm_of(ty) {
        WasmType::I32 => Instruction::I32Sub,
        WasmType::I64 => Instruction::I64Sub,
        WasmType::F32 => Instruction::F32Sub,
        WasmType::F64 => Instruction::F64Sub,
        WasmType::None => Instruction::I32Sub,
    }
}

/// A zero constant for a bare [`WasmType`], used to zero-initialise a
/// constructed class instance's scalar slots (constructor calls emit no
/// other runtime code).
#[must_use]
pub fn zero_const_wasm(wty: WasmType) -> Instruction<'static> {
    match wty {
        WasmType::I32 => Instruction::I32Const(0),
        WasmType::I64 => Instruction::I64Const(0),
        WasmType::F32 => Instruction::F32Const(0.0),
        WasmType::F64 => Instruction::F64Const(0.0),
        WasmType::None => Instruction::I32Const(0),
    }
}

/// Result type of a binary operator application, following the spec's
/// per-type table: arithmetic/equality work for every numeric type;
/// ordering/div gain a signed/unsigned split; bitwise ops reject floats;
/// `&&`/`||` are handled separately by the caller (short-circuit control flow).
pub fn binary_result_type(
    op: BinaryOp,
    operand_ty: &IrType,
    classes: &[ClassInfo],
    range: Range,
) -> Result<IrType, TypeCheckError> {
    let is_comparison = matches!(
        op,
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
    );
    let is_bitwise = matches!(
        op,
        BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitAnd | BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Mod
    );
    if is_bitwise && operand_ty.is_float() {
        return Err(TypeCheckError::InvalidOperator {
            type_name: operand_ty.display_name(classes),
            op: op.to_string(),
            range,
        });
    }
    if matches!(operand_ty, IrType::Class(_)) {
        return Err(TypeCheckError::InvalidOperator {
            type_name: operand_ty.display_name(classes),
            op: op.to_string(),
            range,
        });
    }
    if is_comparison {
        Ok(IrType::I32)
    } else {
        Ok(operand_ty.clone())
    }
}

/// Emits the instruction for `op` applied to two already-lowered operands of
/// `operand_ty` (both scalar, already on the stack in left-then-right order).
pub fn lower_binary(
    op: BinaryOp,
    operand_ty: &IrType,
    classes: &[ClassInfo],
    func: &mut Vec<Instruction<'static>>,
    range: Range,
) -> Result<(), TypeCheckError> {
    let wt = wasm_of(operand_ty);
    let signed = operand_ty.is_signed();
    use BinaryOp as B;
    use Instruction as I;
    let insn = match (wt, op) {
        (WasmType::I32, B::Add) => I::I32Add,
        (WasmType::I32, B::Sub) => I::I32Sub,
        (WasmType::I32, B::Mul) => I::I32Mul,
        (WasmType::I32, B::Div) if signed => I::I32DivS,
        (WasmType::I32, B::Div) => I::I32DivU,
        (WasmType::I32, B::Mod) if signed => I::I32RemS,
        (WasmType::I32, B::Mod) => I::I32RemU,
        (WasmType::I32, B::Eq) => I::I32Eq,
        (WasmType::I32, B::Ne) => I::I32Ne,
        (WasmType::I32, B::Lt) if signed => I::I32LtS,
        (WasmType::I32, B::Lt) => I::I32LtU,
        (WasmType::I32, B::Le) if signed => I::I32LeS,
        (WasmType::I32, B::Le) => I::I32LeU,
        (WasmType::I32, B::Gt) if signed => I::I32GtS,
        (WasmType::I32, B::Gt) => I::I32GtU,
        (WasmType::I32, B::Ge) if signed => I::I32GeS,
        (WasmType::I32, B::Ge) => I::I32GeU,
        (WasmType::I32, B::BitOr) => I::I32Or,
        (WasmType::I32, B::BitXor) => I::I32Xor,
        (WasmType::I32, B::BitAnd) => I::I32And,
        (WasmType::I32, B::Shl) => I::I32Shl,
        (WasmType::I32, B::Shr) if signed => I::I32ShrS,
        (WasmType::I32, B::Shr) => I::I32ShrU,

        (WasmType::I64, B::Add) => I::I64Add,
        (WasmType::I64, B::Sub) => I::I64Sub,
        (WasmType::I64, B::Mul) => I::I64Mul,
        (WasmType::I64, B::Div) if signed => I::I64DivS,
        (WasmType::I64, B::Div) => I::I64DivU,
        (WasmType::I64, B::Mod) if signed => I::I64RemS,
        (WasmType::I64, B::Mod) => I::I64RemU,
        (WasmType::I64, B::Eq) => I::I64Eq,
        (WasmType::I64, B::Ne) => I::I64Ne,
        (WasmType::I64, B::Lt) if signed => I::I64LtS,
        (WasmType::I64, B::Lt) => I::I64LtU,
        (WasmType::I64, B::Le) if signed => I::I64LeS,
        (WasmType::I64, B::Le) => I::I64LeU,
        (WasmType::I64, B::Gt) if signed => I::I64GtS,
        (WasmType::I64, B::Gt) => I::I64GtU,
        (WasmType::I64, B::Ge) if signed => I::I64GeS,
        (WasmType::I64, B::Ge) => I::I64GeU,
        (WasmType::I64, B::BitOr) => I::I64Or,
        (WasmType::I64, B::BitXor) => I::I64Xor,
        (WasmType::I64, B::BitAnd) => I::I64And,
        (WasmType::I64, B::Shl) => I::I64Shl,
        (WasmType::I64, B::Shr) if signed => I::I64ShrS,
        (WasmType::I64, B::Shr) => I::I64ShrU,

        (WasmType::F32, B::Add) => I::F32Add,
        (WasmType::F32, B::Sub) => I::F32Sub,
        (WasmType::F32, B::Mul) => I::F32Mul,
        (WasmType::F32, B::Div) => I::F32Div,
        (WasmType::F32, B::Eq) => I::F32Eq,
        (WasmType::F32, B::Ne) => I::F32Ne,
        (WasmType::F32, B::Lt) => I::F32Lt,
        (WasmType::F32, B::Le) => I::F32Le,
        (WasmType::F32, B::Gt) => I::F32Gt,
        (WasmType::F32, B::Ge) => I::F32Ge,

        (WasmType::F64, B::Add) => I::F64Add,
        (WasmType::F64, B::Sub) => I::F64Sub,
        (WasmType::F64, B::Mul) => I::F64Mul,
        (WasmType::F64, B::Div) => I::F64Div,
        (WasmType::F64, B::Eq) => I::F64Eq,
        (WasmType::F64, B::Ne) => I::F64Ne,
        (WasmType::F64, B::Lt) => I::F64Lt,
        (WasmType::F64, B::Le) => I::F64Le,
        (WasmType::F64, B::Gt) => I::F64Gt,
        (WasmType::F64, B::Ge) => I::F64Ge,

        _ => {
            return Err(TypeCheckError::InvalidOperator {
                type_name: operand_ty.display_name(classes),
                op: op.to_string(),
                range,
            })
        }
    };
    func.push(insn);
    Ok(())
}
