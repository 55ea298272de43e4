//! The IR type system (C2): a tagged union of primitive numeric types,
//! composite classes, function signatures, and two deferred-resolution
//! placeholders.
//!
//! Per the design notes, this replaces the virtual-dispatch type base class
//! of the source implementation with a plain enum matched inside the two
//! operator-dispatch functions in `walang-wasm-codegen`; `Auto`/`Condition`
//! are explicit variants that latch through [`IrType::try_resolve_to`]
//! rather than hiding mutable state behind a shared pointer.

use rustc_hash::FxHashMap;

pub type ClassId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WasmType {
    I32,
    I64,
    F32,
    F64,
    None,
}

/// A function or method signature, itself an IR type.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureType {
    pub params: Vec<IrType>,
    pub return_type: IrType,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Mangled emitted function name, e.g. `A.area`.
    pub mangled_name: String,
    pub signature: SignatureType,
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    /// Declaration order; member index doubles as the `Local`/`MemoryData` slot offset.
    pub members: Vec<(String, IrType)>,
    pub methods: FxHashMap<String, MethodInfo>,
}

impl ClassInfo {
    #[must_use]
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|(n, _)| n == name)
    }

    #[must_use]
    pub fn member_type(&self, name: &str) -> Option<&IrType> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// Scalar-slot offset of member `member_idx` within its class's flattened
/// layout: the sum of underlying scalar counts of every earlier member.
/// Reduces to the member index itself when every member is a primitive
/// scalar; generalises correctly when a member is itself a class.
pub fn member_scalar_offset(classes: &[ClassInfo], class: &ClassInfo, member_idx: usize) -> u32 {
    let mut offset = 0u32;
    for (_, ty) in &class.members[..member_idx] {
        offset += u32::try_from(ty.underlying(classes).unwrap_or_default().len()).unwrap_or(0);
    }
    offset
}

/// `from`/`to` of a failed [`IrType::try_resolve_to`], for the caller (which
/// holds the source range) to turn into a `TypeConvertError` diagnostic.
#[derive(Debug, Clone)]
pub struct ConvertMismatch {
    pub from: IrType,
    pub to: IrType,
}

/// The IR type lattice. `Auto`/`Condition` carry their own latch slot so
/// resolution mutates through `&mut self` with no interior mutability
/// needed — the value simply lives inside a mutable map entry until then.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    None,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Class(ClassId),
    Signature(Box<SignatureType>),
    /// Infers from later context; accepts any concrete target on first use.
    Auto(Option<Box<IrType>>),
    /// Resolves to any integer type; used for a ternary condition of unknown width.
    Condition(Option<Box<IrType>>),
}

impl IrType {
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, IrType::I32 | IrType::U32 | IrType::I64 | IrType::U64)
    }

    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, IrType::F32 | IrType::F64)
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, IrType::I32 | IrType::I64)
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, IrType::Auto(None) | IrType::Condition(None))
    }

    /// The concrete type this value currently denotes: itself, unless it is
    /// a latched placeholder, in which case its resolved target.
    #[must_use]
    pub fn concrete(&self) -> Option<&IrType> {
        match self {
            IrType::Auto(Some(t)) | IrType::Condition(Some(t)) => t.concrete(),
            IrType::Auto(None) | IrType::Condition(None) => None,
            other => Some(other),
        }
    }

    /// Attempts to unify `self` with `target`, latching an unresolved
    /// placeholder in place. Returns the resulting concrete type.
    pub fn try_resolve_to(&mut self, target: &IrType) -> Result<IrType, ConvertMismatch> {
        let target_concrete = target.concrete().cloned().unwrap_or_else(|| target.clone());
        match self {
            IrType::Auto(slot @ None) => {
                *slot = Some(Box::new(target_concrete.clone()));
                Ok(target_concrete)
            }
            IrType::Condition(slot @ None) => {
                if !target_concrete.is_integer() {
                    return Err(ConvertMismatch { from: IrType::Condition(None), to: target_concrete });
                }
                *slot = Some(Box::new(target_concrete.clone()));
                Ok(target_concrete)
            }
            IrType::Auto(Some(resolved)) | IrType::Condition(Some(resolved)) => {
                if resolved.as_ref() == &target_concrete {
                    Ok(target_concrete)
                } else {
                    Err(ConvertMismatch { from: resolved.as_ref().clone(), to: target_concrete })
                }
            }
            concrete if *concrete == target_concrete => Ok(concrete.clone()),
            concrete => Err(ConvertMismatch { from: concrete.clone(), to: target_concrete }),
        }
    }

    /// The `wasm` scalar(s) backing this type. Classes flatten to one entry
    /// per member, recursively. An unresolved placeholder is an error: every
    /// placeholder must be latched before code is emitted.
    pub fn underlying(&self, classes: &[ClassInfo]) -> Result<Vec<WasmType>, ()> {
        match self {
            IrType::None => Ok(vec![]),
            IrType::I32 | IrType::U32 => Ok(vec![WasmType::I32]),
            IrType::I64 | IrType::U64 => Ok(vec![WasmType::I64]),
            IrType::F32 => Ok(vec![WasmType::F32]),
            IrType::F64 => Ok(vec![WasmType::F64]),
            IrType::Class(id) => {
                let class = &classes[*id as usize];
                let mut out = Vec::new();
                for (_, member_ty) in &class.members {
                    out.extend(member_ty.underlying(classes)?);
                }
                Ok(out)
            }
            IrType::Signature(_) => Ok(vec![]),
            IrType::Auto(Some(t)) | IrType::Condition(Some(t)) => t.underlying(classes),
            IrType::Auto(None) | IrType::Condition(None) => Err(()),
        }
    }

    #[must_use]
    pub fn display_name(&self, classes: &[ClassInfo]) -> String {
        match self {
            IrType::None => "void".into(),
            IrType::I32 => "i32".into(),
            IrType::U32 => "u32".into(),
            IrType::I64 => "i64".into(),
            IrType::U64 => "u64".into(),
            IrType::F32 => "f32".into(),
            IrType::F64 => "f64".into(),
            IrType::Class(id) => classes[*id as usize].name.clone(),
            IrType::Signature(sig) => format!(
                "({}) -> {}",
                sig.params.iter().map(|p| p.display_name(classes)).collect::<Vec<_>>().join(", "),
                sig.return_type.display_name(classes)
            ),
            IrType::Auto(Some(t)) | IrType::Condition(Some(t)) => t.display_name(classes),
            IrType::Auto(None) => "<auto>".into(),
            IrType::Condition(None) => "<condition>".into(),
        }
    }
}

#[must_use]
pub fn builtin_from_name(name: &str) -> Option<IrType> {
    Some(match name {
        "void" => IrType::None,
        "i32" => IrType::I32,
        "u32" => IrType::U32,
        "i64" => IrType::I64,
        "u64" => IrType::U64,
        "f32" => IrType::F32,
        "f64" => IrType::F64,
        _ => return None,
    })
}

/// The common type two ternary arms unify to: whichever side is already
/// concrete becomes the target the other side (typically a literal's
/// placeholder) latches onto.
pub fn unify(a: &mut IrType, b: &mut IrType) -> Result<IrType, ConvertMismatch> {
    if let Some(ac) = a.concrete().cloned() {
        b.try_resolve_to(&ac)
    } else if let Some(bc) = b.concrete().cloned() {
        a.try_resolve_to(&bc)
    } else {
        Err(ConvertMismatch { from: IrType::Auto(None), to: IrType::Auto(None) })
    }
}
