//! Semantic resolver (C4): given an expression, the symbol it denotes and
//! its type.
//!
//! Member resolution folds a class member straight into its flattened
//! storage slot here (per the design's `i + k` / `name#k` rules), so C5
//! never has to re-derive layout from a class's member list.

use walang_ast::Range;

use crate::errors::TypeCheckError;
use crate::symbol_table::{LocalId, LocalScope, SymbolTable};
use crate::types::{ClassId, IrType, SignatureType};

/// The storage-location-bearing symbol an expression denotes.
#[derive(Debug, Clone)]
pub enum Symbol {
    Local(LocalId),
    Global(String),
    Function(String),
    /// A class method bound to its receiver; the receiver is lowered first,
    /// then passed as the method's implicit `this` argument.
    Method { receiver: Box<Symbol>, mangled_name: String },
    /// A bare class name in callee position: calling it constructs an instance.
    Constructor(ClassId),
}

#[derive(Debug, Clone)]
pub enum CallTarget {
    Function { name: String, signature: SignatureType },
    Method { receiver: Symbol, mangled_name: String, signature: SignatureType },
    Constructor(ClassId),
}

/// Resolves a bare name: current function's locals, then globals, then
/// functions, then (for constructor-call position) class names.
pub fn resolve_name(
    symbols: &SymbolTable,
    locals: &LocalScope,
    name: &str,
    range: Range,
) -> Result<(Symbol, IrType), TypeCheckError> {
    if let Some((id, ty)) = locals.lookup_typed(name) {
        return Ok((Symbol::Local(id), ty));
    }
    if let Some(g) = symbols.globals.get(name) {
        return Ok((Symbol::Global(name.to_string()), g.ty.clone()));
    }
    if let Some(f) = symbols.functions.get(name) {
        return Ok((
            Symbol::Function(name.to_string()),
            IrType::Signature(Box::new(f.signature.clone())),
        ));
    }
    if let Some(&id) = symbols.classes.get(name) {
        return Ok((Symbol::Constructor(id), IrType::Class(id)));
    }
    Err(TypeCheckError::UnknownSymbol { name: name.to_string(), range })
}

/// Resolves `receiver.member_name`: a data member folds to a sub-location
/// of the receiver's storage; a method name resolves to the bound method.
pub fn resolve_member(
    symbols: &SymbolTable,
    receiver_symbol: Symbol,
    receiver_ty: &IrType,
    member_name: &str,
    range: Range,
) -> Result<(Symbol, IrType), TypeCheckError> {
    let class_id = match receiver_ty.concrete() {
        Some(IrType::Class(id)) => *id,
        _ => return Err(TypeCheckError::UnknownSymbol { name: member_name.to_string(), range }),
    };
    let class = symbols.class(class_id);
    if let Some(idx) = class.member_index(member_name) {
        let member_ty = class.members[idx].1.clone();
        let offset = crate::types::member_scalar_offset(&symbols.class_table, class, idx);
        let sym = match receiver_symbol {
            Symbol::Local(base) => Symbol::Local(base + offset),
            Symbol::Global(name) => Symbol::Global(scalar_global_name(&name, offset)),
            other => other,
        };
        Ok((sym, member_ty))
    } else if let Some(method) = class.methods.get(member_name) {
        Ok((
            Symbol::Method { receiver: Box::new(receiver_symbol), mangled_name: method.mangled_name.clone() },
            IrType::Signature(Box::new(method.signature.clone())),
        ))
    } else {
        Err(TypeCheckError::UnknownSymbol { name: member_name.to_string(), range })
    }
}

/// `name` for scalar offset 0, `name#k` beyond that — the same convention
/// [`crate::symbol_table::LocalScope::declare`] uses for flattened locals,
/// so a class's first scalar slot never carries a spurious `#0` suffix.
#[must_use]
pub fn scalar_global_name(name: &str, offset: u32) -> String {
    if offset == 0 {
        name.to_string()
    } else {
        format!("{name}#{offset}")
    }
}

/// Resolves a callee symbol/type into what kind of call this is.
pub fn resolve_call_target(
    callee_symbol: Symbol,
    callee_ty: &IrType,
    range: Range,
) -> Result<CallTarget, TypeCheckError> {
    match (callee_symbol, callee_ty) {
        (Symbol::Function(name), IrType::Signature(sig)) => {
            Ok(CallTarget::Function { name, signature: (**sig).clone() })
        }
        (Symbol::Method { receiver, mangled_name }, IrType::Signature(sig)) => {
            Ok(CallTarget::Method { receiver: *receiver, mangled_name, signature: (**sig).clone() })
        }
        (Symbol::Constructor(id), _) => Ok(CallTarget::Constructor(id)),
        _ => Err(TypeCheckError::CannotResolveSymbol { range }),
    }
}
