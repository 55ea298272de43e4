//! Type registry (C2), symbol tables (C3), and the semantic resolver (C4).
//!
//! This crate never touches `wasm`; `walang-wasm-codegen` drives these
//! types during its top-down AST walk and does the actual emission (C5).

pub mod errors;
pub mod register;
pub mod resolver;
pub mod symbol_table;
pub mod types;

pub use errors::TypeCheckError;
pub use register::register_top_level;
pub use resolver::{
    resolve_call_target, resolve_member, resolve_name, scalar_global_name, CallTarget, Symbol,
};
pub use symbol_table::{FunctionInfo, GlobalInfo, LabelStack, LocalScope, SymbolTable};
pub use types::{
    builtin_from_name, member_scalar_offset, ClassInfo, ConvertMismatch, IrType, SignatureType, WasmType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use walang_ast::{parse_source, FileTable};

    fn parse(src: &str) -> (walang_ast::Ast, FileTable) {
        let mut files = FileTable::new();
        let file = files.intern("test.wl");
        (parse_source(src, file).unwrap(), files)
    }

    #[test]
    fn registers_global_with_explicit_annotation() {
        let (ast, _) = parse("let a : u32 = 3 >> 4;");
        let mut symbols = SymbolTable::new();
        register_top_level(&ast, &mut symbols).unwrap();
        assert_eq!(symbols.globals["a"].ty, IrType::U32);
    }

    #[test]
    fn duplicate_class_member_is_redefined_symbol() {
        let (ast, _) = parse("class A { a:i32; a:f32; }");
        let mut symbols = SymbolTable::new();
        let err = register_top_level(&ast, &mut symbols).unwrap_err();
        assert!(matches!(err, TypeCheckError::RedefinedSymbol { name, .. } if name == "a"));
    }

    #[test]
    fn self_recursive_class_member_is_rejected() {
        let (ast, _) = parse("class A { a:A; }");
        let mut symbols = SymbolTable::new();
        let err = register_top_level(&ast, &mut symbols).unwrap_err();
        assert!(matches!(err, TypeCheckError::RecursiveDefinedSymbol { name, .. } if name == "A"));
    }

    #[test]
    fn condition_placeholder_rejects_non_integer_target() {
        let mut cond = IrType::Condition(None);
        assert!(cond.try_resolve_to(&IrType::F32).is_err());
        let mut cond2 = IrType::Condition(None);
        assert_eq!(cond2.try_resolve_to(&IrType::I32).unwrap(), IrType::I32);
    }

    #[test]
    fn auto_placeholder_latches_once() {
        let mut auto = IrType::Auto(None);
        assert_eq!(auto.try_resolve_to(&IrType::F32).unwrap(), IrType::F32);
        assert!(auto.try_resolve_to(&IrType::I32).is_err());
    }
}
