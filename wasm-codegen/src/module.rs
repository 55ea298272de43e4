//! Module-level context (C5): pre-registers every function/method/global as
//! a `wasm` index before any body is lowered, so forward references and the
//! synthesized entry function resolve identically to ordinary calls.

use rustc_hash::FxHashMap;
use wasm_encoder::{
    CodeSection, ConstExpr, ExportKind, ExportSection, Function, FunctionSection, GlobalSection,
    GlobalType, Module, TypeSection, ValType,
};
use walang_ast::{Ast, FileTable, StmtKind};
use walang_type_checker::{IrType, SymbolTable, WasmType};

/// The single function `walang` exports, per the non-goal that rules out
/// imports/exports beyond one entry point.
pub const ENTRY_NAME: &str = "_start";

pub fn wasm_val_type(ty: WasmType) -> Option<ValType> {
    match ty {
        WasmType::I32 => Some(ValType::I32),
        WasmType::I64 => Some(ValType::I64),
        WasmType::F32 => Some(ValType::F32),
        WasmType::F64 => Some(ValType::F64),
        WasmType::None => None,
    }
}

pub struct ModuleCtx<'a> {
    pub ast: &'a Ast,
    pub symbols: &'a SymbolTable,
    pub files: &'a FileTable,
    types: TypeSection,
    funcs: FunctionSection,
    globals: GlobalSection,
    exports: ExportSection,
    code: CodeSection,
    func_index: FxHashMap<String, u32>,
    global_index: FxHashMap<String, u32>,
    next_type: u32,
    next_func: u32,
    next_global: u32,
}

impl<'a> ModuleCtx<'a> {
    #[must_use]
    pub fn new(ast: &'a Ast, symbols: &'a SymbolTable, files: &'a FileTable) -> Self {
        Self {
            ast,
            symbols,
            files,
            types: TypeSection::new(),
            funcs: FunctionSection::new(),
            globals: GlobalSection::new(),
            exports: ExportSection::new(),
            code: CodeSection::new(),
            func_index: FxHashMap::default(),
            global_index: FxHashMap::default(),
            next_type: 0,
            next_func: 0,
            next_global: 0,
        }
    }

    #[must_use]
    pub fn func_index(&self, mangled_name: &str) -> u32 {
        self.func_index[mangled_name]
    }

    #[must_use]
    pub fn global_index(&self, scalar_name: &str) -> u32 {
        self.global_index[scalar_name]
    }

    /// Registers a type+function entry for `mangled_name`, returning its
    /// function index. Must run before any body referencing it is lowered.
    pub fn declare_function(&mut self, mangled_name: &str, params: &[ValType], results: &[ValType]) -> u32 {
        let type_idx = self.next_type;
        self.types.ty().function(params.iter().copied(), results.iter().copied());
        self.next_type += 1;

        self.funcs.function(type_idx);
        let func_idx = self.next_func;
        self.next_func += 1;
        self.func_index.insert(mangled_name.to_string(), func_idx);
        func_idx
    }

    /// Registers one physical `wasm` global per scalar slot of `scalar_names`,
    /// zero-initialised (any non-constant initializer runs later, inside the
    /// synthesized entry function, as ordinary `global.set` side effects).
    pub fn declare_global_slots(&mut self, scalar_names: &[(String, WasmType)]) {
        for (name, wty) in scalar_names {
            let val_type = wasm_val_type(*wty).expect("global slot type must be scalar");
            let init = match val_type {
                ValType::I32 => ConstExpr::i32_const(0),
                ValType::I64 => ConstExpr::i64_const(0),
                ValType::F32 => ConstExpr::f32_const(0.0),
                ValType::F64 => ConstExpr::f64_const(0.0),
                _ => unreachable!("global slots are always numeric scalars"),
            };
            self.globals.global(GlobalType { val_type, mutable: true, shared: false }, &init);
            let idx = self.next_global;
            self.next_global += 1;
            self.global_index.insert(name.clone(), idx);
        }
    }

    pub fn export_function(&mut self, name: &str, mangled_name: &str) {
        let idx = self.func_index(mangled_name);
        self.exports.export(name, ExportKind::Func, idx);
    }

    pub fn push_function_body(&mut self, body: Function) {
        self.code.function(&body);
    }

    /// Assembles the finished `wasm` module and validates it. A validation
    /// failure here means the lowering passes produced an internally
    /// inconsistent module — not a source-level diagnostic, so it is
    /// reported via `anyhow` rather than [`TypeCheckError`].
    pub fn finish(self) -> anyhow::Result<Vec<u8>> {
        let mut module = Module::new();
        module.section(&self.types);
        module.section(&self.funcs);
        module.section(&self.globals);
        module.section(&self.exports);
        module.section(&self.code);
        let bytes = module.finish();
        wasmparser::validate(&bytes)?;
        Ok(bytes)
    }
}

/// Every function/method `Ast` statement, in declaration order, paired with
/// its mangled emission name. Used both to pre-register `wasm` indices and
/// to drive body lowering afterward.
pub fn enumerate_functions(ast: &Ast, symbols: &SymbolTable) -> Vec<(String, walang_ast::StmtId, Option<u32>)> {
    let mut out = Vec::new();
    for &id in &ast.top_level {
        match &ast.stmt(id).kind {
            StmtKind::Function { name, .. } => out.push((name.clone(), id, None)),
            StmtKind::Class { name, methods, .. } => {
                let class_id = symbols.classes[name];
                for &method_id in methods {
                    if let StmtKind::Function { name: method_name, .. } = &ast.stmt(method_id).kind {
                        let mangled = format!("{name}.{method_name}");
                        debug_assert!(symbols.class(class_id).methods.contains_key(method_name));
                        out.push((mangled, method_id, Some(class_id)));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// `(name, wasm type)` for every scalar slot a declared type flattens into.
pub fn flatten_scalars(name: &str, ty: &IrType, symbols: &SymbolTable) -> Vec<(String, WasmType)> {
    let slots = ty.underlying(&symbols.class_table).unwrap_or_default();
    slots
        .into_iter()
        .enumerate()
        .map(|(k, wty)| (walang_type_checker::scalar_global_name(name, u32::try_from(k).unwrap_or(u32::MAX)), wty))
        .collect()
}
