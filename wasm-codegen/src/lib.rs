#![warn(clippy::pedantic)]
//! Backend (C5): turns a registered [`Ast`]/[`SymbolTable`] pair into a
//! validated `wasm` module, plus its `.wat` text rendering.
//!
//! ## Pipeline
//!
//! 1. [`ModuleCtx::new`] pre-registers every function, method, and global
//!    scalar slot as a `wasm` index — see `module::enumerate_functions` and
//!    `module::flatten_scalars` — so a forward call or a global read
//!    anywhere in the program resolves to an index already assigned before
//!    any body is lowered.
//! 2. Each function/method body is lowered independently with its own
//!    [`FuncCtx`] (`func::FuncCtx`), walking statements (`stmt::lower_stmt`)
//!    and expressions (`expr::lower_expr`).
//! 3. A synthesized entry function (`module::ENTRY_NAME`) lowers every
//!    top-level statement that is not itself a declaration, plus the
//!    `global.set` side effect of each global's initializer, in source
//!    order — the single exported function this backend ever produces.
//! 4. [`ModuleCtx::finish`] assembles and validates the module.
//!
//! [`Ast`]: walang_ast::Ast
//! [`SymbolTable`]: walang_type_checker::SymbolTable

pub mod expr;
pub mod func;
pub mod module;
pub mod ops;
pub mod stmt;
pub mod storage;

use wasm_encoder::{Function, Instruction, ValType};
use walang_ast::{Ast, FileTable, StmtKind};
use walang_type_checker::{SymbolTable, TypeCheckError};

pub use func::FuncCtx;
pub use module::{ModuleCtx, ENTRY_NAME};

/// Compiles a fully registered program to `wasm` bytes and its `.wat` text.
///
/// `ast`/`symbols` must already have passed
/// [`walang_type_checker::register_top_level`] — this crate only lowers,
/// it never registers top-level names itself.
pub fn compile(ast: &Ast, symbols: &SymbolTable, files: &FileTable) -> anyhow::Result<(Vec<u8>, String)> {
    let mut module = ModuleCtx::new(ast, symbols, files);

    for (mangled_name, stmt_id, owning_class) in module::enumerate_functions(ast, symbols) {
        let (params, results) = function_signature(ast, stmt_id, owning_class, symbols);
        module.declare_function(&mangled_name, &params, &results);
    }
    for (name, info) in &symbols.globals {
        let scalars = module::flatten_scalars(name, &info.ty, symbols);
        module.declare_global_slots(&scalars);
    }

    for (_, stmt_id, owning_class) in module::enumerate_functions(ast, symbols) {
        let body = lower_function_body(&mut module, ast, symbols, stmt_id, owning_class)
            .map_err(|e| anyhow::anyhow!("{}", e.render(files)))?;
        module.push_function_body(body);
    }

    let entry_body =
        lower_entry(&mut module, ast, symbols).map_err(|e| anyhow::anyhow!("{}", e.render(files)))?;
    module.push_function_body(entry_body);
    module.export_function(ENTRY_NAME, ENTRY_NAME);

    let bytes = module.finish()?;
    let text = wasmprinter::print_bytes(&bytes)?;
    Ok((bytes, text))
}

fn function_signature(
    ast: &Ast,
    stmt_id: walang_ast::StmtId,
    owning_class: Option<u32>,
    symbols: &SymbolTable,
) -> (Vec<ValType>, Vec<ValType>) {
    let signature = match (&ast.stmt(stmt_id).kind, owning_class) {
        (StmtKind::Function { name, .. }, None) => &symbols.functions[name].signature,
        (StmtKind::Function { name, .. }, Some(class_id)) => &symbols.class(class_id).methods[name].signature,
        _ => unreachable!("enumerate_functions only yields Function statements"),
    };
    let params = signature
        .params
        .iter()
        .flat_map(|p| p.underlying(&symbols.class_table).unwrap_or_default())
        .filter_map(module::wasm_val_type)
        .collect();
    let results = signature
        .return_type
        .underlying(&symbols.class_table)
        .unwrap_or_default()
        .into_iter()
        .filter_map(module::wasm_val_type)
        .collect();
    (params, results)
}

fn lower_function_body(
    module: &mut ModuleCtx,
    ast: &Ast,
    symbols: &SymbolTable,
    stmt_id: walang_ast::StmtId,
    owning_class: Option<u32>,
) -> Result<Function, TypeCheckError> {
    let StmtKind::Function { params, return_type, body, .. } = &ast.stmt(stmt_id).kind else {
        unreachable!("enumerate_functions only yields Function statements")
    };
    let range = ast.stmt(stmt_id).range;
    let return_ty = match return_type {
        Some(name) => walang_type_checker::builtin_from_name(name)
            .or_else(|| symbols.classes.get(name).map(|&id| walang_type_checker::IrType::Class(id)))
            .ok_or(TypeCheckError::UnknownSymbol { name: name.clone(), range })?,
        None => walang_type_checker::IrType::None,
    };
    let mut ctx = FuncCtx::new(symbols, return_ty, owning_class);

    if let Some(class_id) = owning_class {
        ctx.locals.declare("this", walang_type_checker::IrType::Class(class_id), &symbols.class_table);
    }
    for p in params {
        let ty = walang_type_checker::builtin_from_name(&p.type_name)
            .or_else(|| symbols.classes.get(&p.type_name).map(|&id| walang_type_checker::IrType::Class(id)))
            .ok_or(TypeCheckError::UnknownSymbol { name: p.type_name.clone(), range })?;
        ctx.locals.declare(&p.name, ty, &symbols.class_table);
    }
    // every physical slot declared above is a parameter (or the implicit
    // `this`) and already counted in the function's `wasm` param list —
    // only slots declared from here on belong in the `locals` section.
    let param_slot_count = ctx.locals.locals.len();

    let mut insns = Vec::new();
    stmt::lower_stmt(&mut ctx, module, ast, *body, &mut insns, 0)?;
    insns.push(Instruction::End);

    let local_types = ctx
        .locals
        .locals
        .iter()
        .skip(param_slot_count)
        .filter_map(|entry| module::wasm_val_type(entry.ty.clone()))
        .map(|vt| (1, vt));
    let mut func = Function::new(local_types);
    for insn in insns {
        func.instruction(&insn);
    }
    Ok(func)
}

/// Lowers the synthesized `_start` body: every top-level statement that
/// isn't a `Declare` (those only establish the global's zero-initialised
/// slot, handled by `ModuleCtx::declare_global_slots`) runs here in source
/// order, with each global's initializer expression lowered as an ordinary
/// assignment.
fn lower_entry(module: &mut ModuleCtx, ast: &Ast, symbols: &SymbolTable) -> Result<Function, TypeCheckError> {
    let mut ctx = FuncCtx::new(symbols, walang_type_checker::IrType::None, None);
    let mut insns = Vec::new();
    for &id in &ast.top_level {
        match &ast.stmt(id).kind {
            StmtKind::Function { .. } | StmtKind::Class { .. } => {}
            StmtKind::Declare { name, init, .. } => {
                let global_ty = symbols.globals[name].ty.clone();
                let mut actual = expr::lower_expr_with_expected(
                    &mut ctx,
                    module,
                    ast,
                    *init,
                    &mut insns,
                    Some(&global_ty),
                )?;
                let range = ast.stmt(id).range;
                let final_ty = actual.try_resolve_to(&global_ty).map_err(|m| TypeCheckError::TypeConvertError {
                    from: m.from.display_name(&symbols.class_table),
                    to: m.to.display_name(&symbols.class_table),
                    range,
                })?;
                let count = final_ty.underlying(&symbols.class_table).unwrap_or_default().len() as u32;
                storage::emit_write(module, &mut insns, &walang_type_checker::Symbol::Global(name.clone()), count);
            }
            _ => stmt::lower_stmt(&mut ctx, module, ast, id, &mut insns, 0)?,
        }
    }
    insns.push(Instruction::End);

    let local_types =
        ctx.locals.locals.iter().filter_map(|entry| module::wasm_val_type(entry.ty.clone())).map(|vt| (1, vt));
    let mut func = Function::new(local_types);
    for insn in insns {
        func.instruction(&insn);
    }
    Ok(func)
}
