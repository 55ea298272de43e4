//! Top-level registration pass (C2/C3 population): walks a source file's
//! top-level items once, populating globals/functions/classes so that
//! forward references resolve before the lowering walk (C4/C5) begins.

use rustc_hash::FxHashMap;
use walang_ast::{Ast, ExprId, ExprKind, Range, StmtId, StmtKind};

use crate::errors::TypeCheckError;
use crate::symbol_table::{FunctionInfo, GlobalInfo, SymbolTable};
use crate::types::{builtin_from_name, ClassInfo, IrType, MethodInfo, SignatureType};

fn resolve_type_name(symbols: &SymbolTable, name: &str, range: Range) -> Result<IrType, TypeCheckError> {
    if let Some(t) = builtin_from_name(name) {
        return Ok(t);
    }
    if let Some(&id) = symbols.classes.get(name) {
        return Ok(IrType::Class(id));
    }
    Err(TypeCheckError::UnknownSymbol { name: name.to_string(), range })
}

/// Integer/float literal → `I32`/`F32`; a bare constructor call → that
/// class; anything else is not inferrable without an annotation.
fn infer_initializer_type(
    ast: &Ast,
    symbols: &SymbolTable,
    init: ExprId,
) -> Result<IrType, TypeCheckError> {
    let expr = ast.expr(init);
    match &expr.kind {
        ExprKind::IntLiteral(_) => Ok(IrType::I32),
        ExprKind::FloatLiteral(_) => Ok(IrType::F32),
        ExprKind::Call { callee, args: _ } => match &ast.expr(*callee).kind {
            ExprKind::Name(name) if symbols.classes.contains_key(name) => {
                Ok(IrType::Class(symbols.classes[name]))
            }
            _ => Err(TypeCheckError::CannotInferType { range: expr.range }),
        },
        _ => Err(TypeCheckError::CannotInferType { range: expr.range }),
    }
}

fn declare_type(
    ast: &Ast,
    symbols: &SymbolTable,
    type_name: &Option<String>,
    init: ExprId,
    range: Range,
) -> Result<IrType, TypeCheckError> {
    match type_name {
        Some(name) => resolve_type_name(symbols, name, range),
        None => infer_initializer_type(ast, symbols, init),
    }
}

/// Registers every top-level item. Classes are pre-declared empty so
/// mutually-referencing class members and forward function calls resolve,
/// then filled in and checked for self-recursion.
pub fn register_top_level(ast: &Ast, symbols: &mut SymbolTable) -> Result<(), TypeCheckError> {
    for &id in &ast.top_level {
        if let StmtKind::Class { name, .. } = &ast.stmt(id).kind {
            check_fresh_name(symbols, name, ast.stmt(id).range)?;
            let class_id = u32::try_from(symbols.class_table.len()).expect("class table overflow");
            symbols.classes.insert(name.clone(), class_id);
            symbols.class_table.push(ClassInfo {
                name: name.clone(),
                members: Vec::new(),
                methods: FxHashMap::default(),
            });
        }
    }

    for &id in &ast.top_level {
        match &ast.stmt(id).kind {
            StmtKind::Class { .. } => fill_class(ast, id, symbols)?,
            StmtKind::Function { .. } => register_function(ast, id, symbols, None)?,
            StmtKind::Declare { name, type_name, init, .. } => {
                check_fresh_name(symbols, name, ast.stmt(id).range)?;
                let ty = declare_type(ast, symbols, type_name, *init, ast.stmt(id).range)?;
                symbols.globals.insert(name.clone(), GlobalInfo { name: name.clone(), ty });
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_fresh_name(symbols: &SymbolTable, name: &str, range: Range) -> Result<(), TypeCheckError> {
    if symbols.is_name_taken(name) {
        Err(TypeCheckError::RedefinedSymbol { name: name.to_string(), range })
    } else {
        Ok(())
    }
}

fn register_function(
    ast: &Ast,
    stmt_id: StmtId,
    symbols: &mut SymbolTable,
    owning_class: Option<u32>,
) -> Result<(), TypeCheckError> {
    let StmtKind::Function { name, params, return_type, .. } = &ast.stmt(stmt_id).kind else {
        unreachable!("register_function called on non-function statement")
    };
    let range = ast.stmt(stmt_id).range;

    let mut param_types = Vec::new();
    if let Some(class_id) = owning_class {
        param_types.push(IrType::Class(class_id));
    }
    for p in params {
        param_types.push(resolve_type_name(symbols, &p.type_name, range)?);
    }
    let return_ty = match return_type {
        Some(t) => resolve_type_name(symbols, t, range)?,
        None => IrType::None,
    };
    let signature = SignatureType { params: param_types, return_type: return_ty };

    match owning_class {
        None => {
            check_fresh_name(symbols, name, range)?;
            symbols.functions.insert(name.clone(), FunctionInfo { name: name.clone(), signature });
        }
        Some(class_id) => {
            let class_name = symbols.class(class_id).name.clone();
            let mangled = format!("{class_name}.{name}");
            symbols.class_mut(class_id).methods.insert(
                name.clone(),
                MethodInfo { mangled_name: mangled, signature },
            );
        }
    }
    Ok(())
}

fn fill_class(ast: &Ast, stmt_id: StmtId, symbols: &mut SymbolTable) -> Result<(), TypeCheckError> {
    let StmtKind::Class { name, members, methods, .. } = &ast.stmt(stmt_id).kind else {
        unreachable!("fill_class called on non-class statement")
    };
    let range = ast.stmt(stmt_id).range;
    let class_id = symbols.classes[name];

    let mut resolved_members = Vec::new();
    for m in members {
        if resolved_members.iter().any(|(n, _): &(String, IrType)| n == &m.name) {
            return Err(TypeCheckError::RedefinedSymbol { name: m.name.clone(), range });
        }
        let ty = resolve_type_name(symbols, &m.type_name, range)?;
        resolved_members.push((m.name.clone(), ty));
    }
    if contains_class_transitively(symbols, &resolved_members, class_id) {
        return Err(TypeCheckError::RecursiveDefinedSymbol { name: name.clone(), range });
    }
    symbols.class_mut(class_id).members = resolved_members;

    for method in methods {
        register_function(ast, *method, symbols, Some(class_id))?;
    }
    Ok(())
}

fn contains_class_transitively(symbols: &SymbolTable, members: &[(String, IrType)], target: u32) -> bool {
    let mut seen = vec![false; symbols.class_table.len()];
    fn visit(symbols: &SymbolTable, members: &[(String, IrType)], target: u32, seen: &mut [bool]) -> bool {
        for (_, ty) in members {
            if let IrType::Class(id) = ty {
                if *id == target {
                    return true;
                }
                if !seen[*id as usize] {
                    seen[*id as usize] = true;
                    if visit(symbols, &symbols.class(*id).members, target, seen) {
                        return true;
                    }
                }
            }
        }
        false
    }
    visit(symbols, members, target, &mut seen)
}
