#![warn(clippy::pedantic)]
//! Core orchestration crate for the walang compiler.
//!
//! This crate wires the independently-testable stages into the pipeline a
//! source file actually goes through:
//!
//! ```text
//! source text → lex/parse (F0/F1) → AST (C1) → register (C2/C3) → lower (C4/C5) → wasm bytes + .wat text
//! ```
//!
//! Each stage is also exposed standalone, so an embedder that only needs the
//! registered symbol table (an IDE doing hover/goto-definition, say) isn't
//! forced to run code generation to get it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use walang::compile;
//!
//! let source = "let a : u32 = 3 >> 4;";
//! let (wasm_bytes, wat_text) = compile(source, "example.wl")?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Every public function returns `anyhow::Result`. A failure at any stage —
//! a syntax error, a type error, an internal invariant violation surfaced
//! during lowering — is rendered to a human-readable message (source path,
//! line/column range, and the diagnostic's own text) before being wrapped,
//! so callers that just want to report the failure don't need to match on
//! the underlying typed error at all.

use walang_ast::{Ast, FileId, FileTable};
use walang_type_checker::SymbolTable;

/// A parsed source file: its [`Ast`] plus the interned [`FileTable`] its
/// ranges refer back into.
pub struct Parsed {
    pub ast: Ast,
    pub files: FileTable,
    pub file: FileId,
}

/// Lexes and parses `source_code`, then reshapes the parse tree into an
/// [`Ast`] (C1). `file_name` is used only for diagnostics and the default
/// `.wat` output naming — it need not exist on disk.
///
/// # Errors
///
/// Returns an error if `source_code` contains a lexing or parsing failure;
/// the message includes the offending source range.
pub fn parse(source_code: &str, file_name: &str) -> anyhow::Result<Parsed> {
    let mut files = FileTable::new();
    let file = files.intern(file_name);
    let ast = walang_ast::parse_source(source_code, file)
        .map_err(|e| anyhow::anyhow!("{}", e.render(&files)))?;
    Ok(Parsed { ast, files, file })
}

/// Registers every top-level declaration (globals, functions, classes) into
/// a fresh [`SymbolTable`] (C2/C3), checking for redefinition and recursive
/// class members along the way.
///
/// # Errors
///
/// Returns an error on the first semantic violation found among top-level
/// declarations — redefinition, a self-recursive class, or an unresolvable
/// type annotation.
pub fn register(parsed: &Parsed) -> anyhow::Result<SymbolTable> {
    let mut symbols = SymbolTable::new();
    walang_type_checker::register_top_level(&parsed.ast, &mut symbols)
        .map_err(|e| anyhow::anyhow!("{}", e.render(&parsed.files)))?;
    Ok(symbols)
}

/// Lowers a registered program to a validated `wasm` module (C4/C5),
/// returning both the binary encoding and its `.wat` text rendering.
///
/// # Errors
///
/// Returns an error if lowering hits a type mismatch, an unresolved
/// identifier, a misplaced `break`/`continue`, or any other semantic
/// violation that only a function body (rather than a top-level signature)
/// can expose; also returns an error if the assembled module fails `wasm`
/// validation.
pub fn codegen(parsed: &Parsed, symbols: &SymbolTable) -> anyhow::Result<(Vec<u8>, String)> {
    walang_wasm_codegen::compile(&parsed.ast, symbols, &parsed.files)
}

/// Runs the full pipeline: parse, register, lower. This is the single
/// entry point the CLI uses.
///
/// # Examples
///
/// ```rust,no_run
/// use walang::compile;
///
/// let source = r#"
///     function add(a: i32, b: i32): i32 {
///         return a + b;
///     }
///     let sum : i32 = add(1, 2);
/// "#;
/// let (wasm_bytes, wat_text) = compile(source, "example.wl")?;
/// assert!(!wasm_bytes.is_empty());
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error from whichever stage fails first — see [`parse`],
/// [`register`], and [`codegen`].
pub fn compile(source_code: &str, file_name: &str) -> anyhow::Result<(Vec<u8>, String)> {
    let parsed = parse(source_code, file_name)?;
    let symbols = register(&parsed)?;
    codegen(&parsed, &symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_global_with_unsigned_shift() {
        let (bytes, wat) = compile("let a : u32 = 3 >> 4;", "test.wl").unwrap();
        assert!(!bytes.is_empty());
        assert!(wat.contains("i32.shr_u"));
    }

    #[test]
    fn reports_a_rendered_type_error() {
        let err = compile(
            "function foo(a:i32):void{} foo(1.5);",
            "test.wl",
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cannot convert"));
        assert!(message.contains("test.wl"));
    }

    #[test]
    fn reports_a_rendered_syntax_error() {
        let err = parse("let a : = 3;", "test.wl").unwrap_err();
        assert!(err.to_string().contains("test.wl"));
    }
}
