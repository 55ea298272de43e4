//! Source-to-AST front end: lexer, recursive-descent parser, and the AST
//! builder (C1) that reshapes its flat operator/suffix output into a
//! precedence-correct, arena-stored tree.

pub mod builder;
pub mod errors;
pub mod lexer;
pub mod location;
pub mod nodes;
pub mod ops;
pub mod parse_tree;
pub mod parser;

pub use errors::SyntaxError;
pub use location::{FileId, FileTable, Position, Range};
pub use nodes::{Ast, ElseBranch, Expr, ExprId, ExprKind, Param, Stmt, StmtId, StmtKind};
pub use ops::{BinaryOp, PrefixOp};

/// Parses `src` (already interned as `file` in `files`) straight into an
/// [`Ast`]. Combines the parser and C1 builder in one call; kept separate
/// internally so each stage stays independently testable.
pub fn parse_source(src: &str, file: FileId) -> Result<Ast, SyntaxError> {
    let tree = parser::parse(src, file)?;
    let mut ast = Ast::new();
    builder::build(&tree, &mut ast);
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(src: &str) -> Ast {
        let mut files = FileTable::new();
        let file = files.intern("test.wl");
        parse_source(src, file).expect("should parse")
    }

    fn top_expr(ast: &Ast, src_stmt_index: usize) -> ExprId {
        match &ast.stmt(ast.top_level[src_stmt_index]).kind {
            StmtKind::ExpressionStmt(e) => *e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn binary_precedence_left_nested() {
        let ast = build("a + 2 * 3;");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "(ADD a (MUL 2 3))");
    }

    #[test]
    fn binary_precedence_right_nested() {
        let ast = build("a * 2 + 3;");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "(ADD (MUL a 2) 3)");
    }

    #[test]
    fn binary_left_associative_chain() {
        let ast = build("a + 2 + 3 + 4;");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "(ADD (ADD (ADD a 2) 3) 4)");
    }

    #[test]
    fn ternary_right_associative() {
        let ast = build("1 ? 2 : 3 ? 4 : 5;");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "(1 ? 2 : (3 ? 4 : 5))");
    }

    #[test]
    fn chained_calls() {
        let ast = build("foo(a)(b)(c);");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "foo(a)(b)(c)");
    }

    #[test]
    fn member_and_call_chain() {
        let ast = build("a.b(c.d, e.f);");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "a.b(c.d, e.f)");
    }

    #[test]
    fn parentheses_collapse() {
        let ast = build("(a + 2) * 3;");
        let e = top_expr(&ast, 0);
        assert_eq!(ast.expr_to_sexpr(e), "(MUL (ADD a 2) 3)");
    }

    #[test]
    fn declare_with_annotation() {
        let ast = build("let a : u32 = 3 >> 4;");
        match &ast.stmt(ast.top_level[0]).kind {
            StmtKind::Declare { name, type_name, .. } => {
                assert_eq!(name, "a");
                assert_eq!(type_name.as_deref(), Some("u32"));
            }
            other => panic!("expected declare, got {other:?}"),
        }
    }
}
