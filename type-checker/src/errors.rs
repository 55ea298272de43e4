//! Diagnostics (C6): a closed set of semantic error kinds, each carrying a
//! source range, rendered the same way regardless of kind.

use thiserror::Error;
use walang_ast::Range;

#[derive(Debug, Clone, Error)]
pub enum TypeCheckError {
    #[error("cannot convert `{from}` to `{to}`")]
    TypeConvertError { from: String, to: String, range: Range },

    #[error("invalid operator `{op}` for type `{type_name}`")]
    InvalidOperator { type_name: String, op: String, range: Range },

    #[error("expected {expected} argument(s), found {actual}")]
    ArgumentCountError { expected: usize, actual: usize, range: Range },

    #[error("`{which}` outside any loop")]
    JumpStatementError { which: String, range: Range },

    #[error("`{name}` is already defined in this scope")]
    RedefinedSymbol { name: String, range: Range },

    #[error("unknown symbol `{name}`")]
    UnknownSymbol { name: String, range: Range },

    #[error("`{name}` recursively contains itself")]
    RecursiveDefinedSymbol { name: String, range: Range },

    #[error("could not resolve a placeholder type")]
    CannotResolveSymbol { range: Range },

    #[error("cannot infer a type for this expression")]
    CannotInferType { range: Range },

    #[error("`{name}` decorator error")]
    ErrorDecorator { name: String, range: Range },
}

impl TypeCheckError {
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            TypeCheckError::TypeConvertError { range, .. }
            | TypeCheckError::InvalidOperator { range, .. }
            | TypeCheckError::ArgumentCountError { range, .. }
            | TypeCheckError::JumpStatementError { range, .. }
            | TypeCheckError::RedefinedSymbol { range, .. }
            | TypeCheckError::UnknownSymbol { range, .. }
            | TypeCheckError::RecursiveDefinedSymbol { range, .. }
            | TypeCheckError::CannotResolveSymbol { range }
            | TypeCheckError::CannotInferType { range }
            | TypeCheckError::ErrorDecorator { range, .. } => *range,
        }
    }

    /// `"<message> \n\t<file>:<startLine>:<startCol+1> - <file>:<endLine>:<endCol+1>"`.
    #[must_use]
    pub fn render(&self, files: &walang_ast::FileTable) -> String {
        format!("{self} \n\t{}", walang_ast::location::render_range(files, self.range()))
    }
}
