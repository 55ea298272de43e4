//! Lexing/parsing/AST-building errors.
//!
//! These are distinct from the semantic diagnostics raised by
//! `walang-type-checker` (C6): a syntax error means no AST was built at all.

use thiserror::Error;

use crate::location::Range;

#[derive(Debug, Clone, Error)]
pub enum SyntaxError {
    #[error("unexpected character {found:?}")]
    UnexpectedChar { found: char, range: Range },

    #[error("unterminated token")]
    Unterminated { range: Range },

    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String, range: Range },

    #[error("unexpected end of input")]
    UnexpectedEof { range: Range },
}

impl SyntaxError {
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            SyntaxError::UnexpectedChar { range, .. }
            | SyntaxError::Unterminated { range, .. }
            | SyntaxError::UnexpectedToken { range, .. }
            | SyntaxError::UnexpectedEof { range } => *range,
        }
    }

    /// Same rendering convention as `TypeCheckError::render` — message, then
    /// the source range on an indented second line.
    #[must_use]
    pub fn render(&self, files: &crate::location::FileTable) -> String {
        format!("{self} \n\t{}", crate::location::render_range(files, self.range()))
    }
}
