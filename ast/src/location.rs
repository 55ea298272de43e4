//! Source locations.
//!
//! Ranges carry a [`FileId`] that indexes a [`FileTable`] rather than a
//! back-reference to the file itself, so an AST node's range never needs a
//! weak pointer to stay alive independently of its source.

use std::fmt;

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Index into a [`FileTable`]; stands in for the source's weak file reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u32);

/// A half-open source span, 0-based internally and rendered 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub file: FileId,
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(file: FileId, start: Position, end: Position) -> Self {
        Self { file, start, end }
    }

    /// Smallest range that spans both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Range) -> Range {
        Range { file: self.file, start: self.start, end: other.end }
    }
}

/// Interns file names so [`Range`] can carry a small index instead of a path.
#[derive(Debug, Default)]
pub struct FileTable {
    names: Vec<String>,
}

impl FileTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: impl Into<String>) -> FileId {
        let id = FileId(u32::try_from(self.names.len()).expect("file table overflow"));
        self.names.push(name.into());
        id
    }

    #[must_use]
    pub fn name(&self, id: FileId) -> &str {
        &self.names[id.0 as usize]
    }
}

/// Renders `file:startLine:startCol - file:endLine:endCol`, 1-based.
pub fn render_range(files: &FileTable, range: Range) -> String {
    let file = files.name(range.file);
    format!(
        "{file}:{}:{} - {file}:{}:{}",
        range.start.line + 1,
        range.start.column + 1,
        range.end.line + 1,
        range.end.column + 1
    )
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
