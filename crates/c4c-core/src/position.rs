//! Source locations.
//!
//! A [`Position`] names a point in a source file by line, column and byte
//! offset. A [`PositionRange`] is the half-open span between two positions
//! and is what every token carries.

use std::{fmt, sync::Arc};

/// A point in a named source file.
///
/// `line` is one-based, `column` and `byte_offset` are zero-based. Columns
/// count Unicode scalar values, byte offsets count UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use c4c_core::position::Position;
///
/// let pos = Position::new("main.c4", 2, 4, 17);
/// assert_eq!(pos.line(), 2);
/// assert_eq!(pos.to_string(), "main.c4:2:4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    file: Arc<str>,
    line: usize,
    column: usize,
    byte_offset: usize,
}

impl Position {
    pub fn new(file: impl Into<Arc<str>>, line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            byte_offset,
        }
    }

    /// The start of `file`: line 1, column 0, byte 0.
    pub fn start_of(file: impl Into<Arc<str>>) -> Self {
        Self::new(file, 1, 0, 0)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Shared handle to the file name, cheap to clone into new positions.
    pub fn file_handle(&self) -> &Arc<str> {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A half-open span `[start, end)` inside one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionRange {
    start: Position,
    end: Position,
}

impl PositionRange {
    /// Creates a range from two positions.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the positions belong to different files or
    /// `end` precedes `start`.
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert_eq!(start.file, end.file, "range spans two files");
        debug_assert!(
            start.byte_offset <= end.byte_offset,
            "range end precedes its start"
        );
        Self { start, end }
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn file(&self) -> &str {
        self.start.file()
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.byte_offset - self.start.byte_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte offsets covered by this range, for slicing source text.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start.byte_offset..self.end.byte_offset
    }

    /// Returns the text of `source` covered by this range.
    ///
    /// Returns `None` if the range does not fall on character boundaries of
    /// `source`, which happens when the range belongs to a different file.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.byte_range())
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {} col {} + next {} bytes)",
            self.start.file,
            self.start.line,
            self.start.column,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = Position::new("workspace.c4", 3, 7, 42);
        assert_eq!(pos.to_string(), "workspace.c4:3:7");
    }

    #[test]
    fn test_start_of() {
        let pos = Position::start_of("a.c4");
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.column(), 0);
        assert_eq!(pos.byte_offset(), 0);
        assert_eq!(pos.file(), "a.c4");
    }

    #[test]
    fn test_range_len_and_slice() {
        let source = "say \"👍\" now";
        let range = PositionRange::new(
            Position::new("f", 1, 4, 4),
            Position::new("f", 1, 7, 10),
        );
        assert_eq!(range.len(), 6);
        assert_eq!(range.slice(source), Some("\"👍\""));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_range_slice_off_boundary() {
        let source = "👍";
        let range = PositionRange::new(Position::new("f", 1, 0, 1), Position::new("f", 1, 1, 3));
        assert_eq!(range.slice(source), None);
    }

    #[test]
    fn test_range_display() {
        let range = PositionRange::new(
            Position::new("main.c4", 2, 0, 9),
            Position::new("main.c4", 2, 8, 17),
        );
        assert_eq!(range.to_string(), "main.c4 (line 2 col 0 + next 8 bytes)");
    }
}
