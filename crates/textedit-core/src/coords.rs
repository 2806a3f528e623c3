//! Buffer coordinates and cursor/selection state.
//!
//! A [`Coordinates`] column is a *display* column: tabs expand to the next
//! multiple of the tab size and every other character counts as one column,
//! multi-byte characters included. The byte-cell index inside a line is a
//! separate notion, derived on demand by the buffer (it goes stale after
//! every edit, so it is never stored).

use std::cmp::Ordering;
use std::fmt;

/// A position in the buffer as `(line, display column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Coordinates {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based display column.
    pub column: usize,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl PartialOrd for Coordinates {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinates {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How an interactive selection grows as the cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Character-granular selection.
    #[default]
    Normal,
    /// Selection snaps outward to word boundaries.
    Word,
    /// Selection snaps outward to whole lines.
    Line,
}

/// Cursor and selection snapshot, value-copied into undo records.
///
/// Invariant: `selection_start <= selection_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorState {
    /// Inclusive selection start.
    pub selection_start: Coordinates,
    /// Exclusive selection end.
    pub selection_end: Coordinates,
    /// The cursor position, independent of the selection anchors.
    pub cursor_position: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_line_major() {
        assert!(Coordinates::new(1, 0) > Coordinates::new(0, 99));
        assert!(Coordinates::new(2, 3) < Coordinates::new(2, 4));
        assert_eq!(Coordinates::new(5, 5), Coordinates::new(5, 5));
    }

    #[test]
    fn display_formats_line_colon_column() {
        assert_eq!(Coordinates::new(3, 14).to_string(), "3:14");
    }
}
