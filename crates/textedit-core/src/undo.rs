//! Undo/redo delta records.
//!
//! A record captures the added and removed text spans of one edit together
//! with the cursor/selection state before and after it. Records are immutable
//! once appended; the replay logic lives on
//! [`TextEditor`](crate::TextEditor), which owns the linear record stack and
//! its index.

use crate::coords::{Coordinates, EditorState};

/// One reversible edit delta.
///
/// Invariants, guaranteed by construction: `added_start <= added_end` and
/// `removed_start <= removed_end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoRecord {
    /// Text inserted by the edit (empty if none).
    pub added: String,
    /// Start of the inserted span.
    pub added_start: Coordinates,
    /// End of the inserted span.
    pub added_end: Coordinates,
    /// Text removed by the edit (empty if none).
    pub removed: String,
    /// Start of the removed span.
    pub removed_start: Coordinates,
    /// End of the removed span.
    pub removed_end: Coordinates,
    /// Cursor/selection state before the edit.
    pub before: EditorState,
    /// Cursor/selection state after the edit.
    pub after: EditorState,
}

impl UndoRecord {
    /// A record with the given before-state and everything else empty;
    /// the edit operation fills in the rest as it runs.
    pub(crate) fn starting_at(before: EditorState) -> Self {
        Self {
            before,
            ..Self::default()
        }
    }
}

/// The linear undo stack: records in application order.
pub type UndoBuffer = Vec<UndoRecord>;
