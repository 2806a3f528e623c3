//! Headless text-editing engine for embedding a code editor.
//!
//! The crate models a document as lines of [`Glyph`]s (one byte plus its
//! syntax classification), addressed by display-aware [`Coordinates`] whose
//! column accounts for tab stops and multi-byte UTF-8 characters.
//! [`TextEditor`] layers cursor and selection state, the full set of editing
//! operations, a delta-based undo/redo log and an incremental syntax
//! colorizer on top of the [`TextBuffer`]. Language syntax is described by
//! [`textedit_lang::LanguageDefinition`].
//!
//! There is no rendering, input handling or clipboard access here; a host
//! widget draws the glyphs and feeds events in. `copy`/`cut`/`paste` work in
//! terms of plain strings for the host to shuttle to its clipboard.
//!
//! ```
//! use textedit_core::{Coordinates, TextEditor};
//! use textedit_lang::LanguageDefinition;
//!
//! let mut editor = TextEditor::new();
//! editor.set_language_definition(LanguageDefinition::cpp());
//! editor.set_text("int main() {\n\treturn 0;\n}\n");
//! editor.set_cursor_position(Coordinates::new(1, 0));
//! editor.enter_char('\t', false);
//! editor.colorize_now();
//! assert_eq!(editor.current_line_text(), "\t\treturn 0;");
//! editor.undo(1);
//! assert_eq!(editor.current_line_text(), "\treturn 0;");
//! ```

#![warn(missing_docs)]

mod annotations;
mod buffer;
mod colorizer;
mod coords;
mod editor;
mod glyph;
mod undo;

pub use annotations::{Breakpoints, ErrorLocation, ErrorMarker, ErrorMarkers, LineAnnotations};
pub use buffer::{MAX_TAB_SIZE, TextBuffer};
pub use coords::{Coordinates, EditorState, SelectionMode};
pub use editor::TextEditor;
pub use glyph::{Glyph, Line, is_utf8_continuation, utf8_char_length};
pub use undo::{UndoBuffer, UndoRecord};

pub use textedit_lang;
