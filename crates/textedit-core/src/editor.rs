//! The editing engine: cursor/selection state, edit operations, word
//! navigation and the undo/redo surface.
//!
//! All mutation funnels through a handful of entry points that share the same
//! shape: capture an [`UndoRecord`], mutate the buffer, mark the touched line
//! range dirty for recoloring, and set the text-changed flag. Mutating a
//! read-only editor is a contract violation and panics; callers are expected
//! to check [`TextEditor::is_read_only`] first.

use crate::annotations::{Breakpoints, ErrorMarkers};
use crate::buffer::TextBuffer;
use crate::coords::{Coordinates, EditorState, SelectionMode};
use crate::glyph::{Glyph, is_utf8_continuation, utf8_char_length};
use crate::undo::{UndoBuffer, UndoRecord};
use regex::Regex;
use textedit_lang::{LanguageDefinition, PaletteIndex};

/// A headless code-editor engine over a glyph/line buffer.
///
/// The editor owns the document, the annotation sets and the undo log
/// exclusively; collaborators read state and submit edits through the public
/// operations. Rendering, clipboard and input plumbing stay outside: `copy`
/// and `cut` return the text a host would place on its clipboard, `paste`
/// takes it as an argument.
pub struct TextEditor {
    pub(crate) buffer: TextBuffer,
    pub(crate) state: EditorState,
    undo_buffer: UndoBuffer,
    undo_index: usize,
    interactive_start: Coordinates,
    interactive_end: Coordinates,
    read_only: bool,
    overwrite: bool,
    text_changed: bool,
    cursor_position_changed: bool,
    pub(crate) colorizer_enabled: bool,
    pub(crate) check_comments: bool,
    pub(crate) color_range_min: usize,
    pub(crate) color_range_max: usize,
    pub(crate) language: LanguageDefinition,
    pub(crate) regex_list: Vec<(Regex, PaletteIndex)>,
    save_callback: Option<Box<dyn FnMut()>>,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEditor {
    /// An empty editor with no language installed.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            state: EditorState::default(),
            undo_buffer: UndoBuffer::new(),
            undo_index: 0,
            interactive_start: Coordinates::default(),
            interactive_end: Coordinates::default(),
            read_only: false,
            overwrite: false,
            text_changed: false,
            cursor_position_changed: false,
            colorizer_enabled: true,
            check_comments: true,
            color_range_min: usize::MAX,
            color_range_max: 0,
            language: LanguageDefinition::new("None"),
            regex_list: Vec::new(),
            save_callback: None,
        }
    }

    // ---- document access -------------------------------------------------

    /// Read-only access to the underlying buffer (for renderers).
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// The whole document text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Text of `[start, end)`.
    pub fn text_range(&self, start: Coordinates, end: Coordinates) -> String {
        self.buffer.text_range(start, end)
    }

    /// All lines as strings.
    pub fn text_lines(&self) -> Vec<String> {
        self.buffer.text_lines()
    }

    /// Text of the line under the cursor.
    pub fn current_line_text(&self) -> String {
        self.buffer.line_text(self.cursor_position().line)
    }

    /// Replaces the document. The undo buffer is kept.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.text_changed = true;
        self.colorize_all();
    }

    /// Replaces the document from pre-split lines.
    pub fn set_text_lines(&mut self, lines: &[String]) {
        self.buffer.set_text_lines(lines);
        self.text_changed = true;
        self.colorize_all();
    }

    // ---- configuration ---------------------------------------------------

    /// The configured tab size.
    pub fn tab_size(&self) -> usize {
        self.buffer.tab_size()
    }

    /// Sets the tab size, clamped to `[0, 32]`.
    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.buffer.set_tab_size(tab_size);
    }

    /// Whether edits are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Toggles read-only mode.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether typed characters replace instead of insert.
    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Toggles overwrite mode.
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Whether the colorizer assigns palette classes.
    pub fn is_colorizer_enabled(&self) -> bool {
        self.colorizer_enabled
    }

    /// Toggles the colorizer.
    pub fn set_colorizer_enabled(&mut self, enabled: bool) {
        self.colorizer_enabled = enabled;
    }

    /// Whether the document changed since the flag was last reset.
    pub fn is_text_changed(&self) -> bool {
        self.text_changed
    }

    /// Clears the text-changed flag (call once per host frame).
    pub fn reset_text_changed(&mut self) {
        self.text_changed = false;
    }

    /// Whether the cursor or selection moved since the flag was last reset.
    pub fn is_cursor_position_changed(&self) -> bool {
        self.cursor_position_changed
    }

    /// Clears the cursor-moved flag.
    pub fn reset_cursor_position_changed(&mut self) {
        self.cursor_position_changed = false;
    }

    /// The installed language definition.
    pub fn language_definition(&self) -> &LanguageDefinition {
        &self.language
    }

    /// Installs a language definition wholesale: rebuilds the anchored regex
    /// cache from its pattern list (patterns that fail to compile are skipped
    /// and never match) and forces a full recolor.
    pub fn set_language_definition(&mut self, language: LanguageDefinition) {
        self.language = language;
        self.regex_list.clear();
        for (pattern, class) in &self.language.token_patterns {
            if let Ok(regex) = Regex::new(&format!(r"\A(?:{pattern})")) {
                self.regex_list.push((regex, *class));
            }
        }
        self.colorize_all();
    }

    /// Installs the built-in definition registered for a file extension.
    pub fn set_language_from_extension(&mut self, extension: &str) {
        self.set_language_definition(LanguageDefinition::from_extension(extension));
    }

    // ---- annotations -----------------------------------------------------

    /// The breakpoint set.
    pub fn breakpoints(&self) -> &Breakpoints {
        self.buffer.annotations().breakpoints()
    }

    /// Replaces the breakpoint set.
    pub fn set_breakpoints(&mut self, breakpoints: Breakpoints) {
        self.buffer.annotations_mut().set_breakpoints(breakpoints);
    }

    /// Toggles the breakpoint on `line`, returning whether it is now set.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        self.buffer.annotations_mut().toggle_breakpoint(line)
    }

    /// The error markers.
    pub fn error_markers(&self) -> &ErrorMarkers {
        self.buffer.annotations().error_markers()
    }

    /// Replaces the error markers.
    pub fn set_error_markers(&mut self, markers: ErrorMarkers) {
        self.buffer.annotations_mut().set_error_markers(markers);
    }

    // ---- cursor and selection --------------------------------------------

    /// The cursor position, clamped into the document.
    pub fn cursor_position(&self) -> Coordinates {
        self.buffer.sanitize(self.state.cursor_position)
    }

    /// Moves the cursor.
    pub fn set_cursor_position(&mut self, position: Coordinates) {
        if self.state.cursor_position != position {
            self.state.cursor_position = position;
            self.cursor_position_changed = true;
        }
    }

    /// The current `(selection_start, selection_end)` pair.
    pub fn selection(&self) -> (Coordinates, Coordinates) {
        (self.state.selection_start, self.state.selection_end)
    }

    /// Moves the selection start, keeping `start <= end`.
    pub fn set_selection_start(&mut self, position: Coordinates) {
        self.state.selection_start = self.buffer.sanitize(position);
        if self.state.selection_start > self.state.selection_end {
            std::mem::swap(&mut self.state.selection_start, &mut self.state.selection_end);
        }
    }

    /// Moves the selection end, keeping `start <= end`.
    pub fn set_selection_end(&mut self, position: Coordinates) {
        self.state.selection_end = self.buffer.sanitize(position);
        if self.state.selection_start > self.state.selection_end {
            std::mem::swap(&mut self.state.selection_start, &mut self.state.selection_end);
        }
    }

    /// Sets the selection, sanitized and normalized, then snapped outward
    /// according to `mode`.
    pub fn set_selection(&mut self, start: Coordinates, end: Coordinates, mode: SelectionMode) {
        let old_start = self.state.selection_start;
        let old_end = self.state.selection_end;

        self.state.selection_start = self.buffer.sanitize(start);
        self.state.selection_end = self.buffer.sanitize(end);
        if self.state.selection_start > self.state.selection_end {
            std::mem::swap(&mut self.state.selection_start, &mut self.state.selection_end);
        }

        match mode {
            SelectionMode::Normal => {}
            SelectionMode::Word => {
                self.state.selection_start = self.find_word_start(self.state.selection_start);
                if !self.is_on_word_boundary(self.state.selection_end) {
                    self.state.selection_end =
                        self.find_word_end(self.find_word_start(self.state.selection_end));
                }
            }
            SelectionMode::Line => {
                let line = self.state.selection_end.line;
                self.state.selection_start = Coordinates::new(self.state.selection_start.line, 0);
                self.state.selection_end =
                    Coordinates::new(line, self.buffer.line_max_column(line));
            }
        }

        if self.state.selection_start != old_start || self.state.selection_end != old_end {
            self.cursor_position_changed = true;
        }
    }

    /// Collapses the selection.
    pub fn clear_selection(&mut self) {
        self.set_selection(Coordinates::default(), Coordinates::default(), SelectionMode::Normal);
    }

    /// Selects the word under the cursor.
    pub fn select_word_under_cursor(&mut self) {
        let cursor = self.cursor_position();
        self.set_selection(
            self.find_word_start(cursor),
            self.find_word_end(cursor),
            SelectionMode::Normal,
        );
    }

    /// Selects the whole document.
    pub fn select_all(&mut self) {
        self.set_selection(
            Coordinates::new(0, 0),
            Coordinates::new(self.buffer.line_count(), 0),
            SelectionMode::Normal,
        );
    }

    /// Whether the selection is non-empty.
    pub fn has_selection(&self) -> bool {
        self.state.selection_end > self.state.selection_start
    }

    /// Text of the current selection.
    pub fn selected_text(&self) -> String {
        self.buffer
            .text_range(self.state.selection_start, self.state.selection_end)
    }

    // ---- word navigation -------------------------------------------------

    /// Scans left from `from` to the start of the word it sits in. Adjacent
    /// characters belong to the same word iff their palette classes match;
    /// leading whitespace is skipped first.
    pub fn find_word_start(&self, from: Coordinates) -> Coordinates {
        if from.line >= self.buffer.line_count() {
            return from;
        }
        let line = self.buffer.line(from.line);
        let mut cindex = self.buffer.character_index(from);
        if cindex >= line.len() {
            return from;
        }

        while cindex > 0 && line[cindex].byte.is_ascii_whitespace() {
            cindex -= 1;
        }

        let cstart = line[cindex].color;
        while cindex > 0 {
            let byte = line[cindex].byte;
            if !is_utf8_continuation(byte) {
                if byte <= 32 && byte.is_ascii_whitespace() {
                    cindex += 1;
                    break;
                }
                if cstart != line[cindex - 1].color {
                    break;
                }
            }
            cindex -= 1;
        }
        Coordinates::new(from.line, self.buffer.character_column(from.line, cindex))
    }

    /// Scans right from `from` to the end of the word it sits in, skipping
    /// any trailing whitespace run.
    pub fn find_word_end(&self, from: Coordinates) -> Coordinates {
        if from.line >= self.buffer.line_count() {
            return from;
        }
        let line = self.buffer.line(from.line);
        let mut cindex = self.buffer.character_index(from);
        if cindex >= line.len() {
            return from;
        }

        let prevspace = line[cindex].byte.is_ascii_whitespace();
        let cstart = line[cindex].color;
        while cindex < line.len() {
            let byte = line[cindex].byte;
            if cstart != line[cindex].color {
                break;
            }
            if prevspace != byte.is_ascii_whitespace() {
                if byte.is_ascii_whitespace() {
                    while cindex < line.len() && line[cindex].byte.is_ascii_whitespace() {
                        cindex += 1;
                    }
                }
                break;
            }
            cindex += utf8_char_length(byte);
        }
        Coordinates::new(from.line, self.buffer.character_column(from.line, cindex))
    }

    /// The start of the next alphanumeric run after `from`, crossing line
    /// boundaries; the end of the document if there is none.
    pub fn find_next_word(&self, from: Coordinates) -> Coordinates {
        let mut at = from;
        if at.line >= self.buffer.line_count() {
            return at;
        }

        let mut cindex = self.buffer.character_index(from);
        let mut isword = false;
        let mut skip = false;
        if cindex < self.buffer.line(at.line).len() {
            isword = self.buffer.line(at.line)[cindex].byte.is_ascii_alphanumeric();
            skip = isword;
        }

        while !isword || skip {
            if at.line >= self.buffer.line_count() {
                let last = self.buffer.line_count().saturating_sub(1);
                return Coordinates::new(last, self.buffer.line_max_column(last));
            }

            let line = self.buffer.line(at.line);
            if cindex < line.len() {
                isword = line[cindex].byte.is_ascii_alphanumeric();
                if isword && !skip {
                    return Coordinates::new(at.line, self.buffer.character_column(at.line, cindex));
                }
                if !isword {
                    skip = false;
                }
                cindex += 1;
            } else {
                cindex = 0;
                at.line += 1;
                skip = false;
                isword = false;
            }
        }
        at
    }

    /// True at column 0, at end of line, or where the palette class (the
    /// whitespace-ness with the colorizer off) changes from the previous
    /// character.
    pub fn is_on_word_boundary(&self, at: Coordinates) -> bool {
        if at.line >= self.buffer.line_count() || at.column == 0 {
            return true;
        }
        let line = self.buffer.line(at.line);
        let cindex = self.buffer.character_index(at);
        if cindex >= line.len() {
            return true;
        }
        if self.colorizer_enabled {
            line[cindex].color != line[cindex - 1].color
        } else {
            line[cindex].byte.is_ascii_whitespace() != line[cindex - 1].byte.is_ascii_whitespace()
        }
    }

    /// The word at `coords`.
    pub fn word_at(&self, coords: Coordinates) -> String {
        let start = self.buffer.character_index(self.find_word_start(coords));
        let end = self.buffer.character_index(self.find_word_end(coords));
        let bytes: Vec<u8> = self.buffer.line(coords.line)[start..end]
            .iter()
            .map(|g| g.byte)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// The word under the cursor.
    pub fn word_under_cursor(&self) -> String {
        self.word_at(self.cursor_position())
    }

    // ---- movement --------------------------------------------------------

    /// Moves the cursor up `amount` lines, growing the selection if `select`.
    pub fn move_up(&mut self, amount: usize, select: bool) {
        let old_pos = self.state.cursor_position;
        self.state.cursor_position.line = self.state.cursor_position.line.saturating_sub(amount);
        if old_pos != self.state.cursor_position {
            if select {
                if old_pos == self.interactive_start {
                    self.interactive_start = self.state.cursor_position;
                } else if old_pos == self.interactive_end {
                    self.interactive_end = self.state.cursor_position;
                } else {
                    self.interactive_start = self.state.cursor_position;
                    self.interactive_end = old_pos;
                }
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = self.state.cursor_position;
            }
            self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
        }
    }

    /// Moves the cursor down `amount` lines.
    pub fn move_down(&mut self, amount: usize, select: bool) {
        let old_pos = self.state.cursor_position;
        self.state.cursor_position.line =
            (self.state.cursor_position.line + amount).min(self.buffer.line_count() - 1);
        if old_pos != self.state.cursor_position {
            if select {
                if old_pos == self.interactive_end {
                    self.interactive_end = self.state.cursor_position;
                } else if old_pos == self.interactive_start {
                    self.interactive_start = self.state.cursor_position;
                } else {
                    self.interactive_start = old_pos;
                    self.interactive_end = self.state.cursor_position;
                }
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = self.state.cursor_position;
            }
            self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
        }
    }

    /// Moves the cursor left by `amount` whole characters (or words).
    pub fn move_left(&mut self, amount: usize, select: bool, word_mode: bool) {
        let old_pos = self.state.cursor_position;
        self.state.cursor_position = self.cursor_position();
        let mut line = self.state.cursor_position.line;
        let mut cindex = self.buffer.character_index(self.state.cursor_position);

        for _ in 0..amount {
            if cindex == 0 {
                if line > 0 {
                    line -= 1;
                    cindex = self.buffer.line(line).len();
                }
            } else {
                cindex -= 1;
                while cindex > 0 && is_utf8_continuation(self.buffer.line(line)[cindex].byte) {
                    cindex -= 1;
                }
            }

            self.state.cursor_position =
                Coordinates::new(line, self.buffer.character_column(line, cindex));
            if word_mode {
                self.state.cursor_position = self.find_word_start(self.state.cursor_position);
                cindex = self.buffer.character_index(self.state.cursor_position);
            }
        }

        self.state.cursor_position =
            Coordinates::new(line, self.buffer.character_column(line, cindex));
        if self.state.cursor_position != old_pos {
            self.cursor_position_changed = true;
        }

        if select {
            if old_pos == self.interactive_start {
                self.interactive_start = self.state.cursor_position;
            } else if old_pos == self.interactive_end {
                self.interactive_end = self.state.cursor_position;
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = old_pos;
            }
        } else {
            self.interactive_start = self.state.cursor_position;
            self.interactive_end = self.state.cursor_position;
        }
        self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
    }

    /// Moves the cursor right by `amount` whole characters (or words).
    pub fn move_right(&mut self, amount: usize, select: bool, word_mode: bool) {
        let old_pos = self.state.cursor_position;
        if old_pos.line >= self.buffer.line_count() {
            return;
        }

        let mut cindex = self.buffer.character_index(self.state.cursor_position);
        for _ in 0..amount {
            let lindex = self.state.cursor_position.line;
            if cindex >= self.buffer.line(lindex).len() {
                if lindex + 1 >= self.buffer.line_count() {
                    return;
                }
                self.state.cursor_position.line = lindex + 1;
                self.state.cursor_position.column = 0;
                cindex = 0;
            } else {
                cindex += utf8_char_length(self.buffer.line(lindex)[cindex].byte);
                self.state.cursor_position =
                    Coordinates::new(lindex, self.buffer.character_column(lindex, cindex));
                if word_mode {
                    let next_word = self.find_word_end(self.state.cursor_position);
                    if next_word.line > old_pos.line
                        && old_pos.column != self.buffer.line_max_column(old_pos.line)
                    {
                        self.state.cursor_position.column =
                            self.buffer.line_max_column(old_pos.line);
                    } else {
                        self.state.cursor_position = next_word;
                    }
                    cindex = self.buffer.character_index(self.state.cursor_position);
                }
            }
        }
        if self.state.cursor_position != old_pos {
            self.cursor_position_changed = true;
        }

        if select {
            if old_pos == self.interactive_end {
                self.interactive_end = self.buffer.sanitize(self.state.cursor_position);
                self.set_cursor_position(self.interactive_end);
            } else if old_pos == self.interactive_start {
                self.interactive_start = self.state.cursor_position;
            } else {
                self.interactive_start = old_pos;
                self.interactive_end = self.state.cursor_position;
            }
        } else {
            self.interactive_start = self.state.cursor_position;
            self.interactive_end = self.state.cursor_position;
        }
        self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
    }

    /// Moves the cursor to the top of the document.
    pub fn move_top(&mut self, select: bool) {
        let old_pos = self.state.cursor_position;
        self.set_cursor_position(Coordinates::new(0, 0));
        if self.state.cursor_position != old_pos {
            if select {
                self.interactive_end = old_pos;
                self.interactive_start = self.state.cursor_position;
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = self.state.cursor_position;
            }
            self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
        }
    }

    /// Moves the cursor to the last line.
    pub fn move_bottom(&mut self, select: bool) {
        let old_pos = self.cursor_position();
        let new_pos = Coordinates::new(self.buffer.line_count() - 1, 0);
        self.set_cursor_position(new_pos);
        if select {
            self.interactive_start = old_pos;
            self.interactive_end = new_pos;
        } else {
            self.interactive_start = new_pos;
            self.interactive_end = new_pos;
        }
        self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
    }

    /// Moves the cursor to column 0 of the current line.
    pub fn move_home(&mut self, select: bool) {
        let old_pos = self.state.cursor_position;
        self.set_cursor_position(Coordinates::new(old_pos.line, 0));
        if self.state.cursor_position != old_pos {
            if select {
                if old_pos == self.interactive_start {
                    self.interactive_start = self.state.cursor_position;
                } else if old_pos == self.interactive_end {
                    self.interactive_end = self.state.cursor_position;
                } else {
                    self.interactive_start = self.state.cursor_position;
                    self.interactive_end = old_pos;
                }
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = self.state.cursor_position;
            }
            self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
        }
    }

    /// Moves the cursor to the end of the current line.
    pub fn move_end(&mut self, select: bool) {
        let old_pos = self.state.cursor_position;
        self.set_cursor_position(Coordinates::new(
            old_pos.line,
            self.buffer.line_max_column(old_pos.line),
        ));
        if self.state.cursor_position != old_pos {
            if select {
                if old_pos == self.interactive_end {
                    self.interactive_end = self.state.cursor_position;
                } else if old_pos == self.interactive_start {
                    self.interactive_start = self.state.cursor_position;
                } else {
                    self.interactive_start = old_pos;
                    self.interactive_end = self.state.cursor_position;
                }
            } else {
                self.interactive_start = self.state.cursor_position;
                self.interactive_end = self.state.cursor_position;
            }
            self.set_selection(self.interactive_start, self.interactive_end, SelectionMode::Normal);
        }
    }

    // ---- editing ---------------------------------------------------------

    /// Enters one typed character at the cursor.
    ///
    /// Deletes the selection first, except for the multi-line tab case which
    /// block-indents (`shift == false`) or block-outdents (`shift == true`)
    /// the selected lines as a single undo step. `'\n'` splits the line,
    /// copying the previous line's leading blanks when the language requests
    /// auto-indentation. In overwrite mode the character under the cursor is
    /// replaced and recorded in the undo delta.
    pub fn enter_char(&mut self, ch: char, shift: bool) {
        assert!(!self.read_only);

        let mut u = UndoRecord::starting_at(self.state);

        if self.has_selection() {
            if ch == '\t' && self.state.selection_start.line != self.state.selection_end.line {
                self.block_indent(shift, u);
                return;
            }
            u.removed = self.selected_text();
            u.removed_start = self.state.selection_start;
            u.removed_end = self.state.selection_end;
            self.delete_selection();
        }

        let coord = self.cursor_position();
        u.added_start = coord;
        debug_assert!(self.buffer.line_count() > 0);

        if ch == '\n' {
            self.buffer.insert_empty_line(coord.line + 1);

            let blanks: Vec<Glyph> = if self.language.auto_indentation {
                self.buffer
                    .line(coord.line)
                    .iter()
                    .take_while(|g| matches!(g.byte, b' ' | b'\t'))
                    .copied()
                    .collect()
            } else {
                Vec::new()
            };
            let whitespace_len = blanks.len();
            // Redo replays the copied blanks together with the newline.
            let mut added = String::from("\n");
            for glyph in &blanks {
                added.push(glyph.byte as char);
            }

            let cindex = self.buffer.character_index(coord);
            let tail = self.buffer.line_mut(coord.line).split_off(cindex);
            let new_line = self.buffer.line_mut(coord.line + 1);
            new_line.extend(blanks);
            new_line.extend(tail);

            self.set_cursor_position(Coordinates::new(
                coord.line + 1,
                self.buffer.character_column(coord.line + 1, whitespace_len),
            ));
            u.added = added;
        } else {
            let mut encoded = [0u8; 4];
            let encoded = ch.encode_utf8(&mut encoded);
            let mut cindex = self.buffer.character_index(coord);

            if self.overwrite && cindex < self.buffer.line(coord.line).len() {
                let mut d = utf8_char_length(self.buffer.line(coord.line)[cindex].byte);
                u.removed_start = self.state.cursor_position;
                u.removed_end = Coordinates::new(
                    coord.line,
                    self.buffer.character_column(coord.line, cindex + d),
                );
                let mut bytes = Vec::new();
                while d > 0 && cindex < self.buffer.line(coord.line).len() {
                    bytes.push(self.buffer.line(coord.line)[cindex].byte);
                    self.buffer.line_mut(coord.line).remove(cindex);
                    d -= 1;
                }
                u.removed.push_str(&String::from_utf8_lossy(&bytes));
            }

            for &byte in encoded.as_bytes() {
                self.buffer
                    .line_mut(coord.line)
                    .insert(cindex, Glyph::new(byte, PaletteIndex::Default));
                cindex += 1;
            }
            u.added = encoded.to_string();

            self.set_cursor_position(Coordinates::new(
                coord.line,
                self.buffer.character_column(coord.line, cindex),
            ));
        }

        self.text_changed = true;
        u.added_end = self.cursor_position();
        u.after = self.state;
        self.add_undo(u);

        self.colorize(coord.line.saturating_sub(1), 3);
    }

    /// Block indent/outdent of a multi-line selection, one combined undo
    /// record. Outdent strips one leading tab or up to tab-size leading
    /// spaces per line.
    fn block_indent(&mut self, outdent: bool, mut u: UndoRecord) {
        let mut start = self.state.selection_start;
        let mut end = self.state.selection_end;
        let original_end = end;

        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        start.column = 0;
        if end.column == 0 && end.line > 0 {
            end.line -= 1;
        }
        if end.line >= self.buffer.line_count() {
            end.line = self.buffer.line_count() - 1;
        }
        end.column = self.buffer.line_max_column(end.line);

        u.removed_start = start;
        u.removed_end = end;
        u.removed = self.buffer.text_range(start, end);

        let tab_size = self.buffer.tab_size();
        let mut modified = false;
        for i in start.line..=end.line {
            let line = self.buffer.line_mut(i);
            if outdent {
                if !line.is_empty() {
                    if line[0].byte == b'\t' {
                        line.remove(0);
                        modified = true;
                    } else {
                        let mut stripped = 0;
                        while stripped < tab_size && !line.is_empty() && line[0].byte == b' ' {
                            line.remove(0);
                            modified = true;
                            stripped += 1;
                        }
                    }
                }
            } else {
                line.insert(0, Glyph::new(b'\t', PaletteIndex::Background));
                modified = true;
            }
        }

        if modified {
            start = Coordinates::new(start.line, 0);
            let range_end;
            let new_end;
            if original_end.column != 0 {
                new_end = Coordinates::new(end.line, self.buffer.line_max_column(end.line));
                range_end = new_end;
            } else {
                new_end = Coordinates::new(original_end.line, 0);
                range_end = Coordinates::new(
                    new_end.line - 1,
                    self.buffer.line_max_column(new_end.line - 1),
                );
            }
            u.added = self.buffer.text_range(start, range_end);
            u.added_start = start;
            u.added_end = range_end;

            self.state.selection_start = start;
            self.state.selection_end = new_end;
            // Redo restores the post-edit selection.
            u.after = self.state;
            self.add_undo(u);
            self.text_changed = true;
        }
    }

    /// Inserts text at the cursor without recording an undo step (the
    /// building block `paste` and the undo replay share).
    pub fn insert_text(&mut self, text: &str) {
        assert!(!self.read_only);
        if text.is_empty() {
            return;
        }

        let mut pos = self.cursor_position();
        let start = pos.min(self.state.selection_start);
        let mut total_lines = pos.line - start.line;
        total_lines += self.buffer.insert_text_at(&mut pos, text);
        self.text_changed = true;

        self.set_selection(pos, pos, SelectionMode::Normal);
        self.set_cursor_position(pos);
        self.colorize(start.line.saturating_sub(1), total_lines + 2);
    }

    /// Deletes the current selection and collapses the cursor onto the
    /// deletion point.
    pub fn delete_selection(&mut self) {
        debug_assert!(self.state.selection_end >= self.state.selection_start);
        if self.state.selection_end == self.state.selection_start {
            return;
        }
        assert!(!self.read_only);

        self.buffer
            .delete_range(self.state.selection_start, self.state.selection_end);
        self.text_changed = true;

        let start = self.state.selection_start;
        self.set_selection(start, start, SelectionMode::Normal);
        self.set_cursor_position(start);
        self.colorize(start.line, 1);
    }

    /// Backspace: deletes the selection, or the character left of the
    /// cursor. At column 0 the line is merged into the previous one. Tab
    /// removal recomputes the column delta from the previous glyph's column
    /// rather than a flat decrement.
    pub fn backspace(&mut self) {
        assert!(!self.read_only);

        let mut u = UndoRecord::starting_at(self.state);

        if self.has_selection() {
            u.removed = self.selected_text();
            u.removed_start = self.state.selection_start;
            u.removed_end = self.state.selection_end;
            self.delete_selection();
        } else {
            let pos = self.cursor_position();
            self.set_cursor_position(pos);

            if self.state.cursor_position.column == 0 {
                if self.state.cursor_position.line == 0 {
                    return;
                }

                u.removed = "\n".to_string();
                u.removed_start =
                    Coordinates::new(pos.line - 1, self.buffer.line_max_column(pos.line - 1));
                u.removed_end = self.buffer.advance(u.removed_start);

                let cursor_line = self.state.cursor_position.line;
                let prev_max = self.buffer.line_max_column(cursor_line - 1);
                let merged = self.buffer.line(cursor_line).to_vec();
                self.buffer.line_mut(cursor_line - 1).extend(merged);
                self.buffer.remove_line(cursor_line);

                self.state.cursor_position.line -= 1;
                self.state.cursor_position.column = prev_max;
            } else {
                let line_no = self.state.cursor_position.line;
                let mut cindex = self.buffer.character_index(pos) - 1;
                let cend = cindex + 1;
                while cindex > 0 && is_utf8_continuation(self.buffer.line(line_no)[cindex].byte) {
                    cindex -= 1;
                }

                u.removed_start = self.cursor_position();
                u.removed_end = u.removed_start;
                u.removed_start.column = u.removed_start.column.saturating_sub(1);

                let tab_size = self.buffer.tab_size();
                if self.buffer.line(line_no)[cindex].byte == b'\t' {
                    if cindex > 0 {
                        // Recompute the tab's width from the previous
                        // glyph's column instead of a flat decrement.
                        let previous_character =
                            self.buffer.character_column(line_no, cindex - 1) + 1;
                        let column = self.state.cursor_position.column;
                        if column.saturating_sub(previous_character) >= tab_size {
                            self.state.cursor_position.column = column.saturating_sub(tab_size);
                        } else {
                            let tab = tab_size.max(1);
                            self.state.cursor_position.column =
                                column.saturating_sub(tab_size - (previous_character % tab));
                        }
                    } else {
                        self.state.cursor_position.column =
                            self.state.cursor_position.column.saturating_sub(tab_size);
                    }
                } else {
                    self.state.cursor_position.column -= 1;
                }

                let mut bytes = Vec::new();
                for _ in cindex..cend {
                    if cindex >= self.buffer.line(line_no).len() {
                        break;
                    }
                    bytes.push(self.buffer.line(line_no)[cindex].byte);
                    self.buffer.line_mut(line_no).remove(cindex);
                }
                u.removed.push_str(&String::from_utf8_lossy(&bytes));
            }

            self.text_changed = true;
            self.colorize(self.state.cursor_position.line, 1);
        }

        u.after = self.state;
        self.add_undo(u);
    }

    /// Delete key: removes the selection, or the character under the
    /// cursor; at end of line the next line is appended.
    pub fn delete_char(&mut self) {
        assert!(!self.read_only);

        let mut u = UndoRecord::starting_at(self.state);

        if self.has_selection() {
            u.removed = self.selected_text();
            u.removed_start = self.state.selection_start;
            u.removed_end = self.state.selection_end;
            self.delete_selection();
        } else {
            let pos = self.cursor_position();
            self.set_cursor_position(pos);

            if pos.column == self.buffer.line_max_column(pos.line) {
                if pos.line + 1 >= self.buffer.line_count() {
                    return;
                }

                u.removed = "\n".to_string();
                u.removed_start = self.cursor_position();
                u.removed_end = self.buffer.advance(u.removed_start);

                let next = self.buffer.line(pos.line + 1).to_vec();
                self.buffer.line_mut(pos.line).extend(next);
                self.buffer.remove_line(pos.line + 1);
            } else {
                let cindex = self.buffer.character_index(pos);
                u.removed_start = self.cursor_position();
                u.removed_end = u.removed_start;
                u.removed_end.column += 1;
                u.removed = self.buffer.text_range(u.removed_start, u.removed_end);

                let mut d = utf8_char_length(self.buffer.line(pos.line)[cindex].byte);
                while d > 0 && cindex < self.buffer.line(pos.line).len() {
                    self.buffer.line_mut(pos.line).remove(cindex);
                    d -= 1;
                }
            }

            self.text_changed = true;
            self.colorize(pos.line, 1);
        }

        u.after = self.state;
        self.add_undo(u);
    }

    // ---- clipboard-shaped operations --------------------------------------

    /// The text a host would copy: the selection, or the whole current line.
    pub fn copy(&self) -> String {
        if self.has_selection() {
            self.selected_text()
        } else {
            self.buffer.line_text(self.cursor_position().line)
        }
    }

    /// Cuts the selection, returning the removed text. On a read-only
    /// editor this degrades to a copy.
    pub fn cut(&mut self) -> Option<String> {
        if self.read_only {
            return Some(self.copy());
        }
        if !self.has_selection() {
            return None;
        }

        let mut u = UndoRecord::starting_at(self.state);
        u.removed = self.selected_text();
        u.removed_start = self.state.selection_start;
        u.removed_end = self.state.selection_end;
        let text = u.removed.clone();

        self.delete_selection();
        u.after = self.state;
        self.add_undo(u);
        Some(text)
    }

    /// Pastes host-supplied text at the cursor, replacing the selection.
    pub fn paste(&mut self, text: &str) {
        if self.read_only || text.is_empty() {
            return;
        }

        let mut u = UndoRecord::starting_at(self.state);

        if self.has_selection() {
            u.removed = self.selected_text();
            u.removed_start = self.state.selection_start;
            u.removed_end = self.state.selection_end;
            self.delete_selection();
        }

        u.added = text.to_string();
        u.added_start = self.cursor_position();
        self.insert_text(text);
        u.added_end = self.cursor_position();
        u.after = self.state;
        self.add_undo(u);
    }

    // ---- line-level operations -------------------------------------------

    /// Duplicates the current line, or the whole line span of a multi-line
    /// selection, below itself.
    pub fn duplicate_line(&mut self) {
        assert!(!self.read_only);

        let mut cursor = self.cursor_position();
        let line_index = cursor.line;
        if line_index >= self.buffer.line_count() {
            return;
        }

        if self.state.selection_start.line != self.state.selection_end.line {
            let mut u = UndoRecord::starting_at(self.state);

            let start_coord = Coordinates::new(self.state.selection_start.line, 0);
            let end_coord = Coordinates::new(self.state.selection_end.line + 1, 0);
            self.set_cursor_position(Coordinates::new(cursor.line, 0));

            let duplicate = self.buffer.text_range(start_coord, end_coord);
            self.insert_text(&duplicate);

            let distance = end_coord.line - start_coord.line;
            self.set_selection(
                Coordinates::new(start_coord.line + distance, 0),
                Coordinates::new(end_coord.line + distance, 0),
                SelectionMode::Normal,
            );

            u.added = duplicate;
            u.added_start = start_coord;
            u.added_end = end_coord;
            u.after = self.state;
            self.add_undo(u);
        } else {
            let mut u = UndoRecord::starting_at(self.state);

            let copy = self.buffer.line(line_index).to_vec();
            self.buffer.insert_line(line_index, copy);
            self.text_changed = true;

            cursor.line += 1;
            self.set_cursor_position(cursor);

            u.added = format!("\n{}", self.current_line_text());
            u.added_start = Coordinates::new(
                cursor.line - 1,
                self.buffer.line_max_column(cursor.line - 1),
            );
            u.added_end = Coordinates::new(cursor.line, self.buffer.line_max_column(cursor.line));
            u.after = self.state;
            self.add_undo(u);
        }
    }

    /// Swaps the current line with the one above it.
    pub fn shift_line_up(&mut self) {
        assert!(!self.read_only);

        let mut cursor = self.cursor_position();
        let line_index = cursor.line;
        if line_index == 0 || line_index >= self.buffer.line_count() {
            return;
        }

        let mut u = UndoRecord::starting_at(self.state);
        let region_start = Coordinates::new(line_index - 1, 0);
        u.removed_start = region_start;
        u.removed_end =
            Coordinates::new(line_index, self.buffer.line_max_column(line_index));
        u.removed = self.buffer.text_range(u.removed_start, u.removed_end);

        let moved = self.buffer.line(line_index).to_vec();
        self.buffer.insert_line(line_index - 1, moved);
        self.buffer.remove_line(line_index + 1);
        self.text_changed = true;

        cursor.line -= 1;
        self.set_cursor_position(cursor);

        u.added_start = region_start;
        u.added_end = Coordinates::new(line_index, self.buffer.line_max_column(line_index));
        u.added = self.buffer.text_range(u.added_start, u.added_end);
        u.after = self.state;
        self.add_undo(u);
    }

    /// Swaps the current line with the one below it.
    pub fn shift_line_down(&mut self) {
        assert!(!self.read_only);

        let mut cursor = self.cursor_position();
        let line_index = cursor.line;
        if line_index + 1 >= self.buffer.line_count() {
            return;
        }

        let mut u = UndoRecord::starting_at(self.state);
        let region_start = Coordinates::new(line_index, 0);
        u.removed_start = region_start;
        u.removed_end =
            Coordinates::new(line_index + 1, self.buffer.line_max_column(line_index + 1));
        u.removed = self.buffer.text_range(u.removed_start, u.removed_end);

        let moved = self.buffer.line(line_index).to_vec();
        self.buffer.insert_line(line_index + 2, moved);
        self.buffer.remove_line(line_index);
        self.text_changed = true;

        cursor.line += 1;
        self.set_cursor_position(cursor);

        u.added_start = region_start;
        u.added_end =
            Coordinates::new(line_index + 1, self.buffer.line_max_column(line_index + 1));
        u.added = self.buffer.text_range(u.added_start, u.added_end);
        u.after = self.state;
        self.add_undo(u);
    }

    // ---- undo/redo -------------------------------------------------------

    /// Whether an undo step is available (never on a read-only editor).
    pub fn can_undo(&self) -> bool {
        !self.read_only && self.undo_index > 0
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.read_only && self.undo_index < self.undo_buffer.len()
    }

    /// Undoes up to `steps` edits.
    pub fn undo(&mut self, steps: usize) {
        for _ in 0..steps {
            if !self.can_undo() {
                break;
            }
            self.undo_index -= 1;
            let record = self.undo_buffer[self.undo_index].clone();
            self.apply_undo(&record);
        }
    }

    /// Redoes up to `steps` edits.
    pub fn redo(&mut self, steps: usize) {
        for _ in 0..steps {
            if !self.can_redo() {
                break;
            }
            let record = self.undo_buffer[self.undo_index].clone();
            self.undo_index += 1;
            self.apply_redo(&record);
        }
    }

    /// The full record list, for host-level session persistence.
    pub fn undo_buffer(&self) -> &UndoBuffer {
        &self.undo_buffer
    }

    /// Index just past the last applied record.
    pub fn undo_index(&self) -> usize {
        self.undo_index
    }

    /// Restores a previously captured record list and index.
    pub fn set_undo_buffer(&mut self, buffer: UndoBuffer, index: usize) {
        self.undo_index = index.min(buffer.len());
        self.undo_buffer = buffer;
    }

    /// Drops all undo history.
    pub fn clear_undo_buffer(&mut self) {
        self.undo_buffer.clear();
        self.undo_index = 0;
    }

    pub(crate) fn add_undo(&mut self, record: UndoRecord) {
        debug_assert!(!self.read_only);
        debug_assert!(record.added_start <= record.added_end);
        debug_assert!(record.removed_start <= record.removed_end);
        // A new edit issued mid-history truncates the redo tail.
        self.undo_buffer.truncate(self.undo_index);
        self.undo_buffer.push(record);
        self.undo_index += 1;
    }

    fn apply_undo(&mut self, record: &UndoRecord) {
        if !record.added.is_empty() {
            self.buffer.delete_range(record.added_start, record.added_end);
            self.text_changed = true;
            self.colorize(
                record.added_start.line.saturating_sub(1),
                record.added_end.line - record.added_start.line + 2,
            );
        }
        if !record.removed.is_empty() {
            let mut start = record.removed_start;
            self.buffer.insert_text_at(&mut start, &record.removed);
            self.text_changed = true;
            self.colorize(
                record.removed_start.line.saturating_sub(1),
                record.removed_end.line - record.removed_start.line + 2,
            );
        }
        self.state = record.before;
    }

    fn apply_redo(&mut self, record: &UndoRecord) {
        if !record.removed.is_empty() {
            self.buffer.delete_range(record.removed_start, record.removed_end);
            self.text_changed = true;
            self.colorize(
                record.removed_start.line.saturating_sub(1),
                record.removed_end.line - record.removed_start.line + 1,
            );
        }
        if !record.added.is_empty() {
            let mut start = record.added_start;
            self.buffer.insert_text_at(&mut start, &record.added);
            self.text_changed = true;
            self.colorize(
                record.added_start.line.saturating_sub(1),
                record.added_end.line - record.added_start.line + 1,
            );
        }
        self.state = record.after;
    }

    // ---- persistence hook ------------------------------------------------

    /// Registers the callback invoked by [`save`](Self::save).
    pub fn set_save_callback(&mut self, callback: impl FnMut() + 'static) {
        self.save_callback = Some(Box::new(callback));
    }

    /// Invokes the host save callback, if any.
    pub fn save(&mut self) {
        if let Some(callback) = self.save_callback.as_mut() {
            callback();
        }
    }
}
