//! The glyph/line store and its coordinate-conversion primitives.
//!
//! Lines hold byte cells; coordinates hold display columns. The two are
//! bridged on demand by [`TextBuffer::character_index`] and
//! [`TextBuffer::character_column`], which replay the same tab-expansion walk
//! in both directions. Character indices are never cached anywhere because
//! any edit invalidates them.

use crate::annotations::LineAnnotations;
use crate::coords::Coordinates;
use crate::glyph::{Glyph, Line, utf8_char_length};
use textedit_lang::PaletteIndex;

/// Largest accepted tab size; larger values are clamped.
pub const MAX_TAB_SIZE: usize = 32;

/// The document: a never-empty vector of lines plus the tab size that the
/// display-column model depends on, and the line-keyed annotation sets that
/// must shift with every structural change.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line>,
    tab_size: usize,
    annotations: LineAnnotations,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// An empty document: one empty line, tab size 4.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            tab_size: 4,
            annotations: LineAnnotations::default(),
        }
    }

    /// Number of lines; at least 1.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The cells of line `index`, or an empty slice past the end.
    pub fn line(&self, index: usize) -> &[Glyph] {
        self.lines.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn line_mut(&mut self, index: usize) -> &mut Line {
        &mut self.lines[index]
    }

    /// All lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The configured tab size.
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Sets the tab size, clamped to `[0, 32]`. A size of 0 behaves as 1 in
    /// every column walk so the conversion stays total.
    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.tab_size = tab_size.min(MAX_TAB_SIZE);
    }

    fn tab_width(&self) -> usize {
        self.tab_size.max(1)
    }

    /// Shared annotation arena (breakpoints, error markers).
    pub fn annotations(&self) -> &LineAnnotations {
        &self.annotations
    }

    /// Mutable access to the annotation arena.
    pub fn annotations_mut(&mut self) -> &mut LineAnnotations {
        &mut self.annotations
    }

    /// Cell index of the character at `coord`, clamped into the line.
    ///
    /// Walks the line accumulating display columns: a tab advances to the
    /// next tab stop, anything else advances by one, and the walk steps whole
    /// UTF-8 characters so the result never lands on a continuation byte.
    pub fn character_index(&self, coord: Coordinates) -> usize {
        let Some(line) = self.lines.get(coord.line) else {
            return 0;
        };
        let tab = self.tab_width();
        let mut column = 0;
        let mut i = 0;
        while i < line.len() && column < coord.column {
            if line[i].byte == b'\t' {
                column = (column / tab) * tab + tab;
            } else {
                column += 1;
            }
            i += utf8_char_length(line[i].byte);
        }
        i
    }

    /// Display column of cell `index` in line `line` (the inverse walk).
    pub fn character_column(&self, line: usize, index: usize) -> usize {
        let Some(line) = self.lines.get(line) else {
            return 0;
        };
        let tab = self.tab_width();
        let mut column = 0;
        let mut i = 0;
        while i < index && i < line.len() {
            let byte = line[i].byte;
            i += utf8_char_length(byte);
            if byte == b'\t' {
                column = (column / tab) * tab + tab;
            } else {
                column += 1;
            }
        }
        column
    }

    /// Number of whole characters in line `line`.
    pub fn line_character_count(&self, line: usize) -> usize {
        let Some(line) = self.lines.get(line) else {
            return 0;
        };
        let mut count = 0;
        let mut i = 0;
        while i < line.len() {
            i += utf8_char_length(line[i].byte);
            count += 1;
        }
        count
    }

    /// Total display width of line `line`.
    pub fn line_max_column(&self, line: usize) -> usize {
        let Some(line) = self.lines.get(line) else {
            return 0;
        };
        let tab = self.tab_width();
        let mut column = 0;
        let mut i = 0;
        while i < line.len() {
            let byte = line[i].byte;
            if byte == b'\t' {
                column = (column / tab) * tab + tab;
            } else {
                column += 1;
            }
            i += utf8_char_length(byte);
        }
        column
    }

    /// Clamps `coord` into the document: the line into `[0, line_count)` and
    /// the column into `[0, line_max_column]`.
    pub fn sanitize(&self, coord: Coordinates) -> Coordinates {
        if coord.line >= self.lines.len() {
            let line = self.lines.len() - 1;
            Coordinates::new(line, self.line_max_column(line))
        } else {
            Coordinates::new(coord.line, coord.column.min(self.line_max_column(coord.line)))
        }
    }

    /// One whole character forward from `coord`, wrapping onto the next line
    /// at end of line.
    pub fn advance(&self, coord: Coordinates) -> Coordinates {
        let mut coord = coord;
        if coord.line < self.lines.len() {
            let line = &self.lines[coord.line];
            let mut cindex = self.character_index(coord);
            if cindex + 1 < line.len() {
                let delta = utf8_char_length(line[cindex].byte);
                cindex = (cindex + delta).min(line.len() - 1);
            } else {
                coord.line += 1;
                cindex = 0;
            }
            coord.column = self.character_column(coord.line, cindex);
        }
        coord
    }

    /// Text of one line as a `String`.
    pub fn line_text(&self, index: usize) -> String {
        let bytes: Vec<u8> = self.line(index).iter().map(|g| g.byte).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// The whole document, lines joined with `'\n'`.
    pub fn text(&self) -> String {
        let last = self.lines.len() - 1;
        self.text_range(
            Coordinates::new(0, 0),
            Coordinates::new(last, self.line_max_column(last)),
        )
    }

    /// Text of `[start, end)`, walking glyph cells and emitting `'\n'` at
    /// each internal line break.
    pub fn text_range(&self, start: Coordinates, end: Coordinates) -> String {
        let mut result = Vec::new();
        let mut lstart = start.line;
        let lend = end.line;
        let mut istart = self.character_index(start);
        let iend = self.character_index(end);

        while istart < iend || lstart < lend {
            if lstart >= self.lines.len() {
                break;
            }
            let line = &self.lines[lstart];
            if istart < line.len() {
                result.push(line[istart].byte);
                istart += 1;
            } else {
                istart = 0;
                lstart += 1;
                result.push(b'\n');
            }
        }
        String::from_utf8_lossy(&result).into_owned()
    }

    /// All lines as `String`s.
    pub fn text_lines(&self) -> Vec<String> {
        (0..self.lines.len()).map(|i| self.line_text(i)).collect()
    }

    /// Replaces the whole document. `'\r'` is dropped; the never-empty
    /// invariant is restored for empty input.
    pub fn set_text(&mut self, text: &str) {
        self.lines.clear();
        self.lines.push(Line::new());
        for &byte in text.as_bytes() {
            match byte {
                b'\r' => {}
                b'\n' => self.lines.push(Line::new()),
                _ => self
                    .lines
                    .last_mut()
                    .expect("buffer is never empty")
                    .push(Glyph::new(byte, PaletteIndex::Default)),
            }
        }
    }

    /// Replaces the whole document from pre-split lines.
    pub fn set_text_lines(&mut self, lines: &[String]) {
        self.lines.clear();
        if lines.is_empty() {
            self.lines.push(Line::new());
        } else {
            for text in lines {
                self.lines.push(
                    text.bytes()
                        .map(|byte| Glyph::new(byte, PaletteIndex::Default))
                        .collect(),
                );
            }
        }
    }

    /// Inserts `text` at `*at`, advancing `*at` past the insertion. `'\r'`
    /// is dropped and `'\n'` splits the line at the character index.
    /// Returns the number of line breaks inserted.
    pub fn insert_text_at(&mut self, at: &mut Coordinates, text: &str) -> usize {
        let mut cindex = self.character_index(*at);
        let mut total_lines = 0;
        for ch in text.chars() {
            debug_assert!(!self.lines.is_empty());
            match ch {
                '\r' => {}
                '\n' => {
                    if cindex < self.lines[at.line].len() {
                        self.insert_empty_line(at.line + 1);
                        let tail = self.lines[at.line].split_off(cindex);
                        self.lines[at.line + 1] = tail;
                    } else {
                        self.insert_empty_line(at.line + 1);
                    }
                    at.line += 1;
                    at.column = 0;
                    cindex = 0;
                    total_lines += 1;
                }
                _ => {
                    let mut encoded = [0u8; 4];
                    let line = &mut self.lines[at.line];
                    for &byte in ch.encode_utf8(&mut encoded).as_bytes() {
                        line.insert(cindex, Glyph::new(byte, PaletteIndex::Default));
                        cindex += 1;
                    }
                    if ch == '\t' {
                        at.column += self.tab_size;
                    } else {
                        at.column += 1;
                    }
                }
            }
        }
        total_lines
    }

    /// Deletes `[start, end)`. Same-line spans erase in place; cross-line
    /// spans merge the tail of the last line onto the first and remove the
    /// lines in between.
    pub fn delete_range(&mut self, start: Coordinates, end: Coordinates) {
        debug_assert!(end >= start);
        if end == start {
            return;
        }

        let istart = self.character_index(start);
        let iend = self.character_index(end);

        if start.line == end.line {
            let max_column = self.line_max_column(start.line);
            let line = &mut self.lines[start.line];
            if end.column >= max_column {
                line.truncate(istart);
            } else {
                line.drain(istart..iend);
            }
        } else {
            let tail = self.lines[end.line].split_off(iend);
            self.lines[start.line].truncate(istart);
            self.lines[start.line].extend(tail);
            self.remove_lines(start.line + 1, end.line + 1);
        }
    }

    /// Inserts an empty line at `at`, shifting annotations.
    pub(crate) fn insert_empty_line(&mut self, at: usize) {
        self.lines.insert(at, Line::new());
        self.annotations.lines_inserted(at, 1);
    }

    /// Inserts a prebuilt line at `at`, shifting annotations.
    pub(crate) fn insert_line(&mut self, at: usize, line: Line) {
        self.lines.insert(at, line);
        self.annotations.lines_inserted(at, 1);
    }

    /// Removes line `at`, shifting annotations. The document must keep at
    /// least one line.
    pub(crate) fn remove_line(&mut self, at: usize) {
        debug_assert!(self.lines.len() > 1);
        self.lines.remove(at);
        self.annotations.lines_removed(at, at + 1);
    }

    /// Removes lines `[start, end)`, shifting annotations.
    pub(crate) fn remove_lines(&mut self, start: usize, end: usize) {
        debug_assert!(end >= start);
        debug_assert!(self.lines.len() > end - start);
        self.lines.drain(start..end);
        self.annotations.lines_removed(start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        buffer.set_text(text);
        buffer
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let b = buffer("a\tb");
        // 'a' at column 0, tab jumps to 4, 'b' at 4.
        assert_eq!(b.line_max_column(0), 5);
        assert_eq!(b.character_index(Coordinates::new(0, 4)), 2);
        assert_eq!(b.character_column(0, 2), 4);
    }

    #[test]
    fn index_and_column_are_inverse() {
        let b = buffer("\tfn répète(\t) {}");
        // Walk every character boundary; each reachable column must survive
        // the column -> index -> column round trip.
        let mut index = 0;
        while index <= b.line(0).len() {
            let column = b.character_column(0, index);
            assert_eq!(b.character_index(Coordinates::new(0, column)), index);
            if index == b.line(0).len() {
                break;
            }
            index += crate::glyph::utf8_char_length(b.line(0)[index].byte);
        }
        // Past-the-end columns clamp to the line end.
        let past = Coordinates::new(0, b.line_max_column(0) + 3);
        assert_eq!(b.character_index(past), b.line(0).len());
    }

    #[test]
    fn multibyte_characters_occupy_one_column() {
        let b = buffer("héllo");
        assert_eq!(b.line(0).len(), 6); // bytes
        assert_eq!(b.line_character_count(0), 5);
        assert_eq!(b.line_max_column(0), 5);
        // Index of column 2 must skip past both bytes of 'é'.
        assert_eq!(b.character_index(Coordinates::new(0, 2)), 3);
    }

    #[test]
    fn sanitize_clamps_line_and_column() {
        let b = buffer("ab\ncdef");
        assert_eq!(b.sanitize(Coordinates::new(9, 9)), Coordinates::new(1, 4));
        assert_eq!(b.sanitize(Coordinates::new(0, 99)), Coordinates::new(0, 2));
        assert_eq!(b.sanitize(Coordinates::new(1, 1)), Coordinates::new(1, 1));
    }

    #[test]
    fn zero_tab_size_degrades_to_single_column() {
        let mut b = buffer("\tx");
        b.set_tab_size(0);
        assert_eq!(b.line_max_column(0), 2);
        b.set_tab_size(99);
        assert_eq!(b.tab_size(), MAX_TAB_SIZE);
    }

    #[test]
    fn insert_splits_lines_and_reports_newlines() {
        let mut b = buffer("abc");
        let mut at = Coordinates::new(0, 1);
        let newlines = b.insert_text_at(&mut at, "X\nY");
        assert_eq!(newlines, 1);
        assert_eq!(b.text_lines(), vec!["aX", "Ybc"]);
        assert_eq!(at, Coordinates::new(1, 1));
    }

    #[test]
    fn insert_drops_carriage_returns() {
        let mut b = buffer("");
        let mut at = Coordinates::new(0, 0);
        b.insert_text_at(&mut at, "a\r\nb");
        assert_eq!(b.text(), "a\nb");
    }

    #[test]
    fn delete_range_same_line_and_cross_line() {
        let mut b = buffer("foo\nbar");
        b.delete_range(Coordinates::new(0, 3), Coordinates::new(1, 0));
        assert_eq!(b.text_lines(), vec!["foobar"]);
        assert_eq!(b.line_count(), 1);

        b.delete_range(Coordinates::new(0, 1), Coordinates::new(0, 4));
        assert_eq!(b.text(), "far");
    }

    #[test]
    fn delete_then_reinsert_round_trips() {
        let original = "alpha\nbeta\ngamma";
        let mut b = buffer(original);
        let start = Coordinates::new(0, 2);
        let end = Coordinates::new(2, 3);
        let removed = b.text_range(start, end);
        b.delete_range(start, end);
        let mut at = start;
        b.insert_text_at(&mut at, &removed);
        assert_eq!(b.text(), original);
    }

    #[test]
    fn text_range_walks_line_breaks() {
        let b = buffer("ab\ncd");
        assert_eq!(
            b.text_range(Coordinates::new(0, 1), Coordinates::new(1, 1)),
            "b\nc"
        );
        assert_eq!(b.text(), "ab\ncd");
    }

    #[test]
    fn line_ops_shift_annotations() {
        let mut b = buffer("a\nb\nc\nd");
        b.annotations_mut().set_breakpoints([1, 3].into_iter().collect());
        b.insert_empty_line(1);
        assert_eq!(
            b.annotations().breakpoints().iter().copied().collect::<Vec<_>>(),
            vec![2, 4]
        );
        b.remove_lines(1, 3);
        assert_eq!(
            b.annotations().breakpoints().iter().copied().collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn advance_steps_characters_and_wraps() {
        let b = buffer("aé\nb");
        let c = b.advance(Coordinates::new(0, 0));
        assert_eq!(c, Coordinates::new(0, 1));
        let c = b.advance(c);
        assert_eq!(c, Coordinates::new(0, 2));
        let c = b.advance(c);
        assert_eq!(c, Coordinates::new(1, 0));
    }
}
