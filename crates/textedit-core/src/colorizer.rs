//! Incremental syntax colorizing.
//!
//! Edits never recolor synchronously. They widen a dirty line range
//! (`color_range_min..color_range_max`) and raise `check_comments`; the host
//! then drains the backlog in bounded increments with
//! [`TextEditor::colorize_step`], or all at once with
//! [`TextEditor::colorize_now`]. Comment, string and preprocessor regions are
//! resolved first by a whole-document scan, because a single edit can toggle
//! an unbounded suffix of the file in or out of a block comment.

use crate::buffer::TextBuffer;
use crate::editor::TextEditor;
use crate::glyph::{Glyph, Line, utf8_char_length};
use textedit_lang::PaletteIndex;

/// Compares an ASCII token against the glyph bytes starting at `at`.
fn glyphs_match(line: &[Glyph], at: usize, token: &str) -> bool {
    let bytes = token.as_bytes();
    at + bytes.len() <= line.len()
        && bytes.iter().enumerate().all(|(k, &b)| line[at + k].byte == b)
}

fn region_covers(open: Option<(usize, usize)>, line: usize, index: usize) -> bool {
    match open {
        Some((open_line, open_index)) => {
            open_line < line || (open_line == line && open_index <= index)
        }
        None => false,
    }
}

/// Byte position of the comment/string/preprocessor scan.
///
/// The scan walks the whole document one character at a time; this cursor
/// isolates the movement rules (UTF-8 step widths, line wrap, escape
/// lookahead) from the region state machine itself.
struct ScanCursor {
    line: usize,
    index: usize,
}

impl ScanCursor {
    fn new() -> Self {
        Self { line: 0, index: 0 }
    }

    /// The byte under the cursor; `None` on an empty line.
    fn peek(&self, buffer: &TextBuffer) -> Option<u8> {
        buffer.line(self.line).get(self.index).map(|g| g.byte)
    }

    fn at_line_start(&self) -> bool {
        self.index == 0
    }

    /// Whether the cursor sits on the last glyph of its line.
    fn at_line_end(&self, buffer: &TextBuffer) -> bool {
        self.index + 1 == buffer.line(self.line).len()
    }

    /// Moves forward `byte_len` bytes, wrapping to the start of the next
    /// line when the current one is exhausted.
    fn advance(&mut self, buffer: &TextBuffer, byte_len: usize) {
        self.index += byte_len;
        if self.index >= buffer.line(self.line).len() {
            self.index = 0;
            self.line += 1;
        }
    }

    /// Steps onto the byte following an escape introducer. Returns `false`
    /// and stays put when the introducer is the last byte of its line.
    fn advance_escaped(&mut self, buffer: &TextBuffer) -> bool {
        if self.index + 1 < buffer.line(self.line).len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn skip_line(&mut self) {
        self.index = 0;
        self.line += 1;
    }
}

impl TextEditor {
    /// Marks `count` lines starting at `from_line` dirty. Recoloring happens
    /// later, in [`colorize_step`](Self::colorize_step) increments.
    pub fn colorize(&mut self, from_line: usize, count: usize) {
        let to_line = self.buffer.line_count().min(from_line.saturating_add(count));
        self.color_range_min = self.color_range_min.min(from_line);
        self.color_range_max = self.color_range_max.max(to_line);
        self.color_range_max = self.color_range_max.max(self.color_range_min);
        self.check_comments = true;
    }

    /// Marks the whole document dirty.
    pub fn colorize_all(&mut self) {
        self.colorize(0, self.buffer.line_count());
    }

    /// Whether dirty lines (or a pending comment rescan) remain.
    pub fn has_pending_colorizing(&self) -> bool {
        self.colorizer_enabled
            && (self.check_comments || self.color_range_min < self.color_range_max)
    }

    /// Performs one bounded increment of colorizing work: the comment rescan
    /// if one is pending, then one chunk of dirty lines. The chunk is 10
    /// lines on the regex path and 10000 when the language installs a
    /// tokenizer callback. Returns true while more work remains.
    pub fn colorize_step(&mut self) -> bool {
        if !self.colorizer_enabled {
            return false;
        }

        if self.check_comments {
            self.scan_comments();
            self.check_comments = false;
        }

        if self.color_range_min < self.color_range_max {
            let increment = if self.language.tokenize.is_none() { 10 } else { 10000 };
            let to = self.color_range_max.min(self.color_range_min + increment);
            self.colorize_range(self.color_range_min, to);
            self.color_range_min = to;

            if self.color_range_max == self.color_range_min {
                self.color_range_min = usize::MAX;
                self.color_range_max = 0;
            }
        }
        self.color_range_min < self.color_range_max
    }

    /// Drains the entire colorizing backlog.
    pub fn colorize_now(&mut self) {
        while self.colorize_step() {}
    }

    /// Whole-document scan assigning the comment, string and preprocessor
    /// region flags. Strings honor backslash escapes and doubled quotes; a
    /// trailing backslash continues a preprocessor line onto the next one.
    fn scan_comments(&mut self) {
        let end_line = self.buffer.line_count();
        let block_start_token = self.language.comment_start.clone();
        let block_end_token = self.language.comment_end.clone();
        let line_token = self.language.single_line_comment.clone();
        let has_block = self.language.has_block_comment();
        let has_line = self.language.has_line_comment();
        let preproc_char = self.language.preproc_char as u8;

        // (line, index) of the most recent unclosed block-comment opener.
        let mut block_open: Option<(usize, usize)> = None;
        let mut within_string = false;
        let mut within_line_comment = false;
        let mut within_preproc = false;
        let mut first_char = true;
        let mut concatenate = false;
        let mut cursor = ScanCursor::new();

        while cursor.line < end_line {
            if cursor.at_line_start() && !concatenate {
                within_line_comment = false;
                within_preproc = false;
                first_char = true;
            }
            concatenate = false;

            let Some(byte) = cursor.peek(&self.buffer) else {
                cursor.skip_line();
                continue;
            };

            if byte != preproc_char && !byte.is_ascii_whitespace() {
                first_char = false;
            }
            if cursor.at_line_end(&self.buffer) && byte == b'\\' {
                concatenate = true;
            }

            if within_string {
                let flag = region_covers(block_open, cursor.line, cursor.index);
                self.buffer.line_mut(cursor.line)[cursor.index].in_block_comment = flag;

                if byte == b'"' {
                    let doubled = self
                        .buffer
                        .line(cursor.line)
                        .get(cursor.index + 1)
                        .map(|g| g.byte)
                        == Some(b'"');
                    if doubled {
                        cursor.advance_escaped(&self.buffer);
                        self.buffer.line_mut(cursor.line)[cursor.index].in_block_comment = flag;
                    } else {
                        within_string = false;
                    }
                } else if byte == b'\\' && cursor.advance_escaped(&self.buffer) {
                    self.buffer.line_mut(cursor.line)[cursor.index].in_block_comment = flag;
                }
            } else {
                if first_char && byte == preproc_char {
                    within_preproc = true;
                }

                if byte == b'"' {
                    within_string = true;
                    let flag = region_covers(block_open, cursor.line, cursor.index);
                    self.buffer.line_mut(cursor.line)[cursor.index].in_block_comment = flag;
                } else {
                    let line = self.buffer.line(cursor.line);
                    // The line-comment token wins when it prefixes the
                    // block opener (Lua's "--" vs "--[[").
                    if has_line && glyphs_match(line, cursor.index, &line_token) {
                        within_line_comment = true;
                    } else if has_block
                        && !within_line_comment
                        && glyphs_match(line, cursor.index, &block_start_token)
                    {
                        block_open = Some((cursor.line, cursor.index));
                    }

                    let flag = region_covers(block_open, cursor.line, cursor.index);
                    let closes = has_block
                        && cursor.index + 1 >= block_end_token.len()
                        && glyphs_match(
                            line,
                            cursor.index + 1 - block_end_token.len(),
                            &block_end_token,
                        );

                    let line = self.buffer.line_mut(cursor.line);
                    line[cursor.index].in_block_comment = flag;
                    line[cursor.index].in_line_comment = within_line_comment;
                    if closes {
                        block_open = None;
                    }
                }
            }

            self.buffer.line_mut(cursor.line)[cursor.index].in_preprocessor = within_preproc;
            cursor.advance(&self.buffer, utf8_char_length(byte));
        }
    }

    /// Re-tokenizes `[from_line, to_line)`. Each line is reset to the
    /// default class; the language's tokenizer callback gets first refusal
    /// on the remainder at every position, then the anchored pattern list.
    /// Identifier tokens are refined against the keyword and identifier
    /// tables unless the glyph sits in a preprocessor region, where only the
    /// preprocessor table applies.
    fn colorize_range(&mut self, from_line: usize, to_line: usize) {
        if from_line >= to_line {
            return;
        }
        let end_line = self.buffer.line_count().min(to_line);

        for line_no in from_line..end_line {
            if self.buffer.line(line_no).is_empty() {
                continue;
            }

            let mut bytes = Vec::with_capacity(self.buffer.line(line_no).len());
            for glyph in self.buffer.line_mut(line_no).iter_mut() {
                bytes.push(glyph.byte);
                glyph.color = PaletteIndex::Default;
            }
            let Ok(text) = String::from_utf8(bytes) else {
                continue;
            };

            let mut pos = 0usize;
            while pos < text.len() {
                let remainder = &text[pos..];
                let mut token: Option<(usize, usize, PaletteIndex)> = None;

                if let Some(tokenize) = self.language.tokenize {
                    if let Some((range, class)) = tokenize(remainder) {
                        token = Some((pos + range.start, pos + range.end, class));
                    }
                }
                if token.is_none() {
                    for (regex, class) in &self.regex_list {
                        if let Some(found) = regex.find(remainder) {
                            token = Some((pos + found.start(), pos + found.end(), *class));
                            break;
                        }
                    }
                }

                match token {
                    // No token, or a zero-width match that cannot make
                    // progress: skip one character.
                    None => pos += utf8_char_length(text.as_bytes()[pos]),
                    Some((_, end, _)) if end <= pos => {
                        pos += utf8_char_length(text.as_bytes()[pos]);
                    }
                    Some((begin, end, mut class)) => {
                        if class == PaletteIndex::Identifier {
                            let mut id = text[begin..end].to_string();
                            if !self.language.case_sensitive {
                                id = id.to_uppercase();
                            }
                            // The preprocessor flag is read at the scan
                            // position, not the token start.
                            if !self.buffer.line(line_no)[pos].in_preprocessor {
                                if self.language.keywords.contains(&id) {
                                    class = PaletteIndex::Keyword;
                                } else if self.language.identifiers.contains_key(&id) {
                                    class = PaletteIndex::KnownIdentifier;
                                } else if self.language.preproc_identifiers.contains_key(&id) {
                                    class = PaletteIndex::PreprocIdentifier;
                                }
                            } else if self.language.preproc_identifiers.contains_key(&id) {
                                class = PaletteIndex::PreprocIdentifier;
                            }
                        }

                        let line: &mut Line = self.buffer.line_mut(line_no);
                        for glyph in &mut line[begin..end] {
                            glyph.color = class;
                        }
                        pos = end;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScanCursor;
    use crate::buffer::TextBuffer;
    use crate::coords::Coordinates;
    use crate::editor::TextEditor;
    use pretty_assertions::assert_eq;
    use textedit_lang::{LanguageDefinition, PaletteIndex};

    fn c_editor(text: &str) -> TextEditor {
        let mut editor = TextEditor::new();
        editor.set_language_definition(LanguageDefinition::c());
        editor.set_text(text);
        editor.colorize_now();
        editor
    }

    fn colors(editor: &TextEditor, line: usize) -> Vec<PaletteIndex> {
        editor.buffer().line(line).iter().map(|g| g.color).collect()
    }

    #[test]
    fn scan_cursor_wraps_at_line_ends() {
        let mut buffer = TextBuffer::new();
        buffer.set_text("ab\n\ncd");
        let mut cursor = ScanCursor::new();

        assert_eq!(cursor.peek(&buffer), Some(b'a'));
        assert!(cursor.at_line_start());
        cursor.advance(&buffer, 1);
        assert!(cursor.at_line_end(&buffer));
        cursor.advance(&buffer, 1);
        assert_eq!((cursor.line, cursor.index), (1, 0));
        assert_eq!(cursor.peek(&buffer), None);
        cursor.skip_line();
        assert_eq!(cursor.peek(&buffer), Some(b'c'));
    }

    #[test]
    fn scan_cursor_escape_step_stays_on_the_line() {
        let mut buffer = TextBuffer::new();
        buffer.set_text("x\\\"y\na\\");
        let mut cursor = ScanCursor::new();

        cursor.advance(&buffer, 1);
        assert_eq!(cursor.peek(&buffer), Some(b'\\'));
        assert!(cursor.advance_escaped(&buffer));
        assert_eq!(cursor.peek(&buffer), Some(b'"'));

        // A trailing backslash has nothing to escape.
        cursor = ScanCursor { line: 1, index: 1 };
        assert_eq!(cursor.peek(&buffer), Some(b'\\'));
        assert!(!cursor.advance_escaped(&buffer));
        assert_eq!((cursor.line, cursor.index), (1, 1));
    }

    #[test]
    fn keywords_identifiers_and_punctuation() {
        let editor = c_editor("int main() {");
        let classes = colors(&editor, 0);

        assert_eq!(&classes[0..3], &[PaletteIndex::Keyword; 3]);
        assert_eq!(&classes[4..8], &[PaletteIndex::Identifier; 4]);
        assert_eq!(classes[8], PaletteIndex::Punctuation);
        assert_eq!(classes[9], PaletteIndex::Punctuation);
        assert_eq!(classes[11], PaletteIndex::Punctuation);
        assert!(editor.buffer().line(0).iter().all(|g| !g.in_line_comment));
        assert!(editor.buffer().line(0).iter().all(|g| !g.in_block_comment));
    }

    #[test]
    fn line_comment_flags_stop_at_line_end() {
        let editor = c_editor("// x\nint y;");
        assert!(editor.buffer().line(0).iter().all(|g| g.in_line_comment));
        assert!(editor.buffer().line(1).iter().all(|g| !g.in_line_comment));
        assert_eq!(colors(&editor, 1)[0], PaletteIndex::Keyword);
    }

    #[test]
    fn block_comment_spans_lines_until_closed() {
        let editor = c_editor("/*\nmid\n*/ int");
        assert!(editor.buffer().line(0).iter().all(|g| g.in_block_comment));
        assert!(editor.buffer().line(1).iter().all(|g| g.in_block_comment));
        let last = editor.buffer().line(2);
        assert!(last[0].in_block_comment);
        assert!(last[1].in_block_comment);
        assert!(!last[3].in_block_comment);
        assert_eq!(colors(&editor, 2)[3..6], [PaletteIndex::Keyword; 3]);
    }

    #[test]
    fn comment_opener_inside_string_is_inert() {
        let editor = c_editor("\"/*\" x\ny");
        assert!(editor.buffer().line(1).iter().all(|g| !g.in_block_comment));
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let editor = c_editor("\"a\\\"b\" /* c */");
        let line = editor.buffer().line(0);
        assert!(!line[0].in_block_comment);
        assert!(line[7].in_block_comment);
    }

    #[test]
    fn doubled_quote_stays_inside_the_string() {
        let editor = c_editor("\"a\"\"b /*x\ny");
        let line = editor.buffer().line(0);
        // The comment opener sits inside the still-open string.
        assert!(!line[6].in_block_comment);
        assert!(editor.buffer().line(1).iter().all(|g| !g.in_block_comment));
    }

    #[test]
    fn preprocessor_region_flags_the_directive_line() {
        let editor = c_editor("#include <stdio.h>\nint x;");
        assert!(editor.buffer().line(0).iter().all(|g| g.in_preprocessor));
        assert!(editor.buffer().line(1).iter().all(|g| !g.in_preprocessor));
    }

    #[test]
    fn backslash_continuation_extends_preprocessor_region() {
        let editor = c_editor("#define A \\\nB");
        assert!(editor.buffer().line(1).iter().all(|g| g.in_preprocessor));
    }

    fn word_after_markers(text: &str) -> Option<(std::ops::Range<usize>, PaletteIndex)> {
        let bytes = text.as_bytes();
        let mut start = 0;
        while start < bytes.len() && !bytes[start].is_ascii_alphabetic() {
            start += 1;
        }
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
            end += 1;
        }
        (end > start).then(|| (start..end, PaletteIndex::Identifier))
    }

    #[test]
    fn refinement_reads_region_flags_at_the_scan_position() {
        let mut language = LanguageDefinition::new("words");
        language.keywords.insert("x".to_string());
        language.tokenize = Some(word_after_markers);

        // The scan starts on the blank before the directive marker, where
        // the preprocessor flag is clear, so keyword lookup applies to the
        // token the callback skipped ahead to.
        let mut editor = TextEditor::new();
        editor.set_language_definition(language);
        editor.set_text(" #x");
        editor.colorize_now();
        assert_eq!(colors(&editor, 0)[2], PaletteIndex::Keyword);
    }

    #[test]
    fn regex_path_recolors_ten_lines_per_step() {
        let mut editor = TextEditor::new();
        // GLSL colors through the pattern list, so the 10-line increment
        // applies.
        editor.set_language_definition(LanguageDefinition::glsl());

        let text = vec!["int a;"; 25].join("\n");
        editor.set_text(&text);

        assert!(editor.has_pending_colorizing());
        assert!(editor.colorize_step());
        assert!(editor.colorize_step());
        assert!(!editor.colorize_step());
        assert!(!editor.has_pending_colorizing());
        assert_eq!(colors(&editor, 24)[0..3], [PaletteIndex::Keyword; 3]);
    }

    #[test]
    fn callback_path_recolors_in_one_step() {
        let mut editor = c_editor(&vec!["int a;"; 25].join("\n"));
        editor.colorize_all();
        assert!(!editor.colorize_step());
    }

    #[test]
    fn disabling_the_colorizer_stops_work() {
        let mut editor = c_editor("int a;");
        editor.set_colorizer_enabled(false);
        editor.colorize_all();
        assert!(!editor.has_pending_colorizing());
        assert!(!editor.colorize_step());
    }

    #[test]
    fn edits_mark_a_narrow_dirty_window() {
        let mut editor = c_editor("int a;\nint b;\nint c;");
        editor.set_cursor_position(Coordinates::new(1, 6));
        editor.enter_char('x', false);
        assert!(editor.has_pending_colorizing());
        editor.colorize_now();
        assert_eq!(colors(&editor, 1)[0..3], [PaletteIndex::Keyword; 3]);
    }
}
