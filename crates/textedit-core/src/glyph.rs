//! Glyph cells and UTF-8 cell arithmetic.
//!
//! A line is stored as a vector of byte-sized cells: each [`Glyph`] holds one
//! UTF-8 code unit, so a multi-byte character occupies consecutive cells. All
//! index walks over a line must step by [`utf8_char_length`] of the lead byte,
//! never by 1, to avoid landing inside a multi-byte sequence.

use textedit_lang::PaletteIndex;

/// One stored byte cell plus its syntax classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// The raw UTF-8 code unit.
    pub byte: u8,
    /// Token class assigned by the colorizer's classification pass.
    pub color: PaletteIndex,
    /// Set while the cell lies inside a `//`-style comment.
    pub in_line_comment: bool,
    /// Set while the cell lies inside an open block comment.
    pub in_block_comment: bool,
    /// Set while the cell lies on a preprocessor line.
    pub in_preprocessor: bool,
}

impl Glyph {
    /// Creates a cell with the given class and cleared comment flags.
    pub fn new(byte: u8, color: PaletteIndex) -> Self {
        Self {
            byte,
            color,
            in_line_comment: false,
            in_block_comment: false,
            in_preprocessor: false,
        }
    }

    /// The class a renderer should use once comment flags are folded in.
    ///
    /// Comment flags win over the token class because the comment scan runs
    /// after classification and does not rewrite `color`. With the colorizer
    /// disabled everything renders as [`PaletteIndex::Default`].
    pub fn effective_class(&self, colorizer_enabled: bool) -> PaletteIndex {
        if !colorizer_enabled {
            PaletteIndex::Default
        } else if self.in_line_comment {
            PaletteIndex::Comment
        } else if self.in_block_comment {
            PaletteIndex::MultiLineComment
        } else {
            self.color
        }
    }
}

/// A document line: byte cells in document order, no trailing newline cell.
pub type Line = Vec<Glyph>;

/// Number of cells one character spans, classified from its lead byte.
pub fn utf8_char_length(byte: u8) -> usize {
    if byte & 0xFE == 0xFC {
        6
    } else if byte & 0xFC == 0xF8 {
        5
    } else if byte & 0xF8 == 0xF0 {
        4
    } else if byte & 0xF0 == 0xE0 {
        3
    } else if byte & 0xE0 == 0xC0 {
        2
    } else {
        1
    }
}

/// Whether `byte` is a UTF-8 continuation byte (never a character start).
pub fn is_utf8_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
