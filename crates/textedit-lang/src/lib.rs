#![warn(missing_docs)]
//! `textedit-lang` - data-driven language configuration for `textedit-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any
//! regex or parsing machinery. It provides the palette taxonomy, the
//! [`LanguageDefinition`] value the editor kernel consumes wholesale, and the
//! built-in definitions for a handful of C-like languages. The kernel owns
//! the compiled regex cache; this crate only carries the pattern *strings*.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

mod langs;
mod tokenize;

pub use tokenize::{
    C_STYLE_TOKENIZE, scan_char_literal, scan_identifier, scan_number, scan_punctuation,
    scan_string,
};

/// Lexical category assigned to each glyph by the colorizer.
///
/// Doubles as the word-equivalence key for word-wise navigation: two adjacent
/// glyphs belong to the same word iff their palette indices match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteIndex {
    /// Unclassified text.
    #[default]
    Default,
    /// Language keyword.
    Keyword,
    /// Numeric literal.
    Number,
    /// String literal.
    String,
    /// Character literal.
    CharLiteral,
    /// Operators and delimiters.
    Punctuation,
    /// Preprocessor directive.
    Preprocessor,
    /// Plain identifier.
    Identifier,
    /// Identifier found in the language's known-identifier table.
    KnownIdentifier,
    /// Identifier found in the language's preprocessor-identifier table.
    PreprocIdentifier,
    /// Single-line comment.
    Comment,
    /// Multi-line (block) comment.
    MultiLineComment,
    /// Background filler (used for indentation glyphs inserted by block indent).
    Background,
}

/// A custom tokenizer callback.
///
/// Receives the unscanned remainder of a line and, on success, returns the
/// byte span of the next token relative to that remainder together with its
/// palette class. Returning `None` makes the colorizer fall back to the
/// language's ordered pattern list (and, failing that, advance one byte).
pub type TokenizeFn = fn(&str) -> Option<(Range<usize>, PaletteIndex)>;

/// An ordered fallback rule: a regex pattern string and the class its
/// matches receive. Patterns are anchored at the scan position by the kernel.
pub type TokenPattern = (String, PaletteIndex);

/// Everything the editor kernel needs to know about a language.
///
/// Supplied to the editor wholesale; swapping it rebuilds the regex cache and
/// forces a full recolor.
#[derive(Debug, Clone, Default)]
pub struct LanguageDefinition {
    /// Display name ("C++", "GLSL", ...).
    pub name: String,
    /// Keyword set, checked after identifier tokenization.
    pub keywords: HashSet<String>,
    /// Known identifiers (built-in functions etc.), mapped to a short
    /// declaration string hosts may surface in tooltips.
    pub identifiers: HashMap<String, String>,
    /// Preprocessor identifiers (e.g. `#define`d names).
    pub preproc_identifiers: HashMap<String, String>,
    /// Block comment opening token (e.g. `/*`). Empty disables block comments.
    pub comment_start: String,
    /// Block comment closing token (e.g. `*/`).
    pub comment_end: String,
    /// Single-line comment token (e.g. `//`). Empty disables line comments.
    pub single_line_comment: String,
    /// First non-whitespace character that opens a preprocessor line.
    pub preproc_char: char,
    /// Copy the previous line's leading blanks when a newline is entered.
    pub auto_indentation: bool,
    /// Whether keyword/identifier lookup is case sensitive.
    pub case_sensitive: bool,
    /// Optional fast tokenizer; when present the colorizer prefers it over
    /// the pattern list and processes dirty ranges in much larger chunks.
    pub tokenize: Option<TokenizeFn>,
    /// Ordered `(pattern, class)` fallback rules, tried first-match-wins.
    pub token_patterns: Vec<TokenPattern>,
}

impl LanguageDefinition {
    /// A bare definition with the given name and the common defaults
    /// (`#` preprocessor marker, auto indentation, case sensitive).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preproc_char: '#',
            auto_indentation: true,
            case_sensitive: true,
            ..Self::default()
        }
    }

    /// C++ definition (callback tokenizer).
    pub fn cpp() -> Self {
        langs::cpp()
    }

    /// C definition (callback tokenizer).
    pub fn c() -> Self {
        langs::c()
    }

    /// HLSL definition (regex pattern list).
    pub fn hlsl() -> Self {
        langs::hlsl()
    }

    /// GLSL definition (regex pattern list).
    pub fn glsl() -> Self {
        langs::glsl()
    }

    /// SQL definition (regex pattern list, case insensitive).
    pub fn sql() -> Self {
        langs::sql()
    }

    /// Lua definition (regex pattern list, `--` comments).
    pub fn lua() -> Self {
        langs::lua()
    }

    /// Look up a built-in definition by file extension (with or without the
    /// leading dot). Unknown extensions fall back to the C definition.
    pub fn from_extension(extension: &str) -> Self {
        match extension.trim_start_matches('.') {
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Self::cpp(),
            "hlsl" | "fx" => Self::hlsl(),
            "glsl" | "vert" | "frag" => Self::glsl(),
            "sql" => Self::sql(),
            "lua" => Self::lua(),
            _ => Self::c(),
        }
    }

    /// Returns `true` if a block comment token pair is configured.
    pub fn has_block_comment(&self) -> bool {
        !self.comment_start.is_empty() && !self.comment_end.is_empty()
    }

    /// Returns `true` if a single-line comment token is configured.
    pub fn has_line_comment(&self) -> bool {
        !self.single_line_comment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_known_and_fallback() {
        assert_eq!(LanguageDefinition::from_extension(".cpp").name, "C++");
        assert_eq!(LanguageDefinition::from_extension("lua").name, "Lua");
        assert_eq!(LanguageDefinition::from_extension(".weird").name, "C");
    }

    #[test]
    fn test_definitions_are_owned_values() {
        let mut a = LanguageDefinition::cpp();
        let b = LanguageDefinition::cpp();
        a.keywords.insert("bogus".to_string());
        assert!(!b.keywords.contains("bogus"));
    }

    #[test]
    fn test_comment_config_flags() {
        let cpp = LanguageDefinition::cpp();
        assert!(cpp.has_block_comment());
        assert!(cpp.has_line_comment());

        let bare = LanguageDefinition::new("bare");
        assert!(!bare.has_block_comment());
        assert!(!bare.has_line_comment());
    }
}
