//! Hand-written C-style token scanners.
//!
//! Each scanner inspects the start of a byte slice and returns the exclusive
//! end offset of the token it recognizes, or `None`. They are composed into
//! the callback tokenizer used by the C and C++ definitions, and are exported
//! for hosts that assemble their own [`LanguageDefinition`](crate::LanguageDefinition).

use crate::{PaletteIndex, TokenizeFn};
use std::ops::Range;

/// Scan a double-quoted string literal with `\"` escapes.
pub fn scan_string(input: &[u8]) -> Option<usize> {
    if input.first() != Some(&b'"') {
        return None;
    }
    let mut p = 1;
    while p < input.len() {
        if input[p] == b'"' {
            return Some(p + 1);
        }
        if input[p] == b'\\' && p + 1 < input.len() && input[p + 1] == b'"' {
            p += 1;
        }
        p += 1;
    }
    None
}

/// Scan a single-quoted character literal, allowing one `\` escape.
pub fn scan_char_literal(input: &[u8]) -> Option<usize> {
    if input.first() != Some(&b'\'') {
        return None;
    }
    let mut p = 1;
    if input.get(p) == Some(&b'\\') {
        p += 1;
    }
    if p < input.len() {
        p += 1;
    }
    if input.get(p) == Some(&b'\'') {
        Some(p + 1)
    } else {
        None
    }
}

/// Scan an `[A-Za-z_][A-Za-z0-9_]*` identifier.
pub fn scan_identifier(input: &[u8]) -> Option<usize> {
    let first = *input.first()?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let mut p = 1;
    while p < input.len() && (input[p].is_ascii_alphanumeric() || input[p] == b'_') {
        p += 1;
    }
    Some(p)
}

/// Scan a numeric literal: decimal, hex (`0x..`), binary (`0b..`), floats
/// with optional exponent, and the usual `f`/`u`/`l` suffixes.
pub fn scan_number(input: &[u8]) -> Option<usize> {
    let first = *input.first()?;
    let starts_with_digit = first.is_ascii_digit();
    if first != b'+' && first != b'-' && !starts_with_digit {
        return None;
    }

    let mut p = 1;
    let mut has_digits = starts_with_digit;
    while p < input.len() && input[p].is_ascii_digit() {
        has_digits = true;
        p += 1;
    }
    if !has_digits {
        return None;
    }

    let mut is_float = false;
    let mut is_hex = false;
    let mut is_binary = false;

    match input.get(p) {
        Some(b'.') => {
            is_float = true;
            p += 1;
            while p < input.len() && input[p].is_ascii_digit() {
                p += 1;
            }
        }
        Some(b'x') | Some(b'X') => {
            is_hex = true;
            p += 1;
            while p < input.len() && input[p].is_ascii_hexdigit() {
                p += 1;
            }
        }
        Some(b'b') | Some(b'B') => {
            is_binary = true;
            p += 1;
            while p < input.len() && (input[p] == b'0' || input[p] == b'1') {
                p += 1;
            }
        }
        _ => {}
    }

    if !is_hex && !is_binary {
        if matches!(input.get(p), Some(b'e') | Some(b'E')) {
            is_float = true;
            p += 1;
            if matches!(input.get(p), Some(b'+') | Some(b'-')) {
                p += 1;
            }
            let mut exp_digits = false;
            while p < input.len() && input[p].is_ascii_digit() {
                exp_digits = true;
                p += 1;
            }
            if !exp_digits {
                return None;
            }
        }
        if input.get(p) == Some(&b'f') {
            p += 1;
        }
    }

    if !is_float {
        while matches!(input.get(p), Some(b'u' | b'U' | b'l' | b'L')) {
            p += 1;
        }
    }

    Some(p)
}

/// Scan a single punctuation byte.
pub fn scan_punctuation(input: &[u8]) -> Option<usize> {
    match input.first()? {
        b'[' | b']' | b'{' | b'}' | b'!' | b'%' | b'^' | b'&' | b'*' | b'(' | b')' | b'-'
        | b'+' | b'=' | b'~' | b'|' | b'<' | b'>' | b'?' | b':' | b'/' | b';' | b',' | b'.' => {
            Some(1)
        }
        _ => None,
    }
}

/// The composed C-style tokenizer used by the C and C++ definitions.
///
/// Skips leading blanks, then tries string, char literal, identifier, number
/// and punctuation in that order. A blank-only remainder is consumed in one
/// empty `Default` token so the scan terminates without per-byte stepping.
pub const C_STYLE_TOKENIZE: TokenizeFn = c_style_tokenize;

fn c_style_tokenize(input: &str) -> Option<(Range<usize>, PaletteIndex)> {
    let bytes = input.as_bytes();
    let mut start = 0;
    while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
        start += 1;
    }
    let rest = &bytes[start..];
    if rest.is_empty() {
        return Some((bytes.len()..bytes.len(), PaletteIndex::Default));
    }

    let (len, class) = if let Some(end) = scan_string(rest) {
        (end, PaletteIndex::String)
    } else if let Some(end) = scan_char_literal(rest) {
        (end, PaletteIndex::CharLiteral)
    } else if let Some(end) = scan_identifier(rest) {
        (end, PaletteIndex::Identifier)
    } else if let Some(end) = scan_number(rest) {
        (end, PaletteIndex::Number)
    } else if let Some(end) = scan_punctuation(rest) {
        (end, PaletteIndex::Punctuation)
    } else {
        return None;
    };

    Some((start..start + len, class))
}
