//! Byte-cursor scanning primitives.
//!
//! Every function takes the chunk text and a byte position, and returns a new position. All
//! returned positions are either the end of the input or immediately before or after an ascii
//! byte, so they are always valid char boundaries for slicing the original `&str`.
use memchr::{memchr2, memchr3};

use crate::error::{Error, ErrorCode, Result};

/// Lookup table for bytes which could appear in an identifier. This includes the ascii printable
/// characters with `"{}(),= \t\n\\#%\""` removed, as well as bytes that could appear in non-ascii
/// UTF-8.
pub(crate) static IDENTIFIER_ALLOWED: [bool; 256] = {
    const PR: bool = false; // disallowed printable bytes
    const CT: bool = false; // non-printable ascii
    const __: bool = true; // permitted bytes
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 0
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 1
        CT, __, PR, PR, __, PR, __, __, PR, PR, __, __, PR, __, __, __, // 2
        __, __, __, __, __, __, __, __, __, __, __, __, __, PR, __, __, // 3
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, PR, __, __, __, // 5
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, PR, __, PR, __, CT, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

/// Whitespace, following the convention of `u8::is_ascii_whitespace`: U+000B VERTICAL TAB is
/// not whitespace.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

#[inline]
pub fn is_identifier(b: u8) -> bool {
    IDENTIFIER_ALLOWED[b as usize]
}

/// Skip whitespace, returning the position of the first other byte or the end of input.
pub fn skip_whitespace(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Position of the next non-whitespace byte, if any.
pub fn next_non_whitespace(input: &str, pos: usize) -> Option<usize> {
    let pos = skip_whitespace(input, pos);
    (pos < input.len()).then_some(pos)
}

/// Consume a possibly empty run of identifier bytes, returning the end of the run.
pub fn identifier(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() && is_identifier(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Consume a possibly empty entry key, which is any run of bytes other than `,`, `}`, or
/// whitespace.
pub fn entry_key(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() && !matches!(bytes[pos], b',' | b'}') && !bytes[pos].is_ascii_whitespace()
    {
        pos += 1;
    }
    pos
}

/// Find the next byte which either starts a field key or closes the entry.
pub fn field_start(input: &str, pos: usize) -> Option<usize> {
    input.as_bytes()[pos.min(input.len())..]
        .iter()
        .position(|&b| b == b'}' || is_identifier(b))
        .map(|offset| pos + offset)
}

/// Find the next `,` or `}`.
pub fn comma_or_close(input: &str, pos: usize) -> Option<usize> {
    memchr2(b',', b'}', &input.as_bytes()[pos.min(input.len())..]).map(|offset| pos + offset)
}

/// Skip an escape sequence starting with the `\` at `pos`. The escaped char is never a
/// delimiter, except for a newline, which is never escaped.
#[inline]
fn escape(bytes: &[u8], pos: usize) -> usize {
    match bytes.get(pos + 1) {
        Some(b'\n') | None => pos + 1,
        Some(_) => pos + 2,
    }
}

/// Consume a block starting at the opening `{` or `"` at `start`, returning the position just
/// past the matching closing delimiter.
///
/// Nested `{...}` pairs are tracked by depth, backslash escapes are skipped as a unit, and inside
/// a `{` block a `"` has no special meaning.
pub fn block(input: &str, start: usize) -> Result<usize> {
    match input.as_bytes().get(start) {
        Some(b'{') => curly(input.as_bytes(), start),
        Some(b'"') => quoted(input.as_bytes(), start),
        Some(_) => Err(Error::syntax(
            ErrorCode::UnexpectedChar(
                input
                    .get(start..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            ),
            start,
        )),
        None => Err(Error::syntax(ErrorCode::UnexpectedEof, start)),
    }
}

fn curly(bytes: &[u8], start: usize) -> Result<usize> {
    let mut bracket_depth = 0;
    let mut pos = start + 1;

    while let Some(offset) = memchr3(b'{', b'}', b'\\', &bytes[pos..]) {
        let idx = pos + offset;
        match bytes[idx] {
            b'{' => {
                bracket_depth += 1;
                pos = idx + 1;
            }
            b'}' => {
                // found the closing bracket
                if bracket_depth == 0 {
                    return Ok(idx + 1);
                }
                bracket_depth -= 1;
                pos = idx + 1;
            }
            _ => pos = escape(bytes, idx),
        }
    }

    Err(Error::syntax(ErrorCode::UnterminatedBlock, start))
}

fn quoted(bytes: &[u8], start: usize) -> Result<usize> {
    let mut bracket_depth = 0;
    let mut pos = start + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => {
                pos = escape(bytes, pos);
                continue;
            }
            b'"' if bracket_depth == 0 => return Ok(pos + 1),
            b'{' => bracket_depth += 1,
            b'}' => {
                if bracket_depth == 0 {
                    return Err(Error::syntax(ErrorCode::UnexpectedClosingBracket, pos));
                }
                bracket_depth -= 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(Error::syntax(ErrorCode::UnterminatedBlock, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace(" \t\r\n\x0Cx", 0), 5);
        assert_eq!(skip_whitespace("  ", 0), 2);
        assert_eq!(skip_whitespace("\x0b", 0), 0);
        assert_eq!(next_non_whitespace("   ", 0), None);
        assert_eq!(next_non_whitespace(" }", 0), Some(1));
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("journal-URL = x", 0), 11);
        assert_eq!(identifier("a🍄b{", 0), 6);
        assert_eq!(identifier("{", 0), 0);
        assert_eq!(identifier("ab", 5), 5);
    }

    #[test]
    fn test_entry_key() {
        assert_eq!(entry_key("key:0,", 0), 5);
        assert_eq!(entry_key("k{1}}", 0), 3);
        assert_eq!(entry_key(" key", 0), 0);
    }

    #[test]
    fn test_field_start() {
        assert_eq!(field_start(",\n  title", 0), Some(4));
        assert_eq!(field_start(",\n}\n", 0), Some(2));
        assert_eq!(field_start(" , ", 0), None);
        assert_eq!(field_start("x", 4), None);
    }

    #[test]
    fn test_curly() {
        assert_eq!(block("{a{b}c}, rest", 0), Ok(7));
        assert_eq!(block(r"{a\}b}", 0), Ok(6));
        assert_eq!(block("{\"}", 0), Ok(3));
        assert_eq!(block("x{}y", 1), Ok(3));
        assert_eq!(block("{🍄{}}", 0), Ok(8));
        assert_eq!(
            block("{open{}", 0),
            Err(Error::syntax(ErrorCode::UnterminatedBlock, 0))
        );
        assert_eq!(
            block("{trailing\\", 0),
            Err(Error::syntax(ErrorCode::UnterminatedBlock, 0))
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(block("\"quoted\" # x", 0), Ok(8));
        assert_eq!(block("\"a{\"}b\"", 0), Ok(7));
        assert_eq!(block(r#""a\"b""#, 0), Ok(6));
        assert_eq!(
            block("\"a}b\"", 0),
            Err(Error::syntax(ErrorCode::UnexpectedClosingBracket, 2))
        );
        assert_eq!(
            block("\"never", 0),
            Err(Error::syntax(ErrorCode::UnterminatedBlock, 0))
        );
    }

    #[test]
    fn test_escaped_newline_is_not_escaped() {
        // the newline after `\` is consumed normally, so the `}` after it still closes
        assert_eq!(block("{a\\\n}", 0), Ok(5));
    }

    #[test]
    fn test_block_start() {
        assert_eq!(
            block("x", 0),
            Err(Error::syntax(ErrorCode::UnexpectedChar('x'), 0))
        );
        assert_eq!(block("", 0), Err(Error::syntax(ErrorCode::UnexpectedEof, 0)));
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*", pos in 0usize..8) {
            let pos = pos.min(s.len());
            let _ = skip_whitespace(&s, pos);
            let _ = identifier(&s, pos);
            let _ = entry_key(&s, pos);
            let _ = field_start(&s, pos);
            let _ = comma_or_close(&s, pos);
            let _ = block(&s, pos);
        }

        #[test]
        fn block_ends_on_char_boundary(s in "[{\"][^\\\\]*") {
            if let Ok(end) = block(&s, 0) {
                prop_assert!(s.is_char_boundary(end));
            }
        }
    }
}
