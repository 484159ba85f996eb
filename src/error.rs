use std::fmt;

use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

/// A structural failure while parsing one record.
///
/// The position is a byte offset. While a chunk is being parsed it is relative to the
/// start of the chunk; once the error leaves a [`Bibliography`](crate::Bibliography)
/// it is relative to the start of the whole input.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub position: usize,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// Ran out of input in the middle of a field list.
    UnexpectedEof,
    /// Expected a field key.
    ExpectedFieldKey,
    /// Expected `=` between a field key and its value.
    ExpectedEquals,
    /// A `{` or `"` block was never closed.
    UnterminatedBlock,
    /// A `}` without a matching `{` inside a quoted block.
    UnexpectedClosingBracket,
    /// A character which cannot start a value token.
    UnexpectedChar(char),
}

impl Error {
    pub(crate) fn syntax(code: ErrorCode, position: usize) -> Self {
        Self {
            code,
            position,
            key: None,
        }
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_owned());
        self
    }

    /// Shift the position by `offset` bytes.
    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::UnexpectedEof => f.write_str("unexpected end of entry"),
            ErrorCode::ExpectedFieldKey => f.write_str("expected field key"),
            ErrorCode::ExpectedEquals => f.write_str("expected '=' after field key"),
            ErrorCode::UnterminatedBlock => f.write_str("unterminated block"),
            ErrorCode::UnexpectedClosingBracket => {
                f.write_str("unexpected closing bracket in quoted block")
            }
            ErrorCode::UnexpectedChar(ch) => write!(f, "unexpected character '{ch}' in value"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} at byte {} in entry '{}'", self.code, self.position, key),
            None => write!(f, "{} at byte {}", self.code, self.position),
        }
    }
}

impl std::error::Error for Error {}

/// Convert a byte offset into a 1-based `(line, column)` pair.
///
/// The column counts chars, not bytes. Offsets past the end are clamped.
pub fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &input[..offset];
    let line = memchr::memchr_iter(b'\n', before.as_bytes()).count() + 1;
    let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |idx| idx + 1);
    (line, before[line_start..].chars().count() + 1)
}
