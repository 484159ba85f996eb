//! Non-fatal problems found while loading or looking up records.
use std::fmt;

use serde::Serialize;

use crate::error::ErrorCode;

/// A recoverable problem. The offending record is always retained as parsed.
///
/// Offsets are byte offsets into the input which was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// More than one entry has this key.
    DuplicateKey { key: String, offset: usize },
    /// An entry has an empty key, as in `@article{,`.
    MissingKey { entry_type: String, offset: usize },
    /// Non-whitespace text follows the closing `}` of an entry.
    TrailingText { key: String, offset: usize },
    /// A field key occurs more than once in one entry.
    DuplicateField { key: String, field: String },
    /// An `@type{` record whose key could not be read, kept as an opaque record.
    Unkeyed { entry_type: String, offset: usize },
    /// A record failed to parse and was kept as raw text.
    Skipped {
        key: Option<String>,
        offset: usize,
        code: ErrorCode,
        position: usize,
    },
}

impl Warning {
    /// Byte offset of the problem, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Warning::DuplicateKey { offset, .. }
            | Warning::MissingKey { offset, .. }
            | Warning::TrailingText { offset, .. }
            | Warning::Unkeyed { offset, .. } => Some(*offset),
            Warning::Skipped { position, .. } => Some(*position),
            Warning::DuplicateField { .. } => None,
        }
    }

    /// Shift every offset by `by` bytes.
    pub(crate) fn offset_by(mut self, by: usize) -> Self {
        match &mut self {
            Warning::DuplicateKey { offset, .. }
            | Warning::MissingKey { offset, .. }
            | Warning::TrailingText { offset, .. }
            | Warning::Unkeyed { offset, .. } => *offset += by,
            Warning::Skipped {
                offset, position, ..
            } => {
                *offset += by;
                *position += by;
            }
            Warning::DuplicateField { .. } => {}
        }
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateKey { key, .. } => write!(f, "duplicate key '{key}'"),
            Warning::MissingKey { entry_type, .. } => {
                write!(f, "missing key in '@{entry_type}' entry")
            }
            Warning::TrailingText { key, .. } => {
                write!(f, "unexpected text after the end of entry '{key}'")
            }
            Warning::DuplicateField { key, field } => {
                write!(f, "duplicate field '{field}' in entry '{key}'")
            }
            Warning::Unkeyed { entry_type, .. } => {
                write!(f, "'@{entry_type}' record without a key kept as-is")
            }
            Warning::Skipped {
                key: Some(key),
                code,
                ..
            } => write!(f, "entry '{key}' kept unparsed: {code}"),
            Warning::Skipped { key: None, code, .. } => write!(f, "record kept unparsed: {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by() {
        let warning = Warning::Skipped {
            key: Some("k".into()),
            offset: 2,
            code: ErrorCode::UnexpectedEof,
            position: 10,
        }
        .offset_by(5);
        assert_eq!(warning.offset(), Some(15));
        assert!(matches!(warning, Warning::Skipped { offset: 7, .. }));

        let warning = Warning::DuplicateField {
            key: "k".into(),
            field: "f".into(),
        };
        assert_eq!(warning.clone().offset_by(3), warning);
    }

    #[test]
    fn test_display() {
        let warning = Warning::DuplicateKey {
            key: "knuth84".into(),
            offset: 0,
        };
        assert_eq!(warning.to_string(), "duplicate key 'knuth84'");
        let warning = Warning::Skipped {
            key: None,
            offset: 0,
            code: ErrorCode::UnterminatedBlock,
            position: 0,
        };
        assert_eq!(warning.to_string(), "record kept unparsed: unterminated block");
    }
}
