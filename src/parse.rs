//! Format-preserving record parser.
//!
//! A record chunk is classified by its first line:
//!
//! ```bib
//! @article{key,          <- `@type{key,`: an Entry, unless the type is special
//!   title = {A {Nested} Title},
//!   author = "Doe, J." # and # {Roe, R.},
//! }
//! ```
//!
//! The fields follow the grammar
//!
//! ```text
//! fields     := field (',' fields | ε)
//! field      := key '=' value
//! value      := block | stringlist
//! stringlist := string ('#' string)*
//! string     := '"' block '"' | '{' block '}' | bareword
//! ```
//!
//! Every byte of the chunk ends up in exactly one [`Wrapped`] so that the record can be written
//! back unchanged.
pub mod scan;
mod split;

pub use split::{Chunks, split_chunks};

use crate::diagnostic::Warning;
use crate::error::{Error, ErrorCode, Result};
use crate::record::{Entry, EntryKind, Field, Part, Record, SpecialEntry};
use crate::wrapped::Wrapped;

/// Parse one chunk into a record, discarding warnings.
///
/// ```
/// use bibscript::parse::parse_record;
/// use bibscript::Record;
///
/// let record = parse_record("@article{key,\n  title = {Title},\n}\n").unwrap();
/// let Record::Entry(entry) = &record else { panic!() };
/// assert_eq!(entry.key(), "key");
/// assert_eq!(entry.get("title").unwrap().value(), "Title");
/// assert_eq!(record.to_string(), "@article{key,\n  title = {Title},\n}\n");
/// ```
pub fn parse_record(chunk: &str) -> Result<Record> {
    parse_record_with_warnings(chunk).map(|(record, _)| record)
}

/// Parse one chunk into a record, returning any warnings with offsets relative to the chunk.
pub fn parse_record_with_warnings(chunk: &str) -> Result<(Record, Vec<Warning>)> {
    let mut parser = RecordParser::new(chunk);
    let record = parser.record()?;
    Ok((record, parser.warnings))
}

/// Positions found in the first line of a record: `@type{key,`.
struct Header {
    type_end: usize,
    /// Position of the `,` after a clean key.
    comma: Option<usize>,
}

impl Header {
    fn read(input: &str) -> Option<Self> {
        let bytes = input.as_bytes();
        if bytes.first() != Some(&b'@') {
            return None;
        }
        let type_end = scan::identifier(input, 1);
        if bytes.get(type_end) != Some(&b'{') {
            return None;
        }
        let key_end = scan::entry_key(input, type_end + 1);
        let comma = (bytes.get(key_end) == Some(&b',')).then_some(key_end);
        Some(Self { type_end, comma })
    }

    fn brace(&self) -> usize {
        self.type_end
    }

    fn key_start(&self) -> usize {
        self.type_end + 1
    }
}

/// Cursor-driven recursive descent parser over a single chunk.
pub struct RecordParser<'r> {
    input: &'r str,
    pos: usize,
    warnings: Vec<Warning>,
}

impl<'r> RecordParser<'r> {
    pub fn new(input: &'r str) -> Self {
        Self {
            input,
            pos: 0,
            warnings: Vec::new(),
        }
    }

    /// Warnings raised so far, with offsets relative to the chunk.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn record(&mut self) -> Result<Record> {
        let Some(header) = Header::read(self.input) else {
            self.pos = self.input.len();
            return Ok(Record::Raw(Wrapped::new(self.input)));
        };

        let kind = EntryKind::new(&self.input[1..header.type_end]);
        match header.comma {
            Some(comma) if !kind.is_special() => self.entry(&header, comma).map(Record::Entry),
            _ => Ok(Record::Special(self.special(&header))),
        }
    }

    fn special(&mut self, header: &Header) -> SpecialEntry {
        let body_start = header.brace() + 1;
        self.pos = self.input.len();
        SpecialEntry {
            entry_type: Wrapped::with_range(&self.input[..body_start], 1..header.type_end),
            body: Wrapped::new(&self.input[body_start..]),
        }
    }

    fn entry(&mut self, header: &Header, comma: usize) -> Result<Entry> {
        let key_start = header.key_start();
        let entry_type = Wrapped::with_range(&self.input[..key_start], 1..header.type_end);
        let key = Wrapped::with_range(&self.input[key_start..=comma], 0..comma - key_start);
        self.pos = comma + 1;

        match self.fields(key.value()) {
            Ok(parts) => Ok(Entry {
                entry_type,
                key,
                parts,
            }),
            Err(err) => {
                tracing::debug!(
                    key = key.value(),
                    parsed = &self.input[..self.pos],
                    remainder = &self.input[self.pos..],
                    "unable to parse entry"
                );
                Err(err.with_key(key.value()))
            }
        }
    }

    /// Parse fields until the closing `}` of the entry. The closing bracket and everything after
    /// it becomes a trailing part.
    fn fields(&mut self, key: &str) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        loop {
            let Some(idx) = scan::field_start(self.input, self.pos) else {
                return Err(Error::syntax(ErrorCode::UnexpectedEof, self.input.len()));
            };

            if self.input.as_bytes()[idx] == b'}' {
                if let Some(junk) = scan::next_non_whitespace(self.input, idx + 1) {
                    tracing::warn!(key, offset = junk, "text after end of entry");
                    self.warnings.push(Warning::TrailingText {
                        key: key.to_owned(),
                        offset: junk,
                    });
                }
                parts.push(Part::Trailing(Wrapped::new(&self.input[self.pos..])));
                self.pos = self.input.len();
                return Ok(parts);
            }

            parts.push(Part::Field(self.field()?));
        }
    }

    /// Parse `key = value` and the following `,` if there is one.
    fn field(&mut self) -> Result<Field> {
        let bytes = self.input.as_bytes();
        let start = self.pos;

        let name_start = scan::skip_whitespace(self.input, start);
        let name_end = scan::identifier(self.input, name_start);
        if name_end == name_start {
            return Err(Error::syntax(ErrorCode::ExpectedFieldKey, name_start));
        }

        let sep = scan::skip_whitespace(self.input, name_end);
        match bytes.get(sep) {
            Some(b'=') => {}
            Some(_) => return Err(Error::syntax(ErrorCode::ExpectedEquals, sep)),
            None => return Err(Error::syntax(ErrorCode::UnexpectedEof, sep)),
        }

        let value_start = scan::skip_whitespace(self.input, sep + 1);
        let key = Wrapped::with_range(
            &self.input[start..value_start],
            name_start - start..name_end - start,
        );
        self.pos = value_start;

        let value = match bytes.get(value_start) {
            None => return Err(Error::syntax(ErrorCode::UnexpectedEof, value_start)),
            Some(b'{') if !self.block_is_concatenated()? => self.block_value()?,
            Some(_) => self.string_list()?,
        };

        Ok(Field { key, value })
    }

    /// Whether the `{...}` block at the cursor is the first string of a `#` concatenation.
    fn block_is_concatenated(&self) -> Result<bool> {
        let end = scan::block(self.input, self.pos)?;
        Ok(scan::next_non_whitespace(self.input, end)
            .is_some_and(|idx| self.input.as_bytes()[idx] == b'#'))
    }

    /// Parse a `{...}` value. The braces are part of the head and tail, not the value.
    ///
    /// If the block is followed by `,`, the comma and anything before it belongs to this field.
    /// If it is followed by `}`, that bracket closes the entry and is left for the field loop.
    fn block_value(&mut self) -> Result<Wrapped> {
        let start = self.pos;
        let end = scan::block(self.input, start)?;
        self.pos = end;

        match scan::comma_or_close(self.input, end) {
            Some(idx) if self.input.as_bytes()[idx] == b',' => {
                self.pos = idx + 1;
                Ok(Wrapped::with_range(
                    &self.input[start..self.pos],
                    1..end - start - 1,
                ))
            }
            Some(_) => Ok(Wrapped::with_range(
                &self.input[start..end],
                1..end - start - 1,
            )),
            None => Err(Error::syntax(ErrorCode::UnexpectedEof, self.input.len())),
        }
    }

    /// Parse a `#`-separated list of strings, stopping after a `,` or before a `}`.
    ///
    /// The value runs from the first string to the end of the last string.
    fn string_list(&mut self) -> Result<Wrapped> {
        let start = self.pos;
        let mut value_end = start;

        loop {
            let Some(idx) = scan::next_non_whitespace(self.input, self.pos) else {
                return Err(Error::syntax(ErrorCode::UnexpectedEof, self.input.len()));
            };
            self.pos = idx;

            match self.input.as_bytes()[idx] {
                b',' => {
                    self.pos = idx + 1;
                    break;
                }
                b'}' => break,
                b'"' | b'{' => {
                    self.pos = scan::block(self.input, idx)?;
                    value_end = self.pos;
                }
                b'#' => self.pos = idx + 1,
                b if scan::is_identifier(b) => {
                    // TODO: a bare word ends at whitespace, so `jan feb` is read as two strings
                    // without a `#`; reject that once existing files have been checked.
                    self.pos = scan::identifier(self.input, idx);
                    value_end = self.pos;
                }
                _ => {
                    let ch = self.input[idx..].chars().next().unwrap_or_default();
                    return Err(Error::syntax(ErrorCode::UnexpectedChar(ch), idx));
                }
            }
        }

        Ok(Wrapped::with_range(
            &self.input[start..self.pos],
            0..value_end - start,
        ))
    }
}
