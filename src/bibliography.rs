use std::collections::HashMap;
use std::fmt;

use crate::config::{Config, OnError};
use crate::diagnostic::Warning;
use crate::error::Result;
use crate::parse::{Chunks, parse_record_with_warnings};
use crate::record::{Entry, EntryKind, Record};
use crate::wrapped::Wrapped;

/// An ordered sequence of records representing a whole file.
///
/// Writing the records in order reproduces the input byte-for-byte, except for field values
/// which were deliberately changed.
///
/// ```
/// use bibscript::Bibliography;
///
/// let input = "% my references\n@book{knuth84,\n  title = {The \\TeX book},\n  year = 1984,\n}\n";
/// let mut bib = Bibliography::parse(input).unwrap();
/// assert_eq!(bib.serialize(), input);
///
/// bib.entry_mut("knuth84").unwrap().set("year", "1986");
/// assert_eq!(
///     bib.serialize(),
///     "% my references\n@book{knuth84,\n  title = {The \\TeX book},\n  year = 1986,\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    records: Vec<Record>,
    warnings: Vec<Warning>,
}

impl Bibliography {
    /// Load with the default [`Config`]: records which fail to parse are kept as raw text.
    #[allow(clippy::should_implement_trait)]
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, &Config::default())
    }

    pub fn parse_with(input: &str, config: &Config) -> Result<Self> {
        let mut bibliography = Self::default();

        for (offset, chunk) in Chunks::new(input) {
            match parse_record_with_warnings(chunk) {
                Ok((record, warnings)) => {
                    bibliography
                        .warnings
                        .extend(warnings.into_iter().map(|w| w.offset_by(offset)));
                    if let Record::Special(special) = &record {
                        if special.kind() == EntryKind::Regular {
                            tracing::warn!(
                                entry_type = special.entry_type(),
                                offset,
                                "record without key"
                            );
                            bibliography.warnings.push(Warning::Unkeyed {
                                entry_type: special.entry_type().to_owned(),
                                offset,
                            });
                        }
                    }
                    bibliography.records.push(record);
                }
                Err(err) => {
                    let err = err.offset_by(offset);
                    match config.on_error {
                        OnError::Abort => {
                            tracing::error!(key = err.key.as_deref(), offset, "{err}");
                            return Err(err);
                        }
                        OnError::Skip => {
                            tracing::warn!(
                                key = err.key.as_deref(),
                                offset,
                                "{err}; keeping record unparsed"
                            );
                            bibliography.warnings.push(Warning::Skipped {
                                key: err.key,
                                offset,
                                code: err.code,
                                position: err.position,
                            });
                            bibliography.records.push(Record::Raw(Wrapped::new(chunk)));
                        }
                    }
                }
            }
            tracing::debug!(offset, len = chunk.len(), "parsed record");
        }

        if config.check_keys {
            let warnings = bibliography.check_keys();
            bibliography.warnings.extend(warnings);
        }

        Ok(bibliography)
    }

    /// The full text, with any edits applied.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Warnings raised while loading.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// All records, including special entries and raw text.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Append a record to the end.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Regular entries only.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.records.iter().filter_map(Record::as_entry)
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.records.iter_mut().filter_map(Record::as_entry_mut)
    }

    /// Regular entries paired with the byte offset at which they currently start.
    fn entries_with_offsets(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.records
            .iter()
            .scan(0, |offset, record| {
                let start = *offset;
                *offset += record.len();
                Some((start, record))
            })
            .filter_map(|(offset, record)| record.as_entry().map(|entry| (offset, entry)))
    }

    /// Map from entry key to entry.
    ///
    /// Entries with an empty key are left out and reported as [`Warning::MissingKey`]. If a key
    /// occurs more than once the last entry wins and each repetition is reported as a
    /// [`Warning::DuplicateKey`].
    pub fn entries_by_key(&self) -> (HashMap<&str, &Entry>, Vec<Warning>) {
        let mut map = HashMap::new();
        let mut warnings = Vec::new();

        for (offset, entry) in self.entries_with_offsets() {
            if entry.key().is_empty() {
                tracing::warn!(entry_type = entry.entry_type(), offset, "missing key");
                warnings.push(Warning::MissingKey {
                    entry_type: entry.entry_type().to_owned(),
                    offset,
                });
            } else if map.insert(entry.key(), entry).is_some() {
                tracing::warn!(key = entry.key(), offset, "duplicate key");
                warnings.push(Warning::DuplicateKey {
                    key: entry.key().to_owned(),
                    offset,
                });
            }
        }

        (map, warnings)
    }

    /// Duplicate and missing key warnings for the current records.
    pub fn check_keys(&self) -> Vec<Warning> {
        self.entries_by_key().1
    }

    /// The last entry with this key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries().filter(|entry| entry.key() == key).last()
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries_mut().filter(|entry| entry.key() == key).last()
    }
}

impl fmt::Display for Bibliography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            record.fmt(f)?;
        }
        Ok(())
    }
}
