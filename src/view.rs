//! Read-only conveniences built on top of the parsed records.
use std::collections::HashMap;
use std::fmt;

use crate::parse::scan;
use crate::record::{Entry, Field, SpecialEntry};

/// Remove one pair of `{}` or `""` if it encloses the whole of `s`.
///
/// ```
/// use bibscript::view::strip_delimiters;
///
/// assert_eq!(strip_delimiters("{Title}"), "Title");
/// assert_eq!(strip_delimiters("\"Doe, J.\""), "Doe, J.");
/// assert_eq!(strip_delimiters("{A} # {B}"), "{A} # {B}");
/// assert_eq!(strip_delimiters("1984"), "1984");
/// ```
pub fn strip_delimiters(s: &str) -> &str {
    match scan::block(s, 0) {
        Ok(end) if end == s.len() => &s[1..end - 1],
        _ => s,
    }
}

impl Field {
    /// The value without its enclosing delimiters.
    ///
    /// The outer braces of a `{...}` value are never part of [`Field::value`], so only a quoted
    /// value has a pair removed here. Inner braces, which protect case, are kept.
    pub fn text(&self) -> &str {
        if self.value.head().ends_with('{') {
            self.value()
        } else {
            strip_delimiters(self.value())
        }
    }
}

impl Entry {
    /// Map from field key to field text, with the same keys as [`Entry::fields_by_key`].
    pub fn field_values(&self) -> HashMap<&str, &str> {
        let (fields, _) = self.fields_by_key();
        fields
            .into_iter()
            .map(|(name, field)| (name, field.text()))
            .collect()
    }

    /// A short citation for the entry.
    ///
    /// An `article` with a `journal` gives `journal volume, first-page (year)`, an `article` with
    /// an `eprint` gives the eprint, and anything else gives the entry key.
    ///
    /// ```
    /// use bibscript::parse::parse_record;
    ///
    /// let record = parse_record(
    ///     "@article{doe20, journal = {Phys. Rev.}, volume = 12, pages = {100--110}, year = 2020}",
    /// )
    /// .unwrap();
    /// let entry = record.as_entry().unwrap();
    /// assert_eq!(entry.reference(), "Phys. Rev. 12, 100 (2020)");
    /// ```
    pub fn reference(&self) -> String {
        if self.is_type("article") {
            let text = |name: &str| self.get(name).map(Field::text);
            if let Some(journal) = text("journal") {
                let get = |name: &str| text(name).unwrap_or_default();
                let first_page = get("pages").split('-').next().unwrap_or_default();
                return format!("{journal} {}, {first_page} ({})", get("volume"), get("year"));
            }
            if let Some(eprint) = text("eprint") {
                return eprint.to_owned();
            }
        }
        self.key().to_owned()
    }

    /// A human-readable summary with one line per field.
    pub fn summary(&self) -> Summary<'_> {
        Summary::Entry(self)
    }
}

impl SpecialEntry {
    /// A human-readable summary: the type on one line and the body, unwrapped, on the next.
    pub fn summary(&self) -> Summary<'_> {
        Summary::Special(self)
    }
}

/// Display adapter returned by [`Entry::summary`] and [`SpecialEntry::summary`].
///
/// ```
/// use bibscript::parse::parse_record;
///
/// let record = parse_record("@book{knuth84,\n  title = {The\n  \\TeX book},\n  year = 1984\n}").unwrap();
/// assert_eq!(
///     record.as_entry().unwrap().summary().to_string(),
///     "@book, knuth84\n\ttitle     : The  \\TeX book\n\tyear      : 1984"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Summary<'a> {
    Entry(&'a Entry),
    Special(&'a SpecialEntry),
}

fn one_line(value: &str) -> String {
    value.replace('\n', "").trim().to_owned()
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Entry(entry) => {
                write!(f, "@{}, {}", entry.entry_type(), entry.key())?;
                for field in entry.fields() {
                    write!(f, "\n\t{:<10}: {}", field.name(), one_line(field.value()))?;
                }
                Ok(())
            }
            Summary::Special(special) => {
                write!(f, "@{}\n{}", special.entry_type(), one_line(special.body()))
            }
        }
    }
}
