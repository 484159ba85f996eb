//! The three shapes a top-level record can take.
use std::collections::HashMap;
use std::fmt;

use unicase::UniCase;

use crate::diagnostic::Warning;
use crate::wrapped::Wrapped;

/// Classification of an entry type such as `article` in `@article{...`.
///
/// Matching is case-insensitive, so `@COMMent` is a [`EntryKind::Comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A `preamble` entry type.
    Preamble,
    /// A `comment` entry type.
    Comment,
    /// A `string` entry type.
    Macro,
    /// Any other entry type.
    Regular,
}

impl EntryKind {
    pub fn new(entry_type: &str) -> Self {
        let uni = UniCase::unicode(entry_type);
        if uni == UniCase::ascii("preamble") {
            Self::Preamble
        } else if uni == UniCase::ascii("comment") {
            Self::Comment
        } else if uni == UniCase::ascii("string") {
            Self::Macro
        } else {
            Self::Regular
        }
    }

    /// Whether the body of this kind of entry is kept opaque.
    pub fn is_special(self) -> bool {
        self != Self::Regular
    }
}

/// A single `key = value` attribute of an [`Entry`].
///
/// The key's full literal followed by the value's full literal is exactly the input text of the
/// field, including the whitespace before the key and the trailing comma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: Wrapped,
    pub value: Wrapped,
}

impl Field {
    /// The field key, such as `title`.
    pub fn name(&self) -> &str {
        self.key.value()
    }

    /// The editable value. For a `{...}` block this excludes the outer braces.
    pub fn value(&self) -> &str {
        self.value.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.value.set_value(value);
    }

    pub fn len(&self) -> usize {
        self.key.len() + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key, self.value)
    }
}

/// One piece of an entry after the citation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Field(Field),
    /// Text that is not a field, such as the closing `}` and the whitespace following it.
    Trailing(Wrapped),
}

impl Part {
    pub fn len(&self) -> usize {
        match self {
            Part::Field(field) => field.len(),
            Part::Trailing(wrapped) => wrapped.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Field(field) => field.fmt(f),
            Part::Trailing(wrapped) => wrapped.fmt(f),
        }
    }
}

/// A typed and keyed record with a list of fields.
///
/// The type wraps `@article{` with value `article`, and the key wraps `key,` with value `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub entry_type: Wrapped,
    pub key: Wrapped,
    pub parts: Vec<Part>,
}

impl Entry {
    pub fn entry_type(&self) -> &str {
        self.entry_type.value()
    }

    pub fn key(&self) -> &str {
        self.key.value()
    }

    /// Whether the entry type equals `entry_type`, ignoring case.
    pub fn is_type(&self, entry_type: &str) -> bool {
        UniCase::unicode(self.entry_type()) == UniCase::unicode(entry_type)
    }

    /// The fields, in input order, skipping any trailing text.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.parts.iter().filter_map(|part| match part {
            Part::Field(field) => Some(field),
            Part::Trailing(_) => None,
        })
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.parts.iter_mut().filter_map(|part| match part {
            Part::Field(field) => Some(field),
            Part::Trailing(_) => None,
        })
    }

    /// Map from field key to field.
    ///
    /// Keys are compared ignoring case, as in [`Entry::get`]. If a key occurs more than once, the
    /// last field wins, is stored under its own spelling, and a [`Warning::DuplicateField`] is
    /// reported for each repetition.
    pub fn fields_by_key(&self) -> (HashMap<&str, &Field>, Vec<Warning>) {
        let mut map = HashMap::new();
        let mut spelling: HashMap<UniCase<&str>, &str> = HashMap::new();
        let mut warnings = Vec::new();
        for field in self.fields() {
            let previous = spelling.insert(UniCase::unicode(field.name()), field.name());
            if let Some(previous) = previous {
                map.remove(previous);
            }
            map.insert(field.name(), field);
            if previous.is_some() {
                tracing::warn!(key = self.key(), field = field.name(), "duplicate field");
                warnings.push(Warning::DuplicateField {
                    key: self.key().to_owned(),
                    field: field.name().to_owned(),
                });
            }
        }
        (map, warnings)
    }

    /// Look up a field by key, ignoring case. The last matching field wins.
    pub fn get(&self, name: &str) -> Option<&Field> {
        let name = UniCase::unicode(name);
        self.fields()
            .filter(|field| UniCase::unicode(field.name()) == name)
            .last()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        let name = UniCase::unicode(name);
        self.fields_mut()
            .filter(|field| UniCase::unicode(field.name()) == name)
            .last()
    }

    /// Replace the value of the field `name`, returning false if there is no such field.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match self.get_mut(name) {
            Some(field) => {
                field.set_value(value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entry_type.len() + self.key.len() + self.parts.iter().map(Part::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.entry_type, self.key)?;
        for part in &self.parts {
            part.fmt(f)?;
        }
        Ok(())
    }
}

/// An `@comment`, `@string` or `@preamble` record, or an entry without a usable key. The body is
/// everything after the opening `{` and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialEntry {
    pub entry_type: Wrapped,
    pub body: Wrapped,
}

impl SpecialEntry {
    pub fn entry_type(&self) -> &str {
        self.entry_type.value()
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::new(self.entry_type())
    }

    pub fn body(&self) -> &str {
        self.body.value()
    }

    pub fn len(&self) -> usize {
        self.entry_type.len() + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SpecialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.entry_type, self.body)
    }
}

/// One top-level unit of a bibliography.
///
/// The [`Display`](fmt::Display) implementation writes the full literal, so the records of a
/// file written in order reproduce the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Entry(Entry),
    Special(SpecialEntry),
    /// Text which is not a record, such as a file header, kept verbatim.
    Raw(Wrapped),
}

impl Record {
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Record::Entry(entry) => Some(entry),
            Record::Special(_) | Record::Raw(_) => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut Entry> {
        match self {
            Record::Entry(entry) => Some(entry),
            Record::Special(_) | Record::Raw(_) => None,
        }
    }

    /// The full literal of the record.
    pub fn full(&self) -> String {
        self.to_string()
    }

    /// Length in bytes of the full literal.
    pub fn len(&self) -> usize {
        match self {
            Record::Entry(entry) => entry.len(),
            Record::Special(special) => special.len(),
            Record::Raw(raw) => raw.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Entry(entry) => entry.fmt(f),
            Record::Special(special) => special.fmt(f),
            Record::Raw(raw) => raw.fmt(f),
        }
    }
}
