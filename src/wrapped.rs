//! A literal string split into a fixed head, an editable value, and a fixed tail.
use std::fmt;
use std::ops::Range;

/// A slice of input text with an editable value in the middle.
///
/// The full literal is always `head + value + tail`. Replacing the value with
/// [`Wrapped::set_value`] never touches the bytes of the head or the tail, so
/// punctuation, whitespace and brace style around the value survive an edit.
///
/// ```
/// use bibscript::Wrapped;
///
/// let mut title = Wrapped::from_parts("{", "Old Title", "},\n");
/// title.set_value("New Title");
/// assert_eq!(title.full(), "{New Title},\n");
/// assert_eq!(title.tail(), "},\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wrapped {
    text: String,
    start: usize,
    end: usize,
}

impl Wrapped {
    /// Wrap `text` so that all of it is the value.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            start: 0,
            end,
        }
    }

    /// Wrap `text` with the value at the byte range `value`.
    ///
    /// The range is clamped to the text and to char boundaries; an inverted range is
    /// collapsed to an empty value at its start.
    pub fn with_range(text: impl Into<String>, value: Range<usize>) -> Self {
        let text = text.into();
        let start = floor_boundary(&text, value.start);
        let end = floor_boundary(&text, value.end).max(start);
        Self { text, start, end }
    }

    /// Assemble from separate head, value, and tail pieces.
    pub fn from_parts(head: &str, value: &str, tail: &str) -> Self {
        let mut text = String::with_capacity(head.len() + value.len() + tail.len());
        text.push_str(head);
        text.push_str(value);
        text.push_str(tail);
        Self {
            text,
            start: head.len(),
            end: head.len() + value.len(),
        }
    }

    pub fn head(&self) -> &str {
        &self.text[..self.start]
    }

    pub fn value(&self) -> &str {
        &self.text[self.start..self.end]
    }

    pub fn tail(&self) -> &str {
        &self.text[self.end..]
    }

    /// The full literal, as it will be written back.
    pub fn full(&self) -> &str {
        &self.text
    }

    /// The byte range of the value inside [`Wrapped::full`].
    pub fn value_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes of the full literal.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the value, keeping the head and tail bytes untouched.
    pub fn set_value(&mut self, value: &str) {
        self.text.replace_range(self.start..self.end, value);
        self.end = self.start + value.len();
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_range() {
        let w = Wrapped::with_range("  title = ", 2..7);
        assert_eq!(w.head(), "  ");
        assert_eq!(w.value(), "title");
        assert_eq!(w.tail(), " = ");
        assert_eq!(w.full(), "  title = ");
    }

    #[test]
    fn test_set_value() {
        let mut w = Wrapped::with_range("{abc},\n", 1..4);
        w.set_value("longer value");
        assert_eq!(w.full(), "{longer value},\n");
        assert_eq!(w.value_range(), 1..13);

        w.set_value("");
        assert_eq!(w.full(), "{},\n");
        assert_eq!(w.value(), "");
        assert_eq!(w.tail(), "},\n");
    }

    #[test]
    fn test_from_parts() {
        let w = Wrapped::from_parts("@", "article", "{");
        assert_eq!(w.value_range(), 1..8);
        assert_eq!(w.to_string(), "@article{");
    }

    #[test]
    fn test_new() {
        let w = Wrapped::new("raw text\n");
        assert_eq!(w.head(), "");
        assert_eq!(w.tail(), "");
        assert_eq!(w.value(), "raw text\n");
    }

    #[test]
    fn test_range_clamping() {
        let w = Wrapped::with_range("abc", 2..1);
        assert_eq!(w.value_range(), 2..2);

        let w = Wrapped::with_range("abc", 1..10);
        assert_eq!(w.value(), "bc");

        // never split a char
        let w = Wrapped::with_range("a🍄b", 2..4);
        assert_eq!(w.value(), "");
        assert_eq!(w.full(), "a🍄b");
    }
}
