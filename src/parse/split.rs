use memchr::memchr;

/// Iterator over the chunks of a bibliography, together with their byte offsets.
///
/// Every chunk except possibly the first starts at a line beginning with `@`, and runs up to
/// (not including) the next such line. Text before the first such line is its own chunk.
/// Concatenating the chunks in order gives back the input.
///
/// ```
/// use bibscript::parse::Chunks;
///
/// let input = "preamble text\n@article{a,\n}\n@book{b,\n}\n";
/// let chunks: Vec<_> = Chunks::new(input).collect();
/// assert_eq!(
///     chunks,
///     vec![(0, "preamble text\n"), (14, "@article{a,\n}\n"), (28, "@book{b,\n}\n")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Chunks<'r> {
    input: &'r str,
    pos: usize,
}

impl<'r> Chunks<'r> {
    pub fn new(input: &'r str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'r> Iterator for Chunks<'r> {
    type Item = (usize, &'r str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut search = start;
        let end = loop {
            match memchr(b'\n', &bytes[search..]) {
                Some(offset) => {
                    let line_start = search + offset + 1;
                    if bytes.get(line_start) == Some(&b'@') {
                        break line_start;
                    }
                    search = line_start;
                }
                None => break bytes.len(),
            }
        };

        self.pos = end;
        Some((start, &self.input[start..end]))
    }
}

/// Split a whole file into record chunks.
pub fn split_chunks(input: &str) -> Vec<&str> {
    Chunks::new(input).map(|(_, chunk)| chunk).collect()
}
