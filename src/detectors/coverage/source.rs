//! Source text handling for resolving uncovered lines to snippets.

use std::borrow::Cow;

/// Decode source bytes as UTF-8, falling back to Latin-1 for invalid input.
///
/// Latin-1 maps every byte to a char, so line boundaries are preserved for any
/// single-byte-compatible encoding.
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&byte| char::from(byte)).collect()),
    }
}

/// Random access to the lines of one source file.
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
        }
    }

    /// The 1-indexed line, or `None` when out of range.
    pub fn get(&self, line_number: usize) -> Option<&'a str> {
        line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index).copied())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_source_is_borrowed() {
        let decoded = decode_source("fn main() {}\n".as_bytes());
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "fn main() {}\n");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let bytes = b"caf\xe9 = 1\nreturn caf\xe9\n";
        let decoded = decode_source(bytes);
        assert_eq!(decoded, "café = 1\nreturn café\n");
        assert_eq!(SourceLines::new(&decoded).len(), 2);
    }

    #[test]
    fn lines_are_one_indexed() {
        let source = "first\r\nsecond\nthird";
        let lines = SourceLines::new(source);
        assert_eq!(lines.get(0), None);
        assert_eq!(lines.get(1), Some("first"));
        assert_eq!(lines.get(3), Some("third"));
        assert_eq!(lines.get(4), None);
    }
}
