//! Character cursor over one source file.
//!
//! The cursor owns the decoded text and a position that is tracked in three
//! ways at once: the character index used for slicing, the byte offset, and
//! the zero-based line/column pair. Reads outside the text return `None`.

use std::sync::Arc;

use crate::location::Location;

/// Predicate over the text at a character index.
///
/// Predicates receive the whole text rather than a single character so they
/// can look behind, as the string-edge check does for backslash escapes.
pub type CharPredicate = fn(&[char], usize) -> bool;

#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
    loc: Location,
}

impl Cursor {
    pub fn new(file: impl Into<Arc<str>>, source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            pos: 0,
            loc: Location::start(file),
        }
    }

    /// Snapshot of the current position.
    pub fn location(&self) -> Location {
        self.loc.clone()
    }

    /// Character index of the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn text(&self) -> &[char] {
        &self.chars
    }

    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    pub fn peek_prev(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied())
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Step over the current character. Does nothing at end of input.
    pub fn advance_one(&mut self) {
        let Some(ch) = self.current() else {
            return;
        };
        if ch == '\n' {
            self.loc.line += 1;
            self.loc.column = 0;
        } else {
            self.loc.column += 1;
        }
        self.loc.index += ch.len_utf8();
        self.pos += 1;
    }

    /// Extend over a maximal run: advance while `pred` holds for the *next*
    /// character. The cursor stops on the last character of the run.
    pub fn advance_while(&mut self, pred: CharPredicate) {
        while !self.is_at_end() && pred(&self.chars, self.pos + 1) {
            self.advance_one();
        }
    }

    /// Skip to a delimiter: advance while `pred` is false for the *current*
    /// character. The cursor stops on the delimiter, or at end of input.
    pub fn advance_until(&mut self, pred: CharPredicate) {
        while !self.is_at_end() && !pred(&self.chars, self.pos) {
            self.advance_one();
        }
    }

    /// Text between two character indices, clamped to the source.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_digit(text: &[char], index: usize) -> bool {
        text.get(index).is_some_and(|c| c.is_ascii_digit())
    }

    fn is_newline(text: &[char], index: usize) -> bool {
        text.get(index) == Some(&'\n')
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut cursor = Cursor::new("t.boot", "ab\ncd");
        for _ in 0..4 {
            cursor.advance_one();
        }
        let loc = cursor.location();
        assert_eq!((loc.line, loc.column, loc.index), (1, 1, 4));
        assert_eq!(cursor.current(), Some('d'));
    }

    #[test]
    fn counts_bytes_separately_from_columns() {
        let mut cursor = Cursor::new("t.boot", "éx");
        cursor.advance_one();
        let loc = cursor.location();
        assert_eq!(loc.column, 1);
        assert_eq!(loc.index, 2);
        assert_eq!(cursor.current(), Some('x'));
    }

    #[test]
    fn out_of_range_reads_are_none() {
        let mut cursor = Cursor::new("t.boot", "a");
        assert_eq!(cursor.peek_prev(), None);
        assert_eq!(cursor.peek_next(), None);
        cursor.advance_one();
        cursor.advance_one();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.peek_prev(), Some('a'));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn advance_while_stops_on_last_matching_char() {
        let mut cursor = Cursor::new("t.boot", "123abc");
        cursor.advance_while(is_digit);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.current(), Some('3'));
    }

    #[test]
    fn advance_until_stops_on_delimiter_or_end() {
        let mut cursor = Cursor::new("t.boot", "// note\n42");
        cursor.advance_until(is_newline);
        assert_eq!(cursor.current(), Some('\n'));

        let mut cursor = Cursor::new("t.boot", "no newline");
        cursor.advance_until(is_newline);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn slices_by_character_index() {
        let cursor = Cursor::new("t.boot", "héllo");
        assert_eq!(cursor.slice(1, 3), "él");
        assert_eq!(cursor.slice(3, 99), "lo");
    }
}
