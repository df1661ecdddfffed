//! Input cursors.
//!
//! The matcher and the parsers both read input one code point at a time
//! through the [`Cursor`] trait. A cursor tracks line, column and offset for
//! error reporting and keeps a capture buffer that consumers append to.

use crate::error::ParseError;

/// A forward-only stream of code points with position tracking.
pub trait Cursor {
    /// The code point under the cursor, or `None` at end of input.
    fn current(&self) -> Option<u32>;

    /// Move past the current code point and return the new current one.
    fn advance(&mut self) -> Option<u32>;

    /// 1-based line of the current code point.
    fn line(&self) -> usize;

    /// 1-based column of the current code point.
    fn column(&self) -> usize;

    /// Byte offset of the current code point from the start of input.
    fn offset(&self) -> usize;

    fn capture_buffer(&self) -> &str;

    fn capture_buffer_mut(&mut self) -> &mut String;

    /// Append the current code point to the capture buffer.
    fn capture(&mut self) {
        if let Some(c) = self.current().and_then(char::from_u32) {
            self.capture_buffer_mut().push(c);
        }
    }

    fn clear_capture(&mut self) {
        self.capture_buffer_mut().clear();
    }

    /// A parse error located at the current position.
    fn error(&self, message: impl Into<String>) -> ParseError
    where
        Self: Sized,
    {
        ParseError::new(message, self.line(), self.column(), self.offset())
    }

    /// A parse error at the current position listing what would have been accepted.
    fn expecting(&self, expected: &[&str]) -> ParseError
    where
        Self: Sized,
    {
        let found = match self.current().and_then(char::from_u32) {
            Some(c) => format!("unexpected {:?}", c),
            None => "unexpected end of input".to_string(),
        };
        self.error(found).with_expected(expected.iter().copied())
    }

    /// Skip whitespace. Returns true if input remains.
    fn skip_whitespace(&mut self) -> bool {
        while let Some(c) = self.current().and_then(char::from_u32) {
            if !c.is_whitespace() {
                return true;
            }
            self.advance();
        }
        false
    }
}

/// Saved position of a [`StrCursor`], used to rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    offset: usize,
    line: usize,
    column: usize,
}

impl Checkpoint {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// A [`Cursor`] over an in-memory string.
#[derive(Debug, Clone)]
pub struct StrCursor<'a> {
    input: &'a str,
    offset: usize,
    current: Option<char>,
    line: usize,
    column: usize,
    tab_width: usize,
    capture: String,
}

impl<'a> StrCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            current: input.chars().next(),
            line: 1,
            column: 1,
            tab_width: 4,
            capture: String::new(),
        }
    }

    /// Columns advanced by a tab stop. Defaults to 4.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// The unread part of the input, starting at the current code point.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Return to a position saved by [`StrCursor::checkpoint`]. The capture
    /// buffer is left alone.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.current = self.input[self.offset..].chars().next();
    }
}

impl Cursor for StrCursor<'_> {
    #[inline]
    fn current(&self) -> Option<u32> {
        self.current.map(|c| c as u32)
    }

    fn advance(&mut self) -> Option<u32> {
        let c = self.current?;
        self.offset += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => {
                self.column = ((self.column - 1) / self.tab_width + 1) * self.tab_width + 1;
            }
            _ => self.column += 1,
        }
        self.current = self.input[self.offset..].chars().next();
        self.current()
    }

    #[inline]
    fn line(&self) -> usize {
        self.line
    }

    #[inline]
    fn column(&self) -> usize {
        self.column
    }

    #[inline]
    fn offset(&self) -> usize {
        self.offset
    }

    fn capture_buffer(&self) -> &str {
        &self.capture
    }

    fn capture_buffer_mut(&mut self) -> &mut String {
        &mut self.capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let mut cursor = StrCursor::new("ab\ncé\td");
        assert_eq!(cursor.current(), Some('a' as u32));
        assert_eq!((cursor.line(), cursor.column(), cursor.offset()), (1, 1, 0));
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current(), Some('\n' as u32));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column(), cursor.offset()), (2, 1, 3));
        cursor.advance();
        assert_eq!(cursor.current(), Some('é' as u32));
        cursor.advance();
        assert_eq!(cursor.offset(), 6);
        assert_eq!(cursor.column(), 3);
        cursor.advance();
        // tab from column 3 lands on the next stop
        assert_eq!(cursor.column(), 5);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn test_capture_and_restore() {
        let mut cursor = StrCursor::new("xyz");
        let start = cursor.checkpoint();
        cursor.capture();
        cursor.advance();
        cursor.capture();
        cursor.advance();
        assert_eq!(cursor.capture_buffer(), "xy");
        assert_eq!(cursor.remaining(), "z");
        cursor.restore(start);
        assert_eq!(cursor.current(), Some('x' as u32));
        assert_eq!(cursor.capture_buffer(), "xy");
        cursor.clear_capture();
        assert_eq!(cursor.capture_buffer(), "");
    }

    #[test]
    fn test_expecting_error() {
        let mut cursor = StrCursor::new("a]");
        cursor.advance();
        let err = cursor.expecting(&[")"]);
        assert_eq!(err.column, 2);
        assert_eq!(err.offset, 1);
        assert_eq!(err.expected, vec![")".to_string()]);
        assert!(err.message.contains("']'"));
    }
}
