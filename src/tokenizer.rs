//! Splitting input into tokens.

use crate::cursor::{Cursor, StrCursor};
use crate::program::{Program, ERROR_SYMBOL};
use crate::vm::Vm;

/// One lexeme.
///
/// `position` and `length` are in bytes; `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol_id: i32,
    pub value: String,
    pub line: usize,
    pub column: usize,
    pub position: usize,
    pub length: usize,
}

impl Token {
    /// True for text no rule matched.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.symbol_id == ERROR_SYMBOL
    }
}

/// Iterator over the tokens of an input string.
///
/// Never stalls: where no rule matches at least one code point, the next
/// code point becomes an error token.
pub struct Tokenizer<'l, 'i> {
    vm: Vm<'l>,
    cursor: StrCursor<'i>,
}

impl<'l, 'i> Tokenizer<'l, 'i> {
    pub fn new(program: &'l Program, cursor: StrCursor<'i>) -> Self {
        Tokenizer {
            vm: Vm::new(program),
            cursor,
        }
    }

    /// Byte offset of the next token.
    #[inline]
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }
}

impl Iterator for Tokenizer<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let first = self.cursor.current()?;
        let start = self.cursor.checkpoint();
        let (line, column, position) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());

        self.cursor.clear_capture();
        let (symbol_id, length) = match self.vm.run(&mut self.cursor) {
            Some(m) if m.end > 0 => (m.symbol, m.end),
            _ => (
                ERROR_SYMBOL,
                char::from_u32(first).map_or(1, char::len_utf8),
            ),
        };

        // the VM may have read past the end of the match
        let end = position + length;
        if self.cursor.offset() != end {
            self.cursor.restore(start);
            while self.cursor.offset() < end && self.cursor.advance().is_some() {}
        }

        let input = self.cursor.input();
        Some(Token {
            symbol_id,
            value: input[position..end].to_string(),
            line,
            column,
            position,
            length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::assemble;

    // digits, or a run of 'a' that must end in 'b'
    const PROGRAM: &str = r#"
            save 0
            jmp num, ab, error
    num:    set "0".."9"
            jmp num, numend
    numend: save 1
            match 0
    ab:     char "a"
            jmp ab, abend
    abend:  char "b"
            save 1
            match 1
    error:  any
            save 1
            match -1
    "#;

    fn tokens(input: &str) -> Vec<(i32, &str, usize, usize)> {
        let program = assemble(PROGRAM).unwrap();
        Tokenizer::new(&program, StrCursor::new(input))
            .map(|t| (t.symbol_id, &input[t.position..t.position + t.length], t.line, t.column))
            .collect()
    }

    #[test]
    fn test_tokens_and_positions() {
        assert_eq!(
            tokens("12aab\n7"),
            vec![
                (0, "12", 1, 1),
                (1, "aab", 1, 3),
                (-1, "\n", 1, 6),
                (0, "7", 2, 1),
            ]
        );
    }

    #[test]
    fn test_rewinds_after_over_read() {
        // "aa" is read looking for 'b', then only the first 'a' is an error token
        assert_eq!(
            tokens("aa1"),
            vec![(-1, "a", 1, 1), (-1, "a", 1, 2), (0, "1", 1, 3)]
        );
    }

    #[test]
    fn test_unmatched_input_advances_one_code_point() {
        let program = assemble("save 0\nchar \"x\"\nsave 1\nmatch 0").unwrap();
        let values: Vec<_> = Tokenizer::new(&program, StrCursor::new("éx"))
            .map(|t| (t.symbol_id, t.value))
            .collect();
        assert_eq!(
            values,
            vec![(ERROR_SYMBOL, "é".to_string()), (0, "x".to_string())]
        );
    }

    #[test]
    fn test_empty_input() {
        let program = assemble(PROGRAM).unwrap();
        assert_eq!(Tokenizer::new(&program, StrCursor::new("")).count(), 0);
    }
}
