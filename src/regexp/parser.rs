//! Recursive-descent regexp parser.
//!
//! Supports:
//! - `.` matches any code point
//! - `[...]` / `[^...]` classes with ranges, escapes and `[:name:]` classes
//! - `|` alternation, either side may be empty
//! - `(...)` grouping
//! - `?`, `+`, `*` and `{n}`, `{n,}`, `{,m}`, `{n,m}` quantifiers
//! - a trailing `?` on a quantifier makes it lazy, when enabled
//! - `\d \D \s \S \w \W`, `\p{Cat}` / `\P{Cat}`
//! - `\t \n \r \f \v \0 \a \e`, `\xHH`, `\uHHHH`, `\UHHHHHHHH`
//!
//! The parser reads from a [`Cursor`], so errors carry line, column and
//! offset, and the assembler can hand it a cursor positioned mid-file.

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::range::{self, CodepointRange, MAX_CODEPOINT};
use crate::unicode_categories::UnicodeCategory;

use super::ast::Ast;
use super::ParseOptions;

const DIGIT: &[(u32, u32)] = &[(0x30, 0x39)];
const SPACE: &[(u32, u32)] = &[(0x09, 0x0A), (0x0C, 0x0D), (0x20, 0x20)];
const WORD: &[(u32, u32)] = &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];

/// `[:name:]` classes usable inside brackets.
pub const NAMED_CLASSES: &[(&str, &[(u32, u32)])] = &[
    ("alnum", &[(0x30, 0x39), (0x41, 0x5A), (0x61, 0x7A)]),
    ("alpha", &[(0x41, 0x5A), (0x61, 0x7A)]),
    ("ascii", &[(0x00, 0x7F)]),
    ("blank", &[(0x09, 0x09), (0x20, 0x20)]),
    ("cntrl", &[(0x00, 0x1F), (0x7F, 0x7F)]),
    ("digit", DIGIT),
    ("graph", &[(0x21, 0x7E)]),
    ("lower", &[(0x61, 0x7A)]),
    ("print", &[(0x20, 0x7E)]),
    (
        "punct",
        &[(0x21, 0x2F), (0x3A, 0x40), (0x5B, 0x60), (0x7B, 0x7E)],
    ),
    ("space", &[(0x09, 0x0D), (0x20, 0x20)]),
    ("upper", &[(0x41, 0x5A)]),
    ("word", WORD),
    ("xdigit", &[(0x30, 0x39), (0x41, 0x46), (0x61, 0x66)]),
];

fn ranges_of(table: &[(u32, u32)]) -> Vec<CodepointRange> {
    table
        .iter()
        .map(|&(low, high)| CodepointRange::new(low, high))
        .collect()
}

/// Ranges for `\d \s \w` and their negations.
fn shorthand_class(c: char) -> Option<(Vec<CodepointRange>, bool)> {
    let (table, negated) = match c {
        'd' => (DIGIT, false),
        'D' => (DIGIT, true),
        's' => (SPACE, false),
        'S' => (SPACE, true),
        'w' => (WORD, false),
        'W' => (WORD, true),
        _ => return None,
    };
    Some((ranges_of(table), negated))
}

/// One item inside a bracket class.
enum ClassItem {
    Char(u32),
    Ranges(Vec<CodepointRange>),
}

pub(crate) struct Parser<'c, C: Cursor> {
    cursor: &'c mut C,
    options: ParseOptions,
    embedded: bool,
}

impl<'c, C: Cursor> Parser<'c, C> {
    /// `embedded` parsers stop at an unmatched `)` and leave it unread.
    pub(crate) fn new(cursor: &'c mut C, options: ParseOptions, embedded: bool) -> Self {
        Self {
            cursor,
            options,
            embedded,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Ast, ParseError> {
        let ast = self.parse_expr()?;
        match self.current_char() {
            None => Ok(ast),
            Some(')') if self.embedded => Ok(ast),
            Some(_) => Err(self.cursor.error("unmatched ')'")),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.cursor.current().and_then(char::from_u32)
    }

    fn advance(&mut self) -> Option<char> {
        self.cursor.advance();
        self.current_char()
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        if self.current_char() != Some(wanted) {
            let wanted = wanted.to_string();
            return Err(self.cursor.expecting(&[wanted.as_str()]));
        }
        self.cursor.advance();
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Ast, ParseError> {
        let mut branches = vec![self.parse_term()?];
        while self.current_char() == Some('|') {
            self.advance();
            branches.push(self.parse_term()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Ast::Alt(branches)
        })
    }

    fn parse_term(&mut self) -> Result<Ast, ParseError> {
        let mut items = Vec::new();
        while let Some(c) = self.current_char() {
            if c == '|' || c == ')' {
                break;
            }
            items.push(self.parse_factor()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Ast::Concat(items)
        })
    }

    fn parse_factor(&mut self) -> Result<Ast, ParseError> {
        let mut atom = self.parse_atom()?;
        while let Some((min, max)) = self.parse_modifier()? {
            let lazy = self.options.allow_lazy && self.current_char() == Some('?');
            if lazy {
                self.advance();
            }
            atom = if max == Some(0) {
                Ast::empty()
            } else {
                Ast::Repeat {
                    expr: Box::new(atom),
                    min,
                    max,
                    lazy,
                }
            };
        }
        Ok(atom)
    }

    fn parse_modifier(&mut self) -> Result<Option<(usize, Option<usize>)>, ParseError> {
        let bounds = match self.current_char() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => return self.parse_bounds().map(Some),
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(bounds))
    }

    fn parse_bounds(&mut self) -> Result<(usize, Option<usize>), ParseError> {
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        self.advance();
        let min = self.read_number()?;
        let bounds = if self.current_char() == Some(',') {
            self.advance();
            let max = self.read_number()?;
            (min.unwrap_or(0), max)
        } else {
            match min {
                Some(n) => (n, Some(n)),
                None => return Err(self.cursor.expecting(&["digit", ","])),
            }
        };
        if self.current_char() != Some('}') {
            let expected: &[&str] = if bounds.1.is_none() {
                &["digit", "}"]
            } else {
                &["}"]
            };
            return Err(self.cursor.expecting(expected));
        }
        self.advance();
        if let (min, Some(max)) = bounds {
            if min > max {
                return Err(ParseError::new(
                    format!("invalid repetition bounds {{{min},{max}}}"),
                    line,
                    column,
                    offset,
                ));
            }
        }
        Ok(bounds)
    }

    fn read_number(&mut self) -> Result<Option<usize>, ParseError> {
        let mut value: Option<usize> = None;
        while let Some(d) = self.current_char().and_then(|c| c.to_digit(10)) {
            value = Some(
                value
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(d as usize))
                    .ok_or_else(|| self.cursor.error("repetition count too large"))?,
            );
            self.advance();
        }
        Ok(value)
    }

    fn parse_atom(&mut self) -> Result<Ast, ParseError> {
        let Some(c) = self.current_char() else {
            return Err(self.cursor.expecting(&["expression"]));
        };
        match c {
            '(' => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            '[' => self.parse_class(),
            '.' => {
                self.advance();
                Ok(Ast::Dot)
            }
            '\\' => self.parse_escape(),
            '*' | '+' | '?' | '{' => Err(self.cursor.error("nothing to repeat")),
            _ => {
                self.advance();
                Ok(Ast::Literal(c as u32))
            }
        }
    }

    fn parse_escape(&mut self) -> Result<Ast, ParseError> {
        let Some(c) = self.advance() else {
            return Err(self.cursor.error("unterminated escape"));
        };
        if let Some((ranges, negated)) = shorthand_class(c) {
            self.advance();
            return Ok(Ast::set(ranges, negated));
        }
        if c == 'p' || c == 'P' {
            self.advance();
            let category = self.parse_category_name()?;
            return Ok(Ast::Category {
                category,
                negated: c == 'P',
            });
        }
        Ok(Ast::Literal(self.parse_escaped_char(false)?))
    }

    fn parse_category_name(&mut self) -> Result<UnicodeCategory, ParseError> {
        self.expect('{')?;
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if c == '}' {
                break;
            }
            name.push(c);
            self.advance();
        }
        self.expect('}')?;
        UnicodeCategory::from_abbreviation(&name).ok_or_else(|| {
            ParseError::new(format!("unknown unicode category {name:?}"), line, column, offset)
                .with_expected(UnicodeCategory::abbreviations().iter().copied())
        })
    }

    /// The code point for the escape whose letter is under the cursor. Leaves
    /// the cursor after the escape.
    fn parse_escaped_char(&mut self, in_class: bool) -> Result<u32, ParseError> {
        let Some(c) = self.current_char() else {
            return Err(self.cursor.error("unterminated escape"));
        };
        let cp = match c {
            't' => 0x09,
            'n' => 0x0A,
            'v' => 0x0B,
            'f' => 0x0C,
            'r' => 0x0D,
            '0' => 0x00,
            'a' => 0x07,
            'e' => 0x1B,
            'b' if in_class => 0x08,
            'x' => return self.read_hex(2, 2),
            'u' => return self.read_hex(4, 4),
            'U' => return self.read_hex(8, 8),
            other => other as u32,
        };
        self.advance();
        Ok(cp)
    }

    /// Read between `min` and `max` hex digits following the escape letter.
    fn read_hex(&mut self, min: usize, max: usize) -> Result<u32, ParseError> {
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        self.advance();
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(d) = self.current_char().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value.saturating_mul(16).saturating_add(d);
            count += 1;
            self.advance();
        }
        if count < min {
            return Err(self.cursor.expecting(&["hex digit"]));
        }
        if value > MAX_CODEPOINT {
            return Err(ParseError::new(
                format!("code point {value:#x} out of range"),
                line,
                column,
                offset,
            ));
        }
        Ok(value)
    }

    fn parse_class(&mut self) -> Result<Ast, ParseError> {
        self.advance();
        let negated = self.current_char() == Some('^');
        if negated {
            self.advance();
        }
        let mut ranges: Vec<CodepointRange> = Vec::new();
        let mut first = true;
        loop {
            let Some(c) = self.current_char() else {
                return Err(self.cursor.expecting(&["]"]));
            };
            if c == ']' && !first {
                self.advance();
                break;
            }
            first = false;
            let low = match self.parse_class_item()? {
                ClassItem::Ranges(set) => {
                    ranges.extend(set);
                    continue;
                }
                ClassItem::Char(cp) => cp,
            };
            if self.current_char() != Some('-') {
                ranges.push(CodepointRange::single(low));
                continue;
            }
            self.advance();
            match self.current_char() {
                Some(']') | None => {
                    // trailing '-' is literal
                    ranges.push(CodepointRange::single(low));
                    ranges.push(CodepointRange::single('-' as u32));
                }
                Some(_) => {
                    let (line, column, offset) =
                        (self.cursor.line(), self.cursor.column(), self.cursor.offset());
                    let high = match self.parse_class_item()? {
                        ClassItem::Char(cp) => cp,
                        ClassItem::Ranges(_) => {
                            return Err(ParseError::new(
                                "class shorthand cannot end a range",
                                line,
                                column,
                                offset,
                            ))
                        }
                    };
                    if high < low {
                        return Err(ParseError::new(
                            format!("invalid class range {low:#x}-{high:#x}"),
                            line,
                            column,
                            offset,
                        ));
                    }
                    ranges.push(CodepointRange::new(low, high));
                }
            }
        }
        Ok(Ast::set(ranges, negated))
    }

    fn parse_class_item(&mut self) -> Result<ClassItem, ParseError> {
        let Some(c) = self.current_char() else {
            return Err(self.cursor.expecting(&["]"]));
        };
        match c {
            '\\' => {
                let Some(e) = self.advance() else {
                    return Err(self.cursor.error("unterminated escape"));
                };
                if let Some((set, negated)) = shorthand_class(e) {
                    self.advance();
                    let set = range::normalized(set);
                    return Ok(ClassItem::Ranges(if negated {
                        range::complement(&set)
                    } else {
                        set
                    }));
                }
                if e == 'p' || e == 'P' {
                    self.advance();
                    let category = self.parse_category_name()?;
                    return Ok(ClassItem::Ranges(if e == 'P' {
                        range::complement(category.ranges())
                    } else {
                        category.ranges().to_vec()
                    }));
                }
                Ok(ClassItem::Char(self.parse_escaped_char(true)?))
            }
            '[' => {
                if self.advance() != Some(':') {
                    return Ok(ClassItem::Char('[' as u32));
                }
                self.parse_named_class().map(ClassItem::Ranges)
            }
            _ => {
                self.advance();
                Ok(ClassItem::Char(c as u32))
            }
        }
    }

    /// `[:name:]` with the cursor on the first `:`.
    fn parse_named_class(&mut self) -> Result<Vec<CodepointRange>, ParseError> {
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        self.advance();
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            self.advance();
        }
        self.expect(':')?;
        self.expect(']')?;
        NAMED_CLASSES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, table)| ranges_of(table))
            .ok_or_else(|| {
                ParseError::new(format!("unknown character class {name:?}"), line, column, offset)
                    .with_expected(NAMED_CLASSES.iter().map(|(n, _)| *n))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse, parse_with};
    use super::*;
    use crate::cursor::StrCursor;

    fn lit(c: char) -> Ast {
        Ast::Literal(c as u32)
    }

    fn r(low: char, high: char) -> CodepointRange {
        CodepointRange::new(low as u32, high as u32)
    }

    #[test]
    fn test_concat_and_alternation() {
        assert_eq!(
            parse("ab|c").unwrap(),
            Ast::Alt(vec![Ast::Concat(vec![lit('a'), lit('b')]), lit('c')])
        );
        assert_eq!(parse("a|").unwrap(), Ast::Alt(vec![lit('a'), Ast::empty()]));
        assert_eq!(parse("").unwrap(), Ast::empty());
    }

    #[test]
    fn test_groups_and_quantifiers() {
        assert_eq!(
            parse("(ab)*").unwrap(),
            Ast::Repeat {
                expr: Box::new(Ast::Concat(vec![lit('a'), lit('b')])),
                min: 0,
                max: None,
                lazy: false,
            }
        );
        let bounded = |src: &str| match parse(src).unwrap() {
            Ast::Repeat { min, max, .. } => (min, max),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(bounded("a{3}"), (3, Some(3)));
        assert_eq!(bounded("a{2,}"), (2, None));
        assert_eq!(bounded("a{,4}"), (0, Some(4)));
        assert_eq!(bounded("a{2,4}"), (2, Some(4)));
        assert_eq!(bounded("a+"), (1, None));
        assert_eq!(bounded("a?"), (0, Some(1)));
        assert!(parse("a{0}").unwrap().is_empty());
    }

    #[test]
    fn test_lazy_depends_on_options() {
        let lazy = parse("a*?").unwrap();
        assert!(matches!(lazy, Ast::Repeat { lazy: true, .. }));

        let mut cursor = StrCursor::new("a*?");
        let greedy = parse_with(&mut cursor, ParseOptions { allow_lazy: false }).unwrap();
        match greedy {
            Ast::Repeat { expr, min: 0, max: Some(1), lazy: false } => {
                assert!(matches!(*expr, Ast::Repeat { min: 0, max: None, lazy: false, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(
            parse("[a-cx]").unwrap(),
            Ast::set(vec![r('a', 'c'), r('x', 'x')], false)
        );
        assert_eq!(
            parse("[^-a]").unwrap(),
            Ast::set(vec![r('-', '-'), r('a', 'a')], true)
        );
        assert_eq!(
            parse("[]a]").unwrap(),
            Ast::set(vec![r(']', ']'), r('a', 'a')], false)
        );
        assert_eq!(
            parse("[a-]").unwrap(),
            Ast::set(vec![r('a', 'a'), r('-', '-')], false)
        );
        assert_eq!(
            parse("[[:digit:]_]").unwrap(),
            Ast::set(vec![r('0', '9'), r('_', '_')], false)
        );
        assert_eq!(
            parse(r"[\d\t]").unwrap(),
            Ast::set(vec![r('0', '9'), r('\t', '\t')], false)
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse(r"\-").unwrap(), lit('-'));
        assert_eq!(parse(r"\n").unwrap(), lit('\n'));
        assert_eq!(parse(r"\x41").unwrap(), lit('A'));
        assert_eq!(parse(r"é").unwrap(), lit('é'));
        assert_eq!(parse(r"\U0001F600").unwrap(), Ast::Literal(0x1F600));
        assert_eq!(parse(r"\d").unwrap(), Ast::set(vec![r('0', '9')], false));
        assert_eq!(
            parse(r"\P{Lu}").unwrap(),
            Ast::Category {
                category: UnicodeCategory::UppercaseLetter,
                negated: true
            }
        );
    }

    #[test]
    fn test_errors_carry_position() {
        let err = parse("ab(cd").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.expected, vec![")".to_string()]);

        let err = parse("[abc").unwrap_err();
        assert_eq!(err.expected, vec!["]".to_string()]);

        let err = parse("a)").unwrap_err();
        assert_eq!(err.column, 2);

        let err = parse("*a").unwrap_err();
        assert!(err.message.contains("nothing to repeat"));

        let err = parse("a{4,2}").unwrap_err();
        assert_eq!(err.offset, 1);

        let err = parse("[z-a]").unwrap_err();
        assert!(err.message.contains("invalid class range"));

        let err = parse(r"\p{Xx}").unwrap_err();
        assert!(err.expected.contains(&"Lu".to_string()));

        let err = parse("[[:bogus:]]").unwrap_err();
        assert!(err.expected.contains(&"alpha".to_string()));

        let err = parse(r"\x4").unwrap_err();
        assert_eq!(err.expected, vec!["hex digit".to_string()]);
    }

    #[test]
    fn test_multiline_positions() {
        let err = parse("ab\n(c").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
    }
}
