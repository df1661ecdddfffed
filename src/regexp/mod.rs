//! Regexp parsing.
//!
//! Patterns parse into an [`Ast`], which lowers either to an automaton
//! ([`Ast::to_fa`], [`Fa::parse`]) or to bytecode. The grammar:
//!
//! ```text
//! expr      := term ('|' term)*
//! term      := factor*
//! factor    := atom modifier*
//! atom      := '.' | literal | '(' expr ')' | '[' class ']' | escape
//! modifier  := ('*' | '+' | '?' | '{' digits? (',' digits?)? '}') '?'?
//! ```
//!
//! The trailing `?` marks a lazy quantifier only when
//! [`ParseOptions::allow_lazy`] is set; otherwise it is another `?` modifier.

mod ast;
mod parser;

use tracing::debug;

use crate::automaton::Fa;
use crate::cursor::{Cursor, StrCursor};
use crate::error::{ParseError, Result};

pub use ast::{Ast, DOT_RANGES};
pub use parser::NAMED_CLASSES;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recognize `*?`, `+?`, `??` and `{..}?` as lazy quantifiers.
    pub allow_lazy: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { allow_lazy: true }
    }
}

/// Parse a whole pattern with default options.
pub fn parse(pattern: &str) -> std::result::Result<Ast, ParseError> {
    let mut cursor = StrCursor::new(pattern);
    parse_with(&mut cursor, ParseOptions::default())
}

/// Parse from `cursor` to end of input.
pub fn parse_with<C: Cursor>(
    cursor: &mut C,
    options: ParseOptions,
) -> std::result::Result<Ast, ParseError> {
    parser::Parser::new(cursor, options, false).parse()
}

/// Parse from `cursor` up to, not including, an unmatched `)`.
pub fn parse_embedded<C: Cursor>(
    cursor: &mut C,
    options: ParseOptions,
) -> std::result::Result<Ast, ParseError> {
    parser::Parser::new(cursor, options, true).parse()
}

impl Ast {
    pub fn parse(pattern: &str) -> std::result::Result<Ast, ParseError> {
        parse(pattern)
    }
}

impl Fa {
    /// Parse `pattern` straight to an automaton accepting with `accept`.
    ///
    /// Lazy quantifiers have no automaton form, so a `?` after a quantifier
    /// is read as an ordinary optional modifier.
    pub fn parse(pattern: &str, accept: Option<i32>) -> Result<Fa> {
        let mut cursor = StrCursor::new(pattern);
        let ast = parse_with(&mut cursor, ParseOptions { allow_lazy: false })?;
        let fa = ast.to_fa(accept)?;
        debug!(pattern, states = fa.state_count(), "parsed pattern to automaton");
        Ok(fa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;

    #[test]
    fn test_fa_parse_number() {
        let fa = Fa::parse(r"0|(\-?[1-9][0-9]*)", Some(0)).unwrap();
        for text in ["0", "123", "-243"] {
            assert!(fa.accepts(text), "{text}");
        }
        for text in ["00", "-", "012", ""] {
            assert!(!fa.accepts(text), "{text}");
        }
    }

    #[test]
    fn test_fa_parse_bounded() {
        let fa = Fa::parse("a{2,4}", Some(0)).unwrap();
        assert!(!fa.accepts("a"));
        assert!(fa.accepts("aa"));
        assert!(fa.accepts("aaa"));
        assert!(fa.accepts("aaaa"));
        assert!(!fa.accepts("aaaaa"));
    }

    #[test]
    fn test_fa_parse_classes_and_categories() {
        let fa = Fa::parse(r"[[:upper:]][[:lower:]\d]*\p{Sc}?", Some(3)).unwrap();
        assert!(fa.accepts("Ab1"));
        assert!(fa.accepts("Z$"));
        assert!(fa.accepts("Q€"));
        assert!(!fa.accepts("ab"));
        assert_eq!(fa.accept_symbols(), vec![3]);
    }

    #[test]
    fn test_fa_parse_lazy_is_optional() {
        let fa = Fa::parse("ab*?c", Some(0)).unwrap();
        assert!(fa.accepts("ac"));
        assert!(fa.accepts("abbbc"));
    }

    #[test]
    fn test_fa_parse_error() {
        match Fa::parse("(ab", None) {
            Err(LexError::Parse(err)) => assert_eq!(err.offset, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_embedded_stops_at_paren() {
        let mut cursor = StrCursor::new("a(b)c) ; rest");
        let ast = parse_embedded(&mut cursor, ParseOptions::default()).unwrap();
        assert_eq!(ast, Ast::literal("abc"));
        assert_eq!(cursor.current(), Some(')' as u32));
    }
}
