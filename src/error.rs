//! Error types for pattern parsing, automaton construction and program handling.

use thiserror::Error;

/// A malformed pattern or assembly source.
///
/// Carries the position of the offending input and, where the grammar makes
/// it deterministic, the set of inputs that would have been accepted there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{message} at line {line}, column {column}, offset {offset}{}",
    expecting_suffix(.expected)
)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub expected: Vec<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize, offset: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            offset,
            expected: Vec::new(),
        }
    }

    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }
}

fn expecting_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(" (expecting one of: {})", expected.join(", "))
    }
}

/// Internal-consistency failures while building or lowering automata.
///
/// These point at a misuse of the builder API or a bug in a pass, never at
/// ordinary input text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid repetition bounds {{{min},{max}}}: minimum exceeds maximum")]
    InvalidRepeat { min: usize, max: usize },
    #[error("transition on {low:#x}..={high:#x} overlaps an existing transition")]
    OverlappingTransition { low: u32, high: u32 },
    #[error("range {low:#x}..={high:#x} mixes cases and cannot be made case-insensitive")]
    MixedCaseRange { low: u32, high: u32 },
    #[error("cycle of neutral states")]
    NeutralCycle,
    #[error("accepting state q{state} has no accept symbol")]
    MissingAcceptSymbol { state: usize },
    #[error("accept symbol {symbol} is not in the symbol table")]
    UnknownSymbol { symbol: i32 },
    #[error("lazy quantifiers cannot be expressed as an automaton")]
    LazyNotSupported,
    #[error("rule id {symbol} is negative; negative ids are reserved")]
    NegativeSymbol { symbol: i32 },
}

/// Problems with a bytecode program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("instruction L{pc:04} jumps to L{target:04}, outside the program")]
    InvalidTarget { pc: usize, target: usize },
    #[error("duplicate label {name} at line {line}")]
    DuplicateLabel { name: String, line: usize },
    #[error("undefined label {name} referenced at line {line}")]
    UndefinedLabel { name: String, line: usize },
    #[error("program is empty")]
    EmptyProgram,
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("build error: {0}")]
    Build(#[from] BuildError),
    #[error("program error: {0}")]
    Program(#[from] ProgramError),
}

pub type Result<T> = std::result::Result<T, LexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unterminated group", 1, 5, 4).with_expected([")"]);
        assert_eq!(
            err.to_string(),
            "unterminated group at line 1, column 5, offset 4 (expecting one of: ))"
        );
        let err = ParseError::new("nothing to repeat", 2, 1, 7);
        assert_eq!(err.to_string(), "nothing to repeat at line 2, column 1, offset 7");
        let err: LexError = err.into();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_build_error_display() {
        let err = BuildError::InvalidRepeat { min: 4, max: 2 };
        assert_eq!(
            err.to_string(),
            "invalid repetition bounds {4,2}: minimum exceeds maximum"
        );
        let err: LexError = BuildError::NeutralCycle.into();
        assert_eq!(err.to_string(), "build error: cycle of neutral states");
    }
}
