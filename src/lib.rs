//! lexvm: regular expressions compiled to automata and bytecode for lexing.
//!
//! Patterns parse to an [`Ast`](regexp::Ast). From there a rule either
//! becomes a finite automaton ([`Fa`]), which can be determinized,
//! minimized and flattened to tables, or is lowered straight to bytecode for
//! the fiber [`Vm`]. A [`Lexer`] links many rules into one program and
//! [`Tokenizer`] walks input with it.
//!
//! ```
//! use lexvm::{Lexer, ERROR_SYMBOL};
//!
//! let lexer = Lexer::builder()
//!     .regex(0, r"0|(\-?[1-9][0-9]*)")
//!     .regex(1, r"\s+")
//!     .build()
//!     .unwrap();
//! let tokens: Vec<_> = lexer.tokenize("-12 0x").collect();
//! assert_eq!(tokens[0].value, "-12");
//! assert_eq!(tokens[2].value, "0");
//! assert_eq!(tokens[3].symbol_id, ERROR_SYMBOL);
//! ```

pub mod automaton;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod program;
pub mod progress;
pub mod range;
pub mod regexp;
pub mod tokenizer;
pub mod unicode_categories;
pub mod vm;

pub use automaton::Fa;
pub use cursor::{Cursor, StrCursor};
pub use error::{BuildError, LexError, ParseError, ProgramError, Result};
pub use lexer::{Lexer, LexerBuilder, LexerOptions};
pub use program::{assemble, Instruction, Program, ERROR_SYMBOL};
pub use progress::{FaProgress, FaStatus, ProgressObserver};
pub use range::CodepointRange;
pub use tokenizer::{Token, Tokenizer};
pub use unicode_categories::UnicodeCategory;
pub use vm::{Vm, VmMatch, VmStatistics};
