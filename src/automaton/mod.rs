//! Finite automata over Unicode code points.
//!
//! The key components are:
//!
//! - `Fa`: an arena-backed automaton with range and epsilon transitions
//! - builders that compose automata Thompson-style
//! - subset construction and state reduction
//! - flat integer tables for serialization and table-driven lexing
//!
//! # Module Organization
//!
//! - `arena`: state storage, graph queries, subgraph copying
//! - `fa_builders`: construction functions (make_*_fa)
//! - `dfa`: determinization, duplicate and neutral state trimming
//! - `nfa`: direct simulation over input
//! - `table`: DFA/NFA table flattening and table-driven lexing

mod arena;
mod dfa;
mod fa_builders;
mod nfa;
mod table;

pub use arena::{Fa, FaState, StateArena, StateId, Transition};

pub use fa_builders::{
    make_case_insensitive_fa, make_concat_fa, make_lexer_fa, make_literal_fa, make_optional_fa,
    make_or_fa, make_repeat_fa, make_set_fa,
};

pub use table::{dfa_move, lex_dfa_table, DfaEntry, DfaTransitionEntry, NfaEntry, NO_ACCEPT};

#[cfg(test)]
mod tests;
