//! Flat table form of an automaton.
//!
//! Rows are indexed by state number in closure order, so row 0 is always the
//! start state. Transition ranges are packed as `[low0, high0, low1, high1, ...]`.
//! Accept ids use `-1` for "not accepting" so the tables can be emitted as
//! plain integer arrays.

use crate::cursor::Cursor;
use crate::error::BuildError;
use crate::progress::{reborrow, ProgressObserver};
use crate::range;

use super::arena::{Fa, StateId};

/// Marks a non-accepting row.
pub const NO_ACCEPT: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaTransitionEntry {
    pub packed_ranges: Vec<u32>,
    pub destination: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaEntry {
    pub accept_symbol_id: i32,
    pub transitions: Vec<DfaTransitionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaEntry {
    pub accept_symbol_id: i32,
    pub transitions: Vec<DfaTransitionEntry>,
    pub epsilons: Vec<usize>,
}

impl Fa {
    /// Determinize if needed, then flatten.
    ///
    /// Accept ids are positions in `symbol_table`. Without one, symbols are
    /// numbered in the order the closure walk first meets them.
    pub fn to_dfa_table(
        &self,
        symbol_table: Option<&[i32]>,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<Vec<DfaEntry>, BuildError> {
        let dfa;
        let fa = if self.is_dfa() {
            self
        } else {
            let mut determinized = self.to_dfa(reborrow(&mut observer));
            determinized.trim_duplicates(observer);
            dfa = determinized;
            &dfa
        };
        let closure = fa.closure();
        let position = row_positions(fa, &closure);
        let symbols = symbol_order(fa, &closure, symbol_table)?;
        closure
            .iter()
            .map(|id| {
                Ok(DfaEntry {
                    accept_symbol_id: accept_id(fa, *id, &symbols)?,
                    transitions: packed_transitions(fa, *id, &position),
                })
            })
            .collect()
    }

    /// Flatten without determinizing, keeping epsilon edges. Accept ids are
    /// numbered as in [`Fa::to_dfa_table`].
    pub fn to_nfa_table(&self, symbol_table: Option<&[i32]>) -> Result<Vec<NfaEntry>, BuildError> {
        let closure = self.closure();
        let position = row_positions(self, &closure);
        let symbols = symbol_order(self, &closure, symbol_table)?;
        closure
            .iter()
            .map(|id| {
                Ok(NfaEntry {
                    accept_symbol_id: accept_id(self, *id, &symbols)?,
                    transitions: packed_transitions(self, *id, &position),
                    epsilons: self
                        .state(*id)
                        .epsilons
                        .iter()
                        .filter_map(|e| position[e.index()])
                        .collect(),
                })
            })
            .collect()
    }
}

fn row_positions(fa: &Fa, closure: &[StateId]) -> Vec<Option<usize>> {
    let mut position = vec![None; fa.arena().len()];
    for (row, id) in closure.iter().enumerate() {
        position[id.index()] = Some(row);
    }
    position
}

/// The caller's symbol table, or the accept symbols in first-seen order.
fn symbol_order(
    fa: &Fa,
    closure: &[StateId],
    symbol_table: Option<&[i32]>,
) -> Result<Vec<i32>, BuildError> {
    if let Some(table) = symbol_table {
        return Ok(table.to_vec());
    }
    let mut symbols = Vec::new();
    for id in closure {
        if let Some(symbol) = accept_symbol(fa, *id)? {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
    }
    Ok(symbols)
}

fn accept_symbol(fa: &Fa, id: StateId) -> Result<Option<i32>, BuildError> {
    let state = fa.state(id);
    if !state.accepting {
        return Ok(None);
    }
    state
        .accept_symbol
        .map(Some)
        .ok_or(BuildError::MissingAcceptSymbol { state: id.index() })
}

fn accept_id(fa: &Fa, id: StateId, symbols: &[i32]) -> Result<i32, BuildError> {
    let Some(symbol) = accept_symbol(fa, id)? else {
        return Ok(NO_ACCEPT);
    };
    symbols
        .iter()
        .position(|s| *s == symbol)
        .map(|p| p as i32)
        .ok_or(BuildError::UnknownSymbol { symbol })
}

fn packed_transitions(fa: &Fa, id: StateId, position: &[Option<usize>]) -> Vec<DfaTransitionEntry> {
    fa.transitions_by_destination(id)
        .into_iter()
        .filter_map(|(to, ranges)| {
            position[to.index()].map(|destination| DfaTransitionEntry {
                packed_ranges: range::from_pairs(&ranges),
                destination,
            })
        })
        .collect()
}

/// The row reached from `state` on `cp`, if any.
pub fn dfa_move(table: &[DfaEntry], state: usize, cp: u32) -> Option<usize> {
    table.get(state)?.transitions.iter().find_map(|t| {
        t.packed_ranges
            .chunks_exact(2)
            .any(|pair| pair[0] <= cp && cp <= pair[1])
            .then_some(t.destination)
    })
}

/// Run a DFA table over `cursor`, capturing what it consumes, until no
/// transition applies. Returns the accept id of the row it stopped on.
pub fn lex_dfa_table<C: Cursor>(table: &[DfaEntry], cursor: &mut C) -> Option<i32> {
    if table.is_empty() {
        return None;
    }
    let mut state = 0;
    while let Some(cp) = cursor.current() {
        let Some(next) = dfa_move(table, state, cp) else {
            break;
        };
        cursor.capture();
        cursor.advance();
        state = next;
    }
    let accept = table[state].accept_symbol_id;
    (accept != NO_ACCEPT).then_some(accept)
}
