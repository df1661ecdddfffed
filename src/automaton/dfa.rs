//! Determinization and state reduction.
//!
//! - `Fa::to_dfa`: subset construction over disjoint code point intervals
//! - `Fa::trim_duplicates`: merge states with identical outgoing edges
//! - `Fa::trim_neutrals`: bypass states that only forward one epsilon

use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::BuildError;
use crate::progress::{report, FaProgress, FaStatus, ProgressObserver};
use crate::range::CodepointRange;

use super::arena::{Fa, FaState, StateArena, StateId, Transition};

/// Identity of a state for duplicate detection: acceptance plus outgoing
/// edges, with transition ranges grouped per destination.
#[derive(PartialEq, Eq, Hash)]
struct StateKey {
    accepting: bool,
    accept_symbol: Option<i32>,
    transitions: Vec<(StateId, Vec<CodepointRange>)>,
    epsilons: SmallVec<[StateId; 2]>,
}

impl StateKey {
    fn of(fa: &Fa, id: StateId) -> Self {
        let state = fa.state(id);
        let mut transitions = fa.transitions_by_destination(id);
        transitions.sort_unstable_by_key(|(to, _)| *to);
        let mut epsilons = state.epsilons.clone();
        epsilons.sort_unstable();
        Self {
            accepting: state.accepting,
            accept_symbol: if state.accepting { state.accept_symbol } else { None },
            transitions,
            epsilons,
        }
    }
}

impl Fa {
    /// Build an equivalent deterministic automaton.
    ///
    /// Each DFA state stands for an epsilon-closed set of NFA states. A DFA
    /// state accepts if any member accepts; when members carry different
    /// accept symbols the lowest one wins.
    pub fn to_dfa(&self, mut observer: Option<&mut dyn ProgressObserver>) -> Fa {
        let mut arena = StateArena::new();
        let mut index: FxHashMap<Vec<StateId>, StateId> = FxHashMap::default();
        let mut queue: VecDeque<(Vec<StateId>, StateId)> = VecDeque::new();

        let start_set = self.sorted_epsilon_closure(&[self.start()]);
        let start = arena.alloc(self.powerset_state(&start_set));
        index.insert(start_set.clone(), start);
        queue.push_back((start_set, start));
        report(&mut observer, FaProgress::new(FaStatus::DfaTransform, 1));

        let mut points: Vec<u32> = Vec::new();
        let mut targets: Vec<StateId> = Vec::new();
        while let Some((set, id)) = queue.pop_front() {
            points.clear();
            for member in &set {
                for t in &self.state(*member).transitions {
                    points.push(t.range.low);
                    points.push(t.range.high + 1);
                }
            }
            points.sort_unstable();
            points.dedup();

            let mut transitions: Vec<Transition> = Vec::new();
            for window in points.windows(2) {
                let (low, high) = (window[0], window[1] - 1);
                targets.clear();
                for member in &set {
                    for t in &self.state(*member).transitions {
                        if t.range.contains(low) && !targets.contains(&t.to) {
                            targets.push(t.to);
                        }
                    }
                }
                if targets.is_empty() {
                    continue;
                }
                let closed = self.sorted_epsilon_closure(&targets);
                let to = match index.entry(closed) {
                    Entry::Occupied(e) => *e.get(),
                    Entry::Vacant(e) => {
                        let to = arena.alloc(self.powerset_state(e.key()));
                        queue.push_back((e.key().clone(), to));
                        e.insert(to);
                        report(&mut observer, FaProgress::new(FaStatus::DfaTransform, arena.len()));
                        to
                    }
                };
                match transitions.last_mut() {
                    Some(last) if last.to == to && last.range.high + 1 == low => {
                        last.range.high = high;
                    }
                    _ => transitions.push(Transition {
                        range: CodepointRange::new(low, high),
                        to,
                    }),
                }
            }
            arena[id].transitions = transitions;
        }

        debug!(
            nfa_states = self.arena.len(),
            dfa_states = arena.len(),
            "determinized automaton"
        );
        Fa::from_parts(arena, start)
    }

    fn sorted_epsilon_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut closed = self.epsilon_closure(states);
        closed.sort_unstable();
        closed
    }

    fn powerset_state(&self, set: &[StateId]) -> FaState {
        let mut accepting = false;
        let mut symbol: Option<i32> = None;
        for member in set {
            let state = self.state(*member);
            if state.accepting {
                accepting = true;
                symbol = match (symbol, state.accept_symbol) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
        }
        FaState::new(accepting, symbol)
    }

    /// Merge states whose acceptance and outgoing edges are identical,
    /// repeating until a pass finds nothing to merge.
    ///
    /// The earliest state in closure order survives and every edge into a
    /// merged state is redirected to it. Unreachable states are dropped.
    pub fn trim_duplicates(&mut self, mut observer: Option<&mut dyn ProgressObserver>) {
        let mut pass = 0;
        loop {
            report(&mut observer, FaProgress::new(FaStatus::TrimDuplicates, pass));
            let closure = self.closure();
            let mut first_by_key: FxHashMap<StateKey, StateId> = FxHashMap::default();
            let mut replace: FxHashMap<StateId, StateId> = FxHashMap::default();
            for id in &closure {
                match first_by_key.entry(StateKey::of(self, *id)) {
                    Entry::Occupied(e) => {
                        replace.insert(*id, *e.get());
                    }
                    Entry::Vacant(e) => {
                        e.insert(*id);
                    }
                }
            }
            if replace.is_empty() {
                break;
            }
            debug!(pass, merged = replace.len(), "trimmed duplicate states");
            for id in &closure {
                let state = self.state_mut(*id);
                for t in state.transitions.iter_mut() {
                    if let Some(to) = replace.get(&t.to) {
                        t.to = *to;
                    }
                }
                let epsilons = std::mem::take(&mut state.epsilons);
                for e in epsilons {
                    state.add_epsilon(replace.get(&e).copied().unwrap_or(e));
                }
            }
            if let Some(start) = replace.get(&self.start) {
                self.start = *start;
            }
            pass += 1;
        }
        self.compact();
    }

    /// Redirect every edge that lands on a neutral state to wherever that
    /// state's chain of single epsilons ends, then drop the neutral states.
    ///
    /// A chain that loops back on itself has no end and is refused.
    pub fn trim_neutrals(&mut self) -> Result<(), BuildError> {
        let closure = self.closure();
        let mut forwarded: FxHashMap<StateId, StateId> = FxHashMap::default();
        for id in &closure {
            if self.state(*id).is_neutral() {
                forwarded.insert(*id, self.forward_neutral(*id)?);
            }
        }
        if forwarded.is_empty() {
            return Ok(());
        }
        let through = |id: StateId| forwarded.get(&id).copied().unwrap_or(id);
        for id in &closure {
            if forwarded.contains_key(id) {
                continue;
            }
            let state = &mut self.arena[*id];
            for t in state.transitions.iter_mut() {
                t.to = through(t.to);
            }
            let epsilons = std::mem::take(&mut state.epsilons);
            for e in epsilons {
                state.add_epsilon(through(e));
            }
        }
        self.start = through(self.start);
        debug!(removed = forwarded.len(), "trimmed neutral states");
        self.compact();
        Ok(())
    }

    fn forward_neutral(&self, id: StateId) -> Result<StateId, BuildError> {
        let mut current = id;
        let mut steps = 0;
        while self.state(current).is_neutral() {
            current = self.state(current).epsilons[0];
            steps += 1;
            if steps > self.arena.len() {
                return Err(BuildError::NeutralCycle);
            }
        }
        Ok(current)
    }
}
