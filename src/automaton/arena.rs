//! Arena-based state storage for cyclic automata.
//!
//! States live in a flat `Vec` and refer to each other through [`StateId`]
//! indices, so back-edges created by repetition are plain integers rather
//! than owning references.
//!
//! ```text
//!   a*  as an arena:
//!
//!   q0 --ε--> q1 --[a]--> q2 --ε--> q3 (accept)
//!    \         ^__________ε_________/|
//!     \____________ε________________/
//! ```
//!
//! Every composing operation copies its operands into a fresh arena with
//! [`Fa::absorb`] before rewiring, so a sub-automaton can be reused any number
//! of times without aliasing.

use std::fmt;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::error::BuildError;
use crate::range::{self, CodepointRange};

/// A state identifier: an index into the owning arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn from_index(index: usize) -> Self {
        StateId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// An input transition: consume any code point in `range` and move to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub range: CodepointRange,
    pub to: StateId,
}

/// A state in the automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaState {
    pub accepting: bool,
    /// Rule id reported when this state accepts. Only meaningful if `accepting`.
    pub accept_symbol: Option<i32>,
    /// Input transitions in insertion order. Ranges never overlap each other.
    pub transitions: Vec<Transition>,
    /// Epsilon transitions in insertion order, without repeats.
    pub epsilons: SmallVec<[StateId; 2]>,
}

impl FaState {
    pub fn new(accepting: bool, accept_symbol: Option<i32>) -> Self {
        Self {
            accepting,
            accept_symbol,
            ..Self::default()
        }
    }

    /// No outgoing transitions of any kind.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.transitions.is_empty() && self.epsilons.is_empty()
    }

    /// Non-accepting, no input transitions, exactly one epsilon transition.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        !self.accepting && self.transitions.is_empty() && self.epsilons.len() == 1
    }

    /// Add an epsilon edge unless it is already present.
    #[inline]
    pub fn add_epsilon(&mut self, to: StateId) {
        if !self.epsilons.contains(&to) {
            self.epsilons.push(to);
        }
    }
}

/// Owns every state of one automaton.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StateArena {
    states: Vec<FaState>,
}

impl fmt::Debug for StateArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateArena")
            .field("states_count", &self.states.len())
            .finish()
    }
}

impl StateArena {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a new state, returning its id.
    pub fn alloc(&mut self, state: FaState) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(state);
        id
    }

    #[inline]
    pub fn get(&self, id: StateId) -> &FaState {
        &self.states[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: StateId) -> &mut FaState {
        &mut self.states[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Index<StateId> for StateArena {
    type Output = FaState;

    #[inline]
    fn index(&self, id: StateId) -> &FaState {
        self.get(id)
    }
}

impl IndexMut<StateId> for StateArena {
    #[inline]
    fn index_mut(&mut self, id: StateId) -> &mut FaState {
        self.get_mut(id)
    }
}

/// A finite automaton: an arena plus a designated start state.
///
/// Only states reachable from `start` are part of the automaton; passes that
/// rewire edges may leave unreachable states behind until the next
/// [`Fa::compact`].
#[derive(Clone, PartialEq, Eq)]
pub struct Fa {
    pub(crate) arena: StateArena,
    pub(crate) start: StateId,
}

impl Default for Fa {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        for id in self.closure() {
            let state = &self.arena[id];
            let accept = if state.accepting {
                format!(" accept={:?}", state.accept_symbol)
            } else {
                String::new()
            };
            let transitions: Vec<_> = state
                .transitions
                .iter()
                .map(|t| format!("{:?}->{:?}", t.range, t.to))
                .collect();
            dbg.entry(
                &id,
                &format_args!("{{{}{:?} ε{:?}}}", accept, transitions, state.epsilons),
            );
        }
        dbg.finish()
    }
}

impl Fa {
    /// An automaton with a single non-accepting start state.
    pub fn new() -> Self {
        let mut arena = StateArena::new();
        let start = arena.alloc(FaState::default());
        Self { arena, start }
    }

    /// An automaton accepting only the empty string.
    pub fn empty(accept: Option<i32>) -> Self {
        let mut arena = StateArena::new();
        let start = arena.alloc(FaState::new(true, accept));
        Self { arena, start }
    }

    pub fn from_parts(arena: StateArena, start: StateId) -> Self {
        Self { arena, start }
    }

    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn arena(&self) -> &StateArena {
        &self.arena
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &FaState {
        &self.arena[id]
    }

    #[inline]
    pub fn state_mut(&mut self, id: StateId) -> &mut FaState {
        &mut self.arena[id]
    }

    pub fn add_state(&mut self, accepting: bool, accept_symbol: Option<i32>) -> StateId {
        self.arena.alloc(FaState::new(accepting, accept_symbol))
    }

    /// Add an input transition, refusing ranges that overlap an existing one.
    pub fn add_transition(
        &mut self,
        from: StateId,
        range: CodepointRange,
        to: StateId,
    ) -> Result<(), BuildError> {
        let state = &mut self.arena[from];
        if state.transitions.iter().any(|t| t.range.intersects(&range)) {
            return Err(BuildError::OverlappingTransition {
                low: range.low,
                high: range.high,
            });
        }
        state.transitions.push(Transition { range, to });
        Ok(())
    }

    #[inline]
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.arena[from].add_epsilon(to);
    }

    /// Every state reachable from the start, in depth-first discovery order
    /// (input transitions before epsilons). The start state is always first.
    pub fn closure(&self) -> Vec<StateId> {
        self.closure_from(self.start)
    }

    /// Every state reachable from `root` via input or epsilon transitions.
    pub fn closure_from(&self, root: StateId) -> Vec<StateId> {
        let mut seen = vec![false; self.arena.len()];
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            result.push(id);
            let state = &self.arena[id];
            for eps in state.epsilons.iter().rev() {
                if !seen[eps.index()] {
                    stack.push(*eps);
                }
            }
            for t in state.transitions.iter().rev() {
                if !seen[t.to.index()] {
                    stack.push(t.to);
                }
            }
        }
        result
    }

    /// States reachable from any of `states` through zero or more epsilons.
    pub fn epsilon_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut seen = vec![false; self.arena.len()];
        let mut result = Vec::with_capacity(states.len());
        let mut stack: Vec<StateId> = states.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            result.push(id);
            for eps in self.arena[id].epsilons.iter().rev() {
                if !seen[eps.index()] {
                    stack.push(*eps);
                }
            }
        }
        result
    }

    /// Accepting states reachable from the start, in closure order.
    pub fn accepting_states(&self) -> Vec<StateId> {
        self.closure()
            .into_iter()
            .filter(|id| self.arena[*id].accepting)
            .collect()
    }

    pub fn first_accepting_state(&self) -> Option<StateId> {
        self.closure()
            .into_iter()
            .find(|id| self.arena[*id].accepting)
    }

    /// True if no reachable state has an epsilon transition.
    ///
    /// Transition ranges never overlap on one state, so this is enough for
    /// the machine to be deterministic.
    pub fn is_dfa(&self) -> bool {
        self.closure()
            .into_iter()
            .all(|id| self.arena[id].epsilons.is_empty())
    }

    /// Number of reachable states.
    pub fn state_count(&self) -> usize {
        self.closure().len()
    }

    /// Distinct accept symbols of the reachable accepting states, in first-seen order.
    pub fn accept_symbols(&self) -> Vec<i32> {
        let mut result = Vec::new();
        for id in self.closure() {
            let state = &self.arena[id];
            if let (true, Some(symbol)) = (state.accepting, state.accept_symbol) {
                if !result.contains(&symbol) {
                    result.push(symbol);
                }
            }
        }
        result
    }

    /// Copy the subgraph reachable from `root` into a new automaton rooted there.
    ///
    /// Returns the copy and a map from old state index to new id (`None` for
    /// states that were not reachable).
    pub fn clone_subgraph(&self, root: StateId) -> (Fa, Vec<Option<StateId>>) {
        let closure = self.closure_from(root);
        let mut arena = StateArena::with_capacity(closure.len());
        let remap = copy_states(&self.arena, &closure, &mut arena);
        let start = remap[root.index()].unwrap_or(StateId(0));
        (Fa { arena, start }, remap)
    }

    /// Copy all of `other`'s reachable states into this arena and return the
    /// id its start state received here.
    pub fn absorb(&mut self, other: &Fa) -> StateId {
        let closure = other.closure();
        let remap = copy_states(&other.arena, &closure, &mut self.arena);
        remap[other.start.index()].unwrap_or(self.start)
    }

    /// Rebuild the arena with only reachable states, renumbered in closure order.
    pub fn compact(&mut self) {
        let (compacted, _) = self.clone_subgraph(self.start);
        *self = compacted;
    }

    /// Outgoing transitions of `id` grouped by destination, each group's
    /// ranges normalized. Groups are ordered by first appearance.
    pub fn transitions_by_destination(&self, id: StateId) -> Vec<(StateId, Vec<CodepointRange>)> {
        let mut groups: Vec<(StateId, Vec<CodepointRange>)> = Vec::new();
        for t in &self.arena[id].transitions {
            match groups.iter_mut().find(|(to, _)| *to == t.to) {
                Some((_, ranges)) => ranges.push(t.range),
                None => groups.push((t.to, vec![t.range])),
            }
        }
        for (_, ranges) in groups.iter_mut() {
            range::normalize(ranges);
        }
        groups
    }

    /// Clear the accepting flag on every accepting state reachable from the
    /// start and point each at a single new accepting state carrying
    /// `accept`. Returns the new state.
    pub(crate) fn funnel_accepting(&mut self, accept: Option<i32>) -> StateId {
        let accepting = self.accepting_states();
        let last = self.add_state(true, accept);
        for id in accepting {
            let state = &mut self.arena[id];
            state.accepting = false;
            state.accept_symbol = None;
            state.add_epsilon(last);
        }
        last
    }

    /// Set the accept symbol of every reachable accepting state.
    pub(crate) fn set_accept_symbol(&mut self, accept: Option<i32>) {
        for id in self.accepting_states() {
            self.arena[id].accept_symbol = accept;
        }
    }

    /// Rewrite the accept symbol of every reachable accepting state.
    pub(crate) fn map_accept_symbols(&mut self, mut map: impl FnMut(i32) -> i32) {
        for id in self.accepting_states() {
            let state = &mut self.arena[id];
            state.accept_symbol = state.accept_symbol.map(&mut map);
        }
    }
}

fn copy_states(source: &StateArena, closure: &[StateId], target: &mut StateArena) -> Vec<Option<StateId>> {
    let mut remap: Vec<Option<StateId>> = vec![None; source.len()];
    for id in closure {
        let state = &source[*id];
        remap[id.index()] = Some(target.alloc(FaState::new(state.accepting, state.accept_symbol)));
    }
    for id in closure {
        let state = &source[*id];
        let Some(new_id) = remap[id.index()] else {
            continue;
        };
        let transitions = state
            .transitions
            .iter()
            .filter_map(|t| {
                remap[t.to.index()].map(|to| Transition {
                    range: t.range,
                    to,
                })
            })
            .collect();
        let epsilons = state
            .epsilons
            .iter()
            .filter_map(|e| remap[e.index()])
            .collect();
        let copy = &mut target[new_id];
        copy.transitions = transitions;
        copy.epsilons = epsilons;
    }
    remap
}
