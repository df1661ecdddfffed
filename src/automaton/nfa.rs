//! Direct simulation of an automaton over input.
//!
//! - `Fa::fill_move`: one step of the subset simulation
//! - `Fa::lex`: run over a cursor until no state survives
//! - `Fa::accepts`: whole-string membership, mostly for tests

use crate::cursor::{Cursor, StrCursor};
use crate::range;

use super::arena::{Fa, StateId};

impl Fa {
    /// States reached from `states` on `cp`, epsilon-closed.
    ///
    /// `states` is expected to be epsilon-closed already.
    pub fn fill_move(&self, states: &[StateId], cp: u32) -> Vec<StateId> {
        let mut targets = Vec::new();
        for id in states {
            for t in &self.state(*id).transitions {
                if t.range.contains(cp) && !targets.contains(&t.to) {
                    targets.push(t.to);
                }
            }
        }
        self.epsilon_closure(&targets)
    }

    /// Lowest accept symbol among the accepting states in `states`, if any.
    pub fn accept_symbol_of(&self, states: &[StateId]) -> Option<i32> {
        states
            .iter()
            .map(|id| self.state(*id))
            .filter(|s| s.accepting)
            .filter_map(|s| s.accept_symbol)
            .min()
    }

    fn any_accepting(&self, states: &[StateId]) -> bool {
        states.iter().any(|id| self.state(*id).accepting)
    }

    /// Consume code points from `cursor`, capturing them, for as long as at
    /// least one state survives. Returns the accept symbol of the final set.
    pub fn lex<C: Cursor>(&self, cursor: &mut C) -> Option<i32> {
        let mut states = self.epsilon_closure(&[self.start()]);
        while let Some(cp) = cursor.current() {
            let next = self.fill_move(&states, cp);
            if next.is_empty() {
                break;
            }
            cursor.capture();
            cursor.advance();
            states = next;
        }
        self.accept_symbol_of(&states)
    }

    /// True if the automaton accepts all of `text`.
    pub fn accepts(&self, text: &str) -> bool {
        let mut cursor = StrCursor::new(text);
        let mut states = self.epsilon_closure(&[self.start()]);
        while let Some(cp) = cursor.current() {
            states = self.fill_move(&states, cp);
            if states.is_empty() {
                return false;
            }
            cursor.advance();
        }
        self.any_accepting(&states)
    }

    /// True if some state reachable from the start has a transition on `cp`.
    pub fn can_start_with(&self, cp: u32) -> bool {
        let states = self.epsilon_closure(&[self.start()]);
        states.iter().any(|id| {
            let mut ranges: Vec<_> = self.state(*id).transitions.iter().map(|t| t.range).collect();
            range::normalize(&mut ranges);
            range::contains(&ranges, cp)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::fa_builders::{make_lexer_fa, make_literal_fa, make_repeat_fa, make_set_fa};
    use crate::cursor::{Cursor, StrCursor};
    use crate::range::CodepointRange;

    #[test]
    fn test_lex_stops_at_first_dead_end() {
        let digit = make_set_fa(&[CodepointRange::new('0' as u32, '9' as u32)], None);
        let digits = make_repeat_fa(&digit, 1, None, Some(5)).unwrap();
        let mut cursor = StrCursor::new("123abc");
        assert_eq!(digits.lex(&mut cursor), Some(5));
        assert_eq!(cursor.capture_buffer(), "123");
        assert_eq!(cursor.current(), Some('a' as u32));
    }

    #[test]
    fn test_lex_lowest_symbol_wins() {
        let kw = make_literal_fa("if".chars().map(|c| c as u32), Some(0));
        let letter = make_set_fa(&[CodepointRange::new('a' as u32, 'z' as u32)], None);
        let ident = make_repeat_fa(&letter, 1, None, Some(1)).unwrap();
        let fa = make_lexer_fa([&kw, &ident]);

        let mut cursor = StrCursor::new("if");
        assert_eq!(fa.lex(&mut cursor), Some(0));
        let mut cursor = StrCursor::new("iffy");
        assert_eq!(fa.lex(&mut cursor), Some(1));
    }

    #[test]
    fn test_can_start_with() {
        let fa = make_literal_fa("xy".chars().map(|c| c as u32), None);
        assert!(fa.can_start_with('x' as u32));
        assert!(!fa.can_start_with('y' as u32));
    }
}
