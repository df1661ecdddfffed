//! Thompson-style automaton construction.
//!
//! Each builder takes its operands by reference and returns a fresh [`Fa`];
//! operands are copied with [`Fa::absorb`] before being rewired, so the same
//! sub-automaton can feed several builders.
//!
//! - `make_literal_fa`: a fixed code point sequence
//! - `make_set_fa`: one code point from a range list
//! - `make_concat_fa`: operands in sequence
//! - `make_or_fa`: any one operand
//! - `make_repeat_fa`: bounded and unbounded repetition
//! - `make_optional_fa`: zero or one
//! - `make_case_insensitive_fa`: widen letter ranges to both cases
//! - `make_lexer_fa`: a multi-rule start state

use smallvec::SmallVec;

use crate::error::BuildError;
use crate::range::{self, CodepointRange};

use super::arena::{Fa, Transition};

/// Match exactly the code points of `codepoints`, in order.
///
/// An empty sequence yields an automaton accepting only the empty string.
pub fn make_literal_fa<I>(codepoints: I, accept: Option<i32>) -> Fa
where
    I: IntoIterator<Item = u32>,
{
    let mut fa = Fa::new();
    let mut current = fa.start();
    for cp in codepoints {
        let next = fa.add_state(false, None);
        fa.state_mut(current).transitions.push(Transition {
            range: CodepointRange::single(cp),
            to: next,
        });
        current = next;
    }
    let last = fa.state_mut(current);
    last.accepting = true;
    last.accept_symbol = accept;
    fa
}

/// Match one code point in any of `ranges`. The ranges need not be normalized.
pub fn make_set_fa(ranges: &[CodepointRange], accept: Option<i32>) -> Fa {
    let mut fa = Fa::new();
    let last = fa.add_state(true, accept);
    let start = fa.start();
    for range in range::normalized(ranges.iter().copied()) {
        fa.state_mut(start).transitions.push(Transition { range, to: last });
    }
    fa
}

/// Match each operand in turn.
///
/// The accepting states of every operand but the last are demoted and joined
/// to the next operand's start by an epsilon. The accept symbol ends up only
/// on the last operand's accepting states.
pub fn make_concat_fa<'a, I>(exprs: I, accept: Option<i32>) -> Fa
where
    I: IntoIterator<Item = &'a Fa>,
{
    let mut fa: Option<Fa> = None;
    for expr in exprs {
        match fa.as_mut() {
            None => fa = Some(expr.clone_subgraph(expr.start()).0),
            Some(result) => {
                let tails = result.accepting_states();
                let next = result.absorb(expr);
                for tail in tails {
                    let state = result.state_mut(tail);
                    state.accepting = false;
                    state.accept_symbol = None;
                    state.add_epsilon(next);
                }
            }
        }
    }
    let mut fa = fa.unwrap_or_else(|| Fa::empty(accept));
    fa.set_accept_symbol(accept);
    fa
}

/// Match any one of the operands.
///
/// A new start state fans out to each operand by epsilon; every operand's
/// accepting states funnel into one shared accepting state.
pub fn make_or_fa<'a, I>(exprs: I, accept: Option<i32>) -> Fa
where
    I: IntoIterator<Item = &'a Fa>,
{
    let mut fa = Fa::new();
    let start = fa.start();
    let mut tails = Vec::new();
    for expr in exprs {
        let tail_start = fa.arena.len();
        let entry = fa.absorb(expr);
        fa.add_epsilon(start, entry);
        tails.extend(
            fa.closure_from(entry)
                .into_iter()
                .filter(|id| id.index() >= tail_start && fa.state(*id).accepting),
        );
    }
    let last = fa.add_state(true, accept);
    for tail in tails {
        let state = fa.state_mut(tail);
        state.accepting = false;
        state.accept_symbol = None;
        state.add_epsilon(last);
    }
    if fa.state(start).epsilons.is_empty() {
        // no operands: accept the empty string
        fa.add_epsilon(start, last);
    }
    fa
}

/// Zero or one occurrence of `expr`.
pub fn make_optional_fa(expr: &Fa, accept: Option<i32>) -> Fa {
    let mut fa = Fa::new();
    let start = fa.start();
    let entry = fa.absorb(expr);
    fa.add_epsilon(start, entry);
    let last = fa.funnel_accepting(accept);
    fa.add_epsilon(start, last);
    fa
}

/// Between `min` and `max` occurrences of `expr`; `max` of `None` is unbounded.
///
/// `(0, Some(0))` is treated like `(0, None)`: an unbounded Kleene star.
pub fn make_repeat_fa(
    expr: &Fa,
    min: usize,
    max: Option<usize>,
    accept: Option<i32>,
) -> Result<Fa, BuildError> {
    if let Some(max) = max {
        if min > max {
            return Err(BuildError::InvalidRepeat { min, max });
        }
    }
    let fa = match (min, max) {
        (0, None) | (0, Some(0)) => make_star_fa(expr, accept),
        (0, Some(1)) => make_optional_fa(expr, accept),
        (0, Some(max)) => {
            let opt = make_optional_fa(expr, None);
            make_concat_fa(std::iter::repeat(&opt).take(max), accept)
        }
        (1, None) => make_plus_fa(expr, accept),
        (1, Some(1)) => {
            let mut fa = expr.clone_subgraph(expr.start()).0;
            fa.set_accept_symbol(accept);
            fa
        }
        (min, None) => {
            let star = make_star_fa(expr, None);
            let parts = std::iter::repeat(expr).take(min).chain(std::iter::once(&star));
            make_concat_fa(parts, accept)
        }
        (min, Some(max)) => {
            let opt = make_optional_fa(expr, None);
            let parts = std::iter::repeat(expr)
                .take(min)
                .chain(std::iter::repeat(&opt).take(max - min));
            make_concat_fa(parts, accept)
        }
    };
    Ok(fa)
}

fn make_star_fa(expr: &Fa, accept: Option<i32>) -> Fa {
    let mut fa = Fa::new();
    let start = fa.start();
    let entry = fa.absorb(expr);
    fa.add_epsilon(start, entry);
    let last = fa.funnel_accepting(accept);
    fa.add_epsilon(start, last);
    fa.add_epsilon(last, start);
    fa
}

fn make_plus_fa(expr: &Fa, accept: Option<i32>) -> Fa {
    let mut fa = Fa::new();
    let start = fa.start();
    let entry = fa.absorb(expr);
    fa.add_epsilon(start, entry);
    let last = fa.funnel_accepting(accept);
    fa.add_epsilon(last, start);
    fa
}

/// Widen every single-case letter range so it also matches the other case.
///
/// A range whose endpoints are both lowercase gains the uppercase range, and
/// vice versa. A range that starts in one case and ends in the other cannot
/// be mapped and is refused. If `accept` is given it replaces the accept
/// symbol of every accepting state.
pub fn make_case_insensitive_fa(expr: &Fa, accept: Option<i32>) -> Result<Fa, BuildError> {
    let mut fa = expr.clone_subgraph(expr.start()).0;
    for id in fa.closure() {
        let original = fa.state(id).transitions.clone();
        for t in &original {
            let Some(other) = other_case_range(t.range)? else {
                continue;
            };
            // only the part not already covered by this state
            let mut pieces: SmallVec<[CodepointRange; 2]> = SmallVec::new();
            pieces.push(other);
            for existing in &fa.state(id).transitions {
                pieces = pieces
                    .into_iter()
                    .flat_map(|p| range::subtract(p, existing.range))
                    .collect();
            }
            for range in pieces {
                fa.state_mut(id).transitions.push(Transition { range, to: t.to });
            }
        }
    }
    if accept.is_some() {
        fa.set_accept_symbol(accept);
    }
    Ok(fa)
}

fn other_case_range(range: CodepointRange) -> Result<Option<CodepointRange>, BuildError> {
    let (Some(low), Some(high)) = (char::from_u32(range.low), char::from_u32(range.high)) else {
        return Ok(None);
    };
    let mapped = if low.is_lowercase() {
        if !high.is_lowercase() {
            return Err(BuildError::MixedCaseRange {
                low: range.low,
                high: range.high,
            });
        }
        (simple_upper(low), simple_upper(high))
    } else if low.is_uppercase() {
        if !high.is_uppercase() {
            return Err(BuildError::MixedCaseRange {
                low: range.low,
                high: range.high,
            });
        }
        (simple_lower(low), simple_lower(high))
    } else {
        return Ok(None);
    };
    match mapped {
        (Some(low), Some(high)) if low <= high && (low != range.low || high != range.high) => {
            Ok(Some(CodepointRange::new(low, high)))
        }
        _ => Ok(None),
    }
}

fn simple_upper(c: char) -> Option<u32> {
    let mut it = c.to_uppercase();
    match (it.next(), it.next()) {
        (Some(u), None) => Some(u as u32),
        _ => None,
    }
}

fn simple_lower(c: char) -> Option<u32> {
    let mut it = c.to_lowercase();
    match (it.next(), it.next()) {
        (Some(l), None) => Some(l as u32),
        _ => None,
    }
}

/// Combine per-rule automata under one start state.
///
/// Each operand keeps its own accepting states and accept symbols.
pub fn make_lexer_fa<'a, I>(exprs: I) -> Fa
where
    I: IntoIterator<Item = &'a Fa>,
{
    let mut fa = Fa::new();
    let start = fa.start();
    for expr in exprs {
        let entry = fa.absorb(expr);
        fa.add_epsilon(start, entry);
    }
    fa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> impl Iterator<Item = u32> + '_ {
        s.chars().map(|c| c as u32)
    }

    #[test]
    fn test_literal() {
        let fa = make_literal_fa(cps("abc"), Some(0));
        assert!(fa.accepts("abc"));
        assert!(!fa.accepts("ab"));
        assert!(!fa.accepts("abcd"));
        assert_eq!(fa.state_count(), 4);
        assert_eq!(fa.accept_symbols(), vec![0]);
    }

    #[test]
    fn test_empty_literal_accepts_empty() {
        let fa = make_literal_fa(std::iter::empty(), Some(2));
        assert!(fa.accepts(""));
        assert!(!fa.accepts("a"));
    }

    #[test]
    fn test_set_normalizes() {
        let fa = make_set_fa(
            &[
                CodepointRange::new('a' as u32, 'f' as u32),
                CodepointRange::new('c' as u32, 'z' as u32),
            ],
            None,
        );
        assert_eq!(fa.state(fa.start()).transitions.len(), 1);
        assert!(fa.accepts("q"));
        assert!(!fa.accepts("Q"));
    }

    #[test]
    fn test_concat_moves_accept_symbol_to_tail() {
        let a = make_literal_fa(cps("a"), Some(7));
        let b = make_literal_fa(cps("b"), Some(8));
        let fa = make_concat_fa([&a, &b], Some(1));
        assert!(fa.accepts("ab"));
        assert!(!fa.accepts("a"));
        assert_eq!(fa.accept_symbols(), vec![1]);
        // operands are untouched
        assert!(a.accepts("a"));
    }

    #[test]
    fn test_or() {
        let a = make_literal_fa(cps("foo"), None);
        let b = make_literal_fa(cps("ba"), None);
        let fa = make_or_fa([&a, &b], Some(3));
        assert!(fa.accepts("foo"));
        assert!(fa.accepts("ba"));
        assert!(!fa.accepts("fooba"));
        assert_eq!(fa.accepting_states().len(), 1);
        assert_eq!(fa.accept_symbols(), vec![3]);
    }

    #[test]
    fn test_or_same_operand_twice() {
        let a = make_literal_fa(cps("x"), None);
        let fa = make_or_fa([&a, &a], None);
        assert!(fa.accepts("x"));
        assert!(!fa.accepts("xx"));
    }

    #[test]
    fn test_repeat_shapes() {
        let a = make_literal_fa(cps("a"), None);
        let star = make_repeat_fa(&a, 0, None, Some(0)).unwrap();
        assert!(star.accepts(""));
        assert!(star.accepts("aaaa"));

        let zero_zero = make_repeat_fa(&a, 0, Some(0), Some(0)).unwrap();
        assert!(zero_zero.accepts("aaa"));

        let plus = make_repeat_fa(&a, 1, None, Some(0)).unwrap();
        assert!(!plus.accepts(""));
        assert!(plus.accepts("aaa"));

        let upto = make_repeat_fa(&a, 0, Some(3), Some(0)).unwrap();
        assert!(upto.accepts(""));
        assert!(upto.accepts("aaa"));
        assert!(!upto.accepts("aaaa"));

        let one_to_three = make_repeat_fa(&a, 1, Some(3), Some(0)).unwrap();
        assert!(!one_to_three.accepts(""));
        assert!(one_to_three.accepts("aa"));
        assert!(!one_to_three.accepts("aaaa"));

        let at_least_two = make_repeat_fa(&a, 2, None, Some(0)).unwrap();
        assert!(!at_least_two.accepts("a"));
        assert!(at_least_two.accepts("aaaaa"));

        let two_to_four = make_repeat_fa(&a, 2, Some(4), Some(0)).unwrap();
        assert!(!two_to_four.accepts("a"));
        assert!(two_to_four.accepts("aa"));
        assert!(two_to_four.accepts("aaaa"));
        assert!(!two_to_four.accepts("aaaaa"));

        let exactly_three = make_repeat_fa(&a, 3, Some(3), Some(0)).unwrap();
        assert!(exactly_three.accepts("aaa"));
        assert!(!exactly_three.accepts("aa"));
    }

    #[test]
    fn test_loops_reach_the_operand() {
        let ab = make_literal_fa(cps("ab"), None);
        let star = make_repeat_fa(&ab, 0, None, Some(3)).unwrap();
        assert!(star.accepts("ababab"));
        assert!(!star.accepts("aba"));
        let plus = make_repeat_fa(&ab, 1, None, Some(3)).unwrap();
        assert!(plus.accepts("abab"));
        let optional = make_optional_fa(&ab, Some(3));
        for fa in [&star, &plus, &optional] {
            assert_eq!(fa.accepting_states().len(), 1);
            for id in fa.accepting_states() {
                assert_eq!(fa.state(id).accept_symbol, Some(3));
            }
        }
    }

    #[test]
    fn test_repeat_rejects_inverted_bounds() {
        let a = make_literal_fa(cps("a"), None);
        assert_eq!(
            make_repeat_fa(&a, 5, Some(2), None).unwrap_err(),
            BuildError::InvalidRepeat { min: 5, max: 2 }
        );
    }

    #[test]
    fn test_optional() {
        let ab = make_literal_fa(cps("ab"), None);
        let fa = make_optional_fa(&ab, Some(4));
        assert!(fa.accepts(""));
        assert!(fa.accepts("ab"));
        assert!(!fa.accepts("a"));
        assert_eq!(fa.accept_symbols(), vec![4]);
    }

    #[test]
    fn test_case_insensitive() {
        let word = make_literal_fa(cps("Base"), Some(0));
        let fa = make_case_insensitive_fa(&word, None).unwrap();
        assert!(fa.accepts("base"));
        assert!(fa.accepts("BASE"));
        assert!(fa.accepts("bAsE"));
        assert!(!fa.accepts("bas"));
        assert_eq!(fa.accept_symbols(), vec![0]);

        let letters = make_set_fa(
            &[
                CodepointRange::new('a' as u32, 'z' as u32),
                CodepointRange::new('0' as u32, '9' as u32),
            ],
            None,
        );
        let fa = make_case_insensitive_fa(&letters, Some(1)).unwrap();
        assert!(fa.accepts("Q"));
        assert!(fa.accepts("7"));
    }

    #[test]
    fn test_case_insensitive_skips_covered_ranges() {
        let both = make_set_fa(
            &[
                CodepointRange::new('a' as u32, 'z' as u32),
                CodepointRange::new('A' as u32, 'Z' as u32),
            ],
            None,
        );
        let fa = make_case_insensitive_fa(&both, None).unwrap();
        assert_eq!(fa.state(fa.start()).transitions.len(), 2);
    }

    #[test]
    fn test_case_insensitive_mixed_range() {
        let mixed = make_set_fa(&[CodepointRange::new('a' as u32, 0x100)], None);
        assert!(matches!(
            make_case_insensitive_fa(&mixed, None),
            Err(BuildError::MixedCaseRange { .. })
        ));
    }

    #[test]
    fn test_lexer_keeps_symbols() {
        let kw = make_literal_fa(cps("if"), Some(0));
        let id = make_set_fa(&[CodepointRange::new('a' as u32, 'z' as u32)], Some(1));
        let fa = make_lexer_fa([&kw, &id]);
        assert_eq!(fa.accept_symbols(), vec![0, 1]);
        assert!(fa.accepts("if"));
        assert!(fa.accepts("x"));
    }
}
