//! Lowering to bytecode.
//!
//! Fragments produced here address their own instructions from zero; the
//! linker relocates them into place. A "body" ends by falling off its last
//! instruction, a "rule" ends with `save 1; match id`.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::automaton::{Fa, StateId};
use crate::error::BuildError;
use crate::regexp::Ast;

use super::instruction::{Instruction, SwitchCase};

/// Compile `ast` to a body fragment.
pub fn compile_ast(ast: &Ast) -> Result<Vec<Instruction>, BuildError> {
    let mut prog = Vec::new();
    emit(ast, &mut prog)?;
    Ok(prog)
}

/// Compile `ast` to a fragment that reports `symbol` when it matches.
pub fn compile_rule(ast: &Ast, symbol: i32) -> Result<Vec<Instruction>, BuildError> {
    let mut prog = compile_ast(ast)?;
    terminate(&mut prog, symbol);
    Ok(prog)
}

/// Body fragment matching `text` exactly.
pub fn compile_literal(text: &str) -> Vec<Instruction> {
    text.chars().map(|c| Instruction::Char(c as u32)).collect()
}

/// Append `save 1; match symbol`.
pub fn terminate(prog: &mut Vec<Instruction>, symbol: i32) {
    prog.push(Instruction::Save(1));
    prog.push(Instruction::Match(symbol));
}

/// Shift every branch target in `prog` by `offset`.
pub fn relocate(prog: &mut [Instruction], offset: usize) {
    for inst in prog.iter_mut() {
        inst.relocate(offset);
    }
}

fn emit(ast: &Ast, prog: &mut Vec<Instruction>) -> Result<(), BuildError> {
    match ast {
        Ast::Literal(cp) => prog.push(Instruction::Char(*cp)),
        Ast::Dot => prog.push(Instruction::Any),
        Ast::Set { ranges, negated } => prog.push(if *negated {
            Instruction::NSet(ranges.clone())
        } else {
            Instruction::Set(ranges.clone())
        }),
        Ast::Category { category, negated } => prog.push(if *negated {
            Instruction::NUCode(*category)
        } else {
            Instruction::UCode(*category)
        }),
        Ast::Concat(items) => {
            for item in items {
                emit(item, prog)?;
            }
        }
        Ast::Alt(branches) => emit_alternation(branches, prog)?,
        Ast::Repeat {
            expr,
            min,
            max,
            lazy,
        } => emit_repeat(expr, *min, *max, *lazy, prog)?,
    }
    Ok(())
}

fn emit_alternation(branches: &[Ast], prog: &mut Vec<Instruction>) -> Result<(), BuildError> {
    // only the first empty alternative matters
    let mut kept: Vec<&Ast> = Vec::with_capacity(branches.len());
    let mut seen_empty = false;
    for branch in branches {
        if branch.is_empty() {
            if seen_empty {
                continue;
            }
            seen_empty = true;
        }
        kept.push(branch);
    }

    let fork = prog.len();
    prog.push(Instruction::Jmp(Vec::new()));
    let mut entries: Vec<Option<usize>> = Vec::with_capacity(kept.len());
    let mut joins = Vec::new();
    for (i, branch) in kept.iter().enumerate() {
        if branch.is_empty() {
            entries.push(None);
            continue;
        }
        entries.push(Some(prog.len()));
        emit(branch, prog)?;
        if kept[i + 1..].iter().any(|b| !b.is_empty()) {
            joins.push(prog.len());
            prog.push(Instruction::Jmp(Vec::new()));
        }
    }
    let end = prog.len();
    prog[fork] = Instruction::Jmp(entries.into_iter().map(|e| e.unwrap_or(end)).collect());
    for join in joins {
        prog[join] = Instruction::Jmp(vec![end]);
    }
    Ok(())
}

fn emit_repeat(
    expr: &Ast,
    min: usize,
    max: Option<usize>,
    lazy: bool,
    prog: &mut Vec<Instruction>,
) -> Result<(), BuildError> {
    match (min, max) {
        (0, None) | (0, Some(0)) => emit_star(expr, lazy, prog),
        (0, Some(1)) => emit_optional(expr, lazy, prog),
        (0, Some(n)) => {
            for _ in 0..n {
                emit_optional(expr, lazy, prog)?;
            }
            Ok(())
        }
        (1, None) => emit_plus(expr, lazy, prog),
        (1, Some(1)) => emit(expr, prog),
        (min, None) => {
            for _ in 0..min {
                emit(expr, prog)?;
            }
            emit_star(expr, lazy, prog)
        }
        (min, Some(max)) if min > max => Err(BuildError::InvalidRepeat { min, max }),
        (min, Some(max)) => {
            for _ in 0..min {
                emit(expr, prog)?;
            }
            for _ in min..max {
                emit_optional(expr, lazy, prog)?;
            }
            Ok(())
        }
    }
}

fn ordered(first: usize, second: usize, lazy: bool) -> Vec<usize> {
    if lazy {
        vec![second, first]
    } else {
        vec![first, second]
    }
}

// L: jmp L+1, END / body / jmp L / END:
fn emit_star(expr: &Ast, lazy: bool, prog: &mut Vec<Instruction>) -> Result<(), BuildError> {
    let fork = prog.len();
    prog.push(Instruction::Jmp(Vec::new()));
    emit(expr, prog)?;
    prog.push(Instruction::Jmp(vec![fork]));
    let end = prog.len();
    prog[fork] = Instruction::Jmp(ordered(fork + 1, end, lazy));
    Ok(())
}

// L: jmp L+1, END / body / END:
fn emit_optional(expr: &Ast, lazy: bool, prog: &mut Vec<Instruction>) -> Result<(), BuildError> {
    let fork = prog.len();
    prog.push(Instruction::Jmp(Vec::new()));
    emit(expr, prog)?;
    let end = prog.len();
    prog[fork] = Instruction::Jmp(ordered(fork + 1, end, lazy));
    Ok(())
}

// L: body / jmp L, END / END:
fn emit_plus(expr: &Ast, lazy: bool, prog: &mut Vec<Instruction>) -> Result<(), BuildError> {
    let start = prog.len();
    emit(expr, prog)?;
    let end = prog.len() + 1;
    prog.push(Instruction::Jmp(ordered(start, end, lazy)));
    Ok(())
}

/// How one automaton state is laid out.
#[derive(Clone, Copy)]
enum StateCode {
    /// Non-accepting with nowhere to go; edges into it are dropped.
    Dead,
    /// Accepting with no outgoing edges; shares the tail for its symbol.
    Tail(i32),
    /// Gets its own instructions.
    Own,
}

fn symbol_of(fa: &Fa, id: StateId) -> Result<i32, BuildError> {
    fa.state(id)
        .accept_symbol
        .ok_or(BuildError::MissingAcceptSymbol { state: id.index() })
}

/// Compile an automaton to a rule fragment.
///
/// States are laid out in closure order. A state with input transitions
/// becomes a `switch` whose cases group ranges by destination. Epsilon
/// edges, and the match tail of an accepting state that can still consume,
/// are reached through a `jmp` placed before the `switch` so they run
/// alongside it. Accepting states without outgoing edges share one
/// `save 1; match id` tail per symbol.
pub fn compile_fa(fa: &Fa) -> Result<Vec<Instruction>, BuildError> {
    let closure = fa.closure();

    let mut kind: FxHashMap<StateId, StateCode> = FxHashMap::default();
    let mut symbols: Vec<i32> = Vec::new();
    for id in &closure {
        let state = fa.state(*id);
        let code = if state.is_final() && *id != fa.start() {
            if state.accepting {
                StateCode::Tail(symbol_of(fa, *id)?)
            } else {
                StateCode::Dead
            }
        } else {
            StateCode::Own
        };
        if state.accepting {
            let symbol = symbol_of(fa, *id)?;
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        kind.insert(*id, code);
    }
    let live = |id: &StateId| !matches!(kind.get(id), Some(StateCode::Dead) | None);

    // addresses of states with their own code, then the shared tails
    let mut address: FxHashMap<StateId, usize> = FxHashMap::default();
    let mut next_pc = 0;
    for id in &closure {
        if !matches!(kind[id], StateCode::Own) {
            continue;
        }
        let state = fa.state(*id);
        let extra = state.epsilons.iter().filter(|e| live(e)).count() + usize::from(state.accepting);
        address.insert(*id, next_pc);
        next_pc += if !state.transitions.is_empty() && extra > 0 { 2 } else { 1 };
    }
    let tail_pc = |symbol: i32| -> usize {
        let index = symbols.iter().position(|s| *s == symbol).unwrap_or(0);
        next_pc + 2 * index
    };
    for id in &closure {
        if let StateCode::Tail(symbol) = kind[id] {
            address.insert(*id, tail_pc(symbol));
        }
    }

    let mut prog: Vec<Instruction> = Vec::with_capacity(next_pc + 2 * symbols.len());
    for id in &closure {
        if !matches!(kind[id], StateCode::Own) {
            continue;
        }
        let state = fa.state(*id);
        let mut extra: Vec<usize> = state
            .epsilons
            .iter()
            .filter_map(|e| address.get(e).copied())
            .collect();
        if state.accepting {
            extra.push(tail_pc(symbol_of(fa, *id)?));
        }
        let cases: Vec<SwitchCase> = fa
            .transitions_by_destination(*id)
            .into_iter()
            .filter_map(|(to, ranges)| {
                address
                    .get(&to)
                    .map(|target| SwitchCase { ranges, target: *target })
            })
            .collect();
        if state.transitions.is_empty() {
            prog.push(Instruction::Jmp(extra));
        } else if extra.is_empty() {
            prog.push(Instruction::Switch {
                cases,
                default: Vec::new(),
            });
        } else {
            let mut targets = vec![prog.len() + 1];
            targets.extend(extra);
            prog.push(Instruction::Jmp(targets));
            prog.push(Instruction::Switch {
                cases,
                default: Vec::new(),
            });
        }
    }
    for symbol in &symbols {
        terminate(&mut prog, *symbol);
    }
    debug!(
        states = closure.len(),
        instructions = prog.len(),
        "compiled automaton"
    );
    Ok(prog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::CodepointRange;
    use crate::regexp::parse;

    use Instruction::*;

    #[test]
    fn test_compile_literal() {
        assert_eq!(
            compile_literal("ab"),
            vec![Char('a' as u32), Char('b' as u32)]
        );
    }

    #[test]
    fn test_compile_alternation() {
        let prog = compile_ast(&parse("a|b").unwrap()).unwrap();
        assert_eq!(
            prog,
            vec![
                Jmp(vec![1, 3]),
                Char('a' as u32),
                Jmp(vec![4]),
                Char('b' as u32),
            ]
        );
    }

    #[test]
    fn test_compile_alternation_with_empty() {
        let prog = compile_ast(&parse("a||b|").unwrap()).unwrap();
        assert_eq!(
            prog,
            vec![
                Jmp(vec![1, 4, 3]),
                Char('a' as u32),
                Jmp(vec![4]),
                Char('b' as u32),
            ]
        );
    }

    #[test]
    fn test_compile_star_and_lazy() {
        let greedy = compile_ast(&parse("a*").unwrap()).unwrap();
        assert_eq!(
            greedy,
            vec![Jmp(vec![1, 3]), Char('a' as u32), Jmp(vec![0])]
        );
        let lazy = compile_ast(&parse("a*?").unwrap()).unwrap();
        assert_eq!(lazy, vec![Jmp(vec![3, 1]), Char('a' as u32), Jmp(vec![0])]);
    }

    #[test]
    fn test_compile_plus() {
        let prog = compile_ast(&parse("a+").unwrap()).unwrap();
        assert_eq!(prog, vec![Char('a' as u32), Jmp(vec![0, 2])]);
    }

    #[test]
    fn test_compile_bounded() {
        let prog = compile_ast(&parse("a{2,4}").unwrap()).unwrap();
        assert_eq!(
            prog,
            vec![
                Char('a' as u32),
                Char('a' as u32),
                Jmp(vec![3, 4]),
                Char('a' as u32),
                Jmp(vec![5, 6]),
                Char('a' as u32),
            ]
        );
    }

    #[test]
    fn test_compile_rejects_inverted_repeat() {
        let ast = Ast::Repeat {
            expr: Box::new(Ast::Literal('a' as u32)),
            min: 3,
            max: Some(1),
            lazy: false,
        };
        assert_eq!(
            compile_ast(&ast).unwrap_err(),
            BuildError::InvalidRepeat { min: 3, max: 1 }
        );
    }

    #[test]
    fn test_compile_rule_and_relocate() {
        let mut prog = compile_rule(&parse("x|y").unwrap(), 4).unwrap();
        assert_eq!(prog[prog.len() - 2..], [Save(1), Match(4)]);
        relocate(&mut prog, 10);
        assert_eq!(prog[0], Jmp(vec![11, 13]));
    }

    #[test]
    fn test_compile_fa_shares_tails() {
        // "ab|cb" determinized: two paths into the same accepting symbol
        let fa = Fa::parse("ab|cb", Some(7)).unwrap().to_dfa(None);
        let prog = compile_fa(&fa).unwrap();
        let matches = prog.iter().filter(|i| matches!(i, Match(7))).count();
        assert_eq!(matches, 1);
        assert!(matches!(prog[0], Switch { .. }));
    }

    #[test]
    fn test_compile_fa_accepting_with_transitions() {
        // "a+" as a DFA: the accepting state loops on 'a'
        let fa = Fa::parse("a+", Some(2)).unwrap().to_dfa(None);
        let prog = compile_fa(&fa).unwrap();
        assert_eq!(
            prog,
            vec![
                Switch {
                    cases: vec![SwitchCase {
                        ranges: vec![CodepointRange::single('a' as u32)],
                        target: 1
                    }],
                    default: vec![]
                },
                Jmp(vec![2, 3]),
                Switch {
                    cases: vec![SwitchCase {
                        ranges: vec![CodepointRange::single('a' as u32)],
                        target: 1
                    }],
                    default: vec![]
                },
                Save(1),
                Match(2),
            ]
        );
    }
}
