//! Linking rule fragments into one lexer program.
//!
//! ```text
//!   L0000: save 0
//!   L0001: jmp <rule 0>, <rule 1>, ..., <fallback>
//!          <rule 0 ... save 1; match id0>
//!          <rule 1 ... save 1; match id1>
//!   fallback:
//!          any
//!          save 1
//!          match -1
//! ```
//!
//! Root fan-out order is rule priority. The fallback arm guarantees that at
//! least one code point is consumed when no rule matches.

use tracing::debug;

use super::compiler::{relocate, terminate};
use super::instruction::{Instruction, Program};

/// Rule id reported by the fallback arm.
pub const ERROR_SYMBOL: i32 = -1;

/// Link body fragments, terminating each with its rule id.
pub fn link<'a, I>(parts: I) -> Program
where
    I: IntoIterator<Item = (i32, &'a [Instruction])>,
{
    let fragments: Vec<Vec<Instruction>> = parts
        .into_iter()
        .map(|(symbol, body)| {
            let mut fragment = body.to_vec();
            terminate(&mut fragment, symbol);
            fragment
        })
        .collect();
    link_fragments(fragments.iter().map(Vec::as_slice))
}

/// Link fragments that already end in their own `match`.
pub fn link_fragments<'a, I>(fragments: I) -> Program
where
    I: IntoIterator<Item = &'a [Instruction]>,
{
    let mut prog = vec![Instruction::Save(0), Instruction::Jmp(Vec::new())];
    let mut entries = Vec::new();
    for fragment in fragments {
        let offset = prog.len();
        entries.push(offset);
        let start = prog.len();
        prog.extend_from_slice(fragment);
        relocate(&mut prog[start..], offset);
    }
    entries.push(prog.len());
    prog.push(Instruction::Any);
    prog.push(Instruction::Save(1));
    prog.push(Instruction::Match(ERROR_SYMBOL));
    debug!(
        fragments = entries.len() - 1,
        instructions = prog.len(),
        "linked program"
    );
    prog[1] = Instruction::Jmp(entries);
    Program::new(prog)
}

/// Remove every single-target `jmp` to the instruction right after it,
/// renumbering the remaining targets.
pub fn remove_dead_code(program: &Program) -> Program {
    let mut prog = program.instructions().to_vec();
    let before = prog.len();
    while let Some(pc) = prog
        .iter()
        .enumerate()
        .position(|(pc, inst)| matches!(inst, Instruction::Jmp(t) if t.as_slice() == [pc + 1]))
    {
        remove_instruction(&mut prog, pc);
    }
    debug!(before, after = prog.len(), "removed dead code");
    Program::new(prog)
}

/// Fold the root `jmp` into the `switch` that starts the first fragment, when
/// the root only chooses between that fragment and the fallback arm.
///
/// The fallback then runs only when the switch finds no case, instead of
/// alongside it.
pub fn fold_root_dispatch(program: &Program) -> Program {
    let mut prog = program.instructions().to_vec();
    let fallback = match prog.get(1) {
        Some(Instruction::Jmp(targets)) if targets.len() == 2 && targets[0] == 2 => targets[1],
        _ => return program.clone(),
    };
    if !matches!(prog.first(), Some(Instruction::Save(0)))
        || fallback + 3 != prog.len()
        || !matches!(prog.get(2), Some(Instruction::Switch { default, .. }) if default.is_empty())
    {
        return program.clone();
    }
    if let Some(Instruction::Switch { default, .. }) = prog.get_mut(2) {
        default.push(fallback);
    }
    remove_instruction(&mut prog, 1);
    debug!("folded root dispatch into switch");
    Program::new(prog)
}

fn remove_instruction(prog: &mut Vec<Instruction>, pc: usize) {
    prog.remove(pc);
    for inst in prog.iter_mut() {
        inst.for_each_target_mut(|t| {
            if *t > pc {
                *t -= 1;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::instruction::SwitchCase;
    use crate::range::CodepointRange;

    use Instruction::*;

    #[test]
    fn test_link_layout() {
        let a = [Char('a' as u32)];
        let b = [Jmp(vec![1, 2]), Char('b' as u32)];
        let program = link([(0, &a[..]), (5, &b[..])]);
        assert_eq!(
            program.instructions(),
            &[
                Save(0),
                Jmp(vec![2, 5, 9]),
                Char('a' as u32),
                Save(1),
                Match(0),
                Jmp(vec![6, 7]),
                Char('b' as u32),
                Save(1),
                Match(5),
                Any,
                Save(1),
                Match(ERROR_SYMBOL),
            ]
        );
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_link_fragment_targets_relocated() {
        let fragment = vec![Jmp(vec![1, 3]), Char('x' as u32), Save(1), Match(2)];
        let program = link_fragments([fragment.as_slice()]);
        assert_eq!(program[1], Jmp(vec![2, 6]));
        assert_eq!(program[2], Jmp(vec![3, 5]));
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_remove_dead_code() {
        let program = Program::new(vec![
            Save(0),
            Jmp(vec![2]),
            Jmp(vec![3, 5]),
            Char('a' as u32),
            Jmp(vec![5]),
            Save(1),
            Match(0),
        ]);
        let cleaned = remove_dead_code(&program);
        assert_eq!(
            cleaned.instructions(),
            &[
                Save(0),
                Jmp(vec![2, 3]),
                Char('a' as u32),
                Save(1),
                Match(0),
            ]
        );
    }

    #[test]
    fn test_fold_root_dispatch() {
        let switch = Switch {
            cases: vec![SwitchCase {
                ranges: vec![CodepointRange::single('a' as u32)],
                target: 1,
            }],
            default: vec![],
        };
        let program = link_fragments([&[switch, Save(1), Match(0)][..]]);
        let folded = fold_root_dispatch(&program);
        assert_eq!(
            folded.instructions(),
            &[
                Save(0),
                Switch {
                    cases: vec![SwitchCase {
                        ranges: vec![CodepointRange::single('a' as u32)],
                        target: 2,
                    }],
                    default: vec![4],
                },
                Save(1),
                Match(0),
                Any,
                Save(1),
                Match(ERROR_SYMBOL),
            ]
        );
        // nothing to fold twice
        assert_eq!(fold_root_dispatch(&folded), folded);
    }
}
