//! Fiber VM for bytecode programs.
//!
//! The VM simulates every live path through a [`Program`] at once, one input
//! code point at a time (a Pike VM). Each path is a *fiber*: a program
//! counter plus its own copy of the capture slots.
//!
//! Per code point:
//!
//! 1. Fibers seeded by the previous step are expanded through `jmp`, `save`
//!    and unmatched `switch` defaults, in priority order. A program counter
//!    is visited at most once per step; the first fiber to reach it wins.
//! 2. Consuming instructions, and `switch` cases, that accept the code point
//!    seed the next step.
//! 3. A `match` records the result and cuts every lower-priority fiber of
//!    this step.
//!
//! The run stops when no fiber survives. The last recorded match is the
//! result, so a longer match always replaces a shorter one.

mod sparse_set;

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use crate::cursor::{Cursor, StrCursor};
use crate::program::{Instruction, Program, ERROR_SYMBOL};
use crate::range;
use crate::unicode_categories::category_of;

use sparse_set::SparseSet;

/// Capture slots, shared between fibers until one of them writes.
type Slots = Rc<SmallVec<[usize; 2]>>;

#[derive(Debug, Clone)]
struct Fiber {
    pc: usize,
    slots: Slots,
}

/// A successful run.
///
/// `start` and `end` are the byte offsets recorded by `save 0` and `save 1`,
/// relative to the cursor position the run started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmMatch {
    pub symbol: i32,
    pub start: usize,
    pub end: usize,
}

impl VmMatch {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the match came from the fallback arm.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.symbol == ERROR_SYMBOL
    }
}

/// Work counters from [`Vm::run_with_statistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VmStatistics {
    /// Most fibers alive in one step.
    pub max_fiber_count: usize,
    /// Instruction passes per consumed code point.
    pub average_character_passes: f64,
}

#[derive(Default)]
struct Counters {
    passes: usize,
    characters: usize,
    max_fibers: usize,
}

/// Runs one program. Reuse a `Vm` across runs to keep its buffers.
pub struct Vm<'p> {
    program: &'p Program,
    /// Fibers of the current step, after expansion.
    current: Vec<Fiber>,
    visited: SparseSet,
    /// Fibers to expand at the next step.
    seeds: Vec<Fiber>,
    stack: Vec<Fiber>,
}

impl<'p> Vm<'p> {
    pub fn new(program: &'p Program) -> Self {
        Vm {
            program,
            current: Vec::new(),
            visited: SparseSet::new(program.len()),
            seeds: Vec::new(),
            stack: Vec::new(),
        }
    }

    #[inline]
    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Run from the cursor's position, appending consumed code points to its
    /// capture buffer.
    ///
    /// The cursor is left after the last code point any fiber consumed,
    /// which may be past the end of the returned match.
    pub fn run<C: Cursor>(&mut self, cursor: &mut C) -> Option<VmMatch> {
        self.execute(cursor, None)
    }

    /// Like [`Vm::run`], also counting work and tracing each instruction pass.
    pub fn run_with_statistics<C: Cursor>(
        &mut self,
        cursor: &mut C,
    ) -> (Option<VmMatch>, VmStatistics) {
        let mut counters = Counters::default();
        let result = self.execute(cursor, Some(&mut counters));
        let statistics = VmStatistics {
            max_fiber_count: counters.max_fibers,
            average_character_passes: counters.passes as f64 / counters.characters.max(1) as f64,
        };
        (result, statistics)
    }

    /// True if a non-error rule matches all of `input`.
    pub fn is_match(&mut self, input: &str) -> bool {
        let mut cursor = StrCursor::new(input);
        matches!(
            self.run(&mut cursor),
            Some(m) if !m.is_error() && m.start == 0 && m.end == input.len()
        )
    }

    fn execute<C: Cursor>(
        &mut self,
        cursor: &mut C,
        mut counters: Option<&mut Counters>,
    ) -> Option<VmMatch> {
        let program = self.program;
        if program.is_empty() {
            return None;
        }
        let base = cursor.offset();
        let mut pos = 0;
        let mut result = None;

        self.seeds.clear();
        self.seeds.push(Fiber {
            pc: 0,
            slots: Rc::new(SmallVec::new()),
        });
        loop {
            let c = cursor.current();
            self.current.clear();
            self.visited.clear();
            let seeds = std::mem::take(&mut self.seeds);
            for seed in &seeds {
                self.expand(seed.clone(), c, pos, counters.as_deref_mut());
            }
            self.seeds = seeds;
            self.seeds.clear();
            if let Some(counters) = counters.as_deref_mut() {
                counters.max_fibers = counters.max_fibers.max(self.current.len());
            }

            for fiber in &self.current {
                let inst = &program[fiber.pc];
                if let Instruction::Match(symbol) = inst {
                    result = Some(VmMatch {
                        symbol: *symbol,
                        start: fiber.slots.first().copied().unwrap_or(0),
                        end: fiber.slots.get(1).copied().unwrap_or(pos),
                    });
                    break;
                }
                if let Some(target) = c.and_then(|c| step(inst, fiber.pc, c)) {
                    self.seeds.push(Fiber {
                        pc: target,
                        slots: Rc::clone(&fiber.slots),
                    });
                }
            }

            if self.seeds.is_empty() {
                break;
            }
            cursor.capture();
            cursor.advance();
            pos = cursor.offset() - base;
            if let Some(counters) = counters.as_deref_mut() {
                counters.characters += 1;
            }
        }
        result
    }

    /// Follow non-consuming instructions from `seed`, queueing the fibers
    /// that stop at a consuming instruction, a matching `switch` or a
    /// `match`.
    fn expand(
        &mut self,
        seed: Fiber,
        c: Option<u32>,
        pos: usize,
        mut counters: Option<&mut Counters>,
    ) {
        let program = self.program;
        self.stack.push(seed);
        while let Some(fiber) = self.stack.pop() {
            if fiber.pc >= program.len() || !self.visited.insert(fiber.pc) {
                continue;
            }
            let inst = &program[fiber.pc];
            if let Some(counters) = counters.as_deref_mut() {
                counters.passes += 1;
                trace!(pc = fiber.pc, position = pos, instruction = %inst, "fiber pass");
            }
            match inst {
                Instruction::Jmp(targets) => {
                    for target in targets.iter().rev() {
                        self.stack.push(Fiber {
                            pc: *target,
                            slots: Rc::clone(&fiber.slots),
                        });
                    }
                }
                Instruction::Save(slot) => {
                    let mut slots = fiber.slots;
                    let values = Rc::make_mut(&mut slots);
                    if values.len() <= *slot {
                        values.resize(*slot + 1, 0);
                    }
                    values[*slot] = pos;
                    self.stack.push(Fiber {
                        pc: fiber.pc + 1,
                        slots,
                    });
                }
                Instruction::Switch { cases, default }
                    if !cases
                        .iter()
                        .any(|case| c.is_some_and(|c| range::contains(&case.ranges, c))) =>
                {
                    for target in default.iter().rev() {
                        self.stack.push(Fiber {
                            pc: *target,
                            slots: Rc::clone(&fiber.slots),
                        });
                    }
                }
                _ => self.current.push(fiber),
            }
        }
    }
}

/// Where a fiber at `pc` continues after consuming `c`, if it can.
fn step(inst: &Instruction, pc: usize, c: u32) -> Option<usize> {
    let accepted = match inst {
        Instruction::Char(expected) => *expected == c,
        Instruction::Set(ranges) => range::contains(ranges, c),
        Instruction::NSet(ranges) => !range::contains(ranges, c),
        Instruction::UCode(category) => category_of(c) == *category,
        Instruction::NUCode(category) => category_of(c) != *category,
        Instruction::Any => true,
        Instruction::Switch { cases, .. } => {
            return cases
                .iter()
                .find(|case| range::contains(&case.ranges, c))
                .map(|case| case.target)
        }
        Instruction::Jmp(_) | Instruction::Save(_) | Instruction::Match(_) => false,
    };
    accepted.then_some(pc + 1)
}
