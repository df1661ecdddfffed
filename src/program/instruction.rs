//! Bytecode instructions and programs.
//!
//! A [`Program`] is a flat list of [`Instruction`]s; an instruction's index
//! is its address. Branching instructions name their targets by address.
//! `Display` on a program is the disassembler: its output feeds straight back
//! into [`assemble`](super::assemble).

use std::fmt;
use std::ops::Index;

use crate::error::ProgramError;
use crate::range::CodepointRange;
use crate::unicode_categories::UnicodeCategory;

/// One arm of a [`Instruction::Switch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCase {
    /// Normalized ranges tested against the current code point.
    pub ranges: Vec<CodepointRange>,
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Consume the given code point.
    Char(u32),
    /// Consume a code point inside any of the (normalized) ranges.
    Set(Vec<CodepointRange>),
    /// Consume a code point outside all of the (normalized) ranges.
    NSet(Vec<CodepointRange>),
    /// Consume a code point of the given category.
    UCode(UnicodeCategory),
    /// Consume a code point not of the given category.
    NUCode(UnicodeCategory),
    /// Consume any code point.
    Any,
    /// Consume through the first case whose ranges hold the current code
    /// point; if none does, continue at every `default` target without
    /// consuming.
    Switch {
        cases: Vec<SwitchCase>,
        default: Vec<usize>,
    },
    /// Continue at every target, in priority order.
    Jmp(Vec<usize>),
    /// Record the current input offset in capture slot `n`.
    Save(usize),
    /// Report a match for the given rule id.
    Match(i32),
}

impl Instruction {
    /// True for instructions that consume a code point.
    pub fn is_consuming(&self) -> bool {
        matches!(
            self,
            Instruction::Char(_)
                | Instruction::Set(_)
                | Instruction::NSet(_)
                | Instruction::UCode(_)
                | Instruction::NUCode(_)
                | Instruction::Any
        )
    }

    /// Every address this instruction may transfer control to, other than
    /// the next instruction.
    pub fn targets(&self) -> Vec<usize> {
        match self {
            Instruction::Jmp(targets) => targets.clone(),
            Instruction::Switch { cases, default } => cases
                .iter()
                .map(|c| c.target)
                .chain(default.iter().copied())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Apply `f` to every branch target in place.
    pub fn for_each_target_mut<F: FnMut(&mut usize)>(&mut self, mut f: F) {
        match self {
            Instruction::Jmp(targets) => targets.iter_mut().for_each(f),
            Instruction::Switch { cases, default } => {
                for case in cases.iter_mut() {
                    f(&mut case.target);
                }
                default.iter_mut().for_each(f);
            }
            _ => {}
        }
    }

    /// Shift every branch target by `offset`.
    pub fn relocate(&mut self, offset: usize) {
        self.for_each_target_mut(|t| *t += offset);
    }
}

pub(crate) fn label(pc: usize) -> String {
    format!("L{:04}", pc)
}

/// Quote a code point so the assembler reads it back unchanged.
pub(crate) fn quote_char(cp: u32) -> String {
    let body = match cp {
        0x22 => "\\\"".to_string(),
        0x5C => "\\\\".to_string(),
        0x00 => "\\0".to_string(),
        0x07 => "\\a".to_string(),
        0x08 => "\\b".to_string(),
        0x09 => "\\t".to_string(),
        0x0A => "\\n".to_string(),
        0x0B => "\\v".to_string(),
        0x0C => "\\f".to_string(),
        0x0D => "\\r".to_string(),
        _ => match char::from_u32(cp) {
            Some(c) if !c.is_control() && !c.is_whitespace() || c == ' ' => c.to_string(),
            _ if cp <= 0xFFFF => format!("\\u{:04X}", cp),
            _ => format!("\\U{:08X}", cp),
        },
    };
    format!("\"{}\"", body)
}

fn write_ranges(f: &mut fmt::Formatter<'_>, ranges: &[CodepointRange]) -> fmt::Result {
    for (i, range) in ranges.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&quote_char(range.low))?;
        if range.high != range.low {
            write!(f, "..{}", quote_char(range.high))?;
        }
    }
    Ok(())
}

fn write_labels(f: &mut fmt::Formatter<'_>, targets: &[usize]) -> fmt::Result {
    for (i, target) in targets.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&label(*target))?;
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Char(cp) => write!(f, "char {}", quote_char(*cp)),
            Instruction::Set(ranges) => {
                f.write_str("set ")?;
                write_ranges(f, ranges)
            }
            Instruction::NSet(ranges) => {
                f.write_str("nset ")?;
                write_ranges(f, ranges)
            }
            Instruction::UCode(category) => write!(f, "ucode {}", category.id()),
            Instruction::NUCode(category) => write!(f, "nucode {}", category.id()),
            Instruction::Any => f.write_str("any"),
            Instruction::Switch { cases, default } => {
                f.write_str("switch")?;
                for (i, case) in cases.iter().enumerate() {
                    f.write_str(if i > 0 { ", case " } else { " case " })?;
                    write_ranges(f, &case.ranges)?;
                    write!(f, ": {}", label(case.target))?;
                }
                if !default.is_empty() {
                    f.write_str(if cases.is_empty() { " default: " } else { ", default: " })?;
                    write_labels(f, default)?;
                }
                Ok(())
            }
            Instruction::Jmp(targets) => {
                f.write_str("jmp ")?;
                write_labels(f, targets)
            }
            Instruction::Save(slot) => write!(f, "save {}", slot),
            Instruction::Match(symbol) => write!(f, "match {}", symbol),
        }
    }
}

/// A bytecode program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    #[inline]
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Check that the program is non-empty and every target is in bounds.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.instructions.is_empty() {
            return Err(ProgramError::EmptyProgram);
        }
        for (pc, inst) in self.instructions.iter().enumerate() {
            if let Some(target) = inst.targets().into_iter().find(|t| *t >= self.len()) {
                return Err(ProgramError::InvalidTarget { pc, target });
            }
        }
        Ok(())
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    #[inline]
    fn index(&self, pc: usize) -> &Instruction {
        &self.instructions[pc]
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "{}: {}", label(pc), inst)?;
        }
        Ok(())
    }
}
