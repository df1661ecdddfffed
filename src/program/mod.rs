//! Bytecode for the fiber VM.
//!
//! - `instruction`: the instruction set, [`Program`] and the disassembler
//! - `compiler`: lowering of regexp ASTs and automata to instructions
//! - `linker`: joining rule fragments into one lexer program
//! - `assembler`: reading programs back from text

mod assembler;
mod compiler;
mod instruction;
mod linker;

pub use assembler::assemble;
pub use compiler::{compile_ast, compile_fa, compile_literal, compile_rule, relocate, terminate};
pub use instruction::{Instruction, Program, SwitchCase};
pub use linker::{fold_root_dispatch, link, link_fragments, remove_dead_code, ERROR_SYMBOL};
