//! Lexers: ordered rules linked into one program.
//!
//! ```
//! use lexvm::Lexer;
//!
//! let lexer = Lexer::builder()
//!     .literal(0, "let")
//!     .regex(1, "[a-z]+")
//!     .regex(2, "[ ]+")
//!     .build()
//!     .unwrap();
//! let symbols: Vec<i32> = lexer.tokenize("let x").map(|t| t.symbol_id).collect();
//! assert_eq!(symbols, vec![0, 2, 1]);
//! ```
//!
//! Declaration order is priority order: when two rules match the same text,
//! the earlier one wins.

use tracing::{debug, instrument};

use crate::automaton::{make_case_insensitive_fa, make_lexer_fa, make_literal_fa, Fa};
use crate::cursor::{Cursor, StrCursor};
use crate::error::{BuildError, Result};
use crate::program::{
    compile_fa, compile_literal, compile_rule, fold_root_dispatch, link_fragments,
    remove_dead_code, terminate, Instruction, Program,
};
use crate::progress::{reborrow, ProgressObserver};
use crate::regexp;
use crate::tokenizer::Tokenizer;
use crate::vm::{Vm, VmMatch, VmStatistics};

/// How rules are lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Merge runs of adjacent rules without lazy quantifiers into a single
    /// minimized DFA, then strip redundant jumps and fold the root dispatch.
    ///
    /// Merged rules match longest-first across the whole run, with ties going
    /// to the earlier rule. Unmerged rules are ordered choices: at the first
    /// position where an earlier rule matches, later rules are cut.
    pub optimize: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions { optimize: true }
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Regex { symbol: i32, pattern: String },
    RegexIgnoreCase { symbol: i32, pattern: String },
    Literal { symbol: i32, text: String },
    Program { symbol: i32, program: Program },
}

impl Rule {
    fn symbol(&self) -> i32 {
        match self {
            Rule::Regex { symbol, .. }
            | Rule::RegexIgnoreCase { symbol, .. }
            | Rule::Literal { symbol, .. }
            | Rule::Program { symbol, .. } => *symbol,
        }
    }
}

/// A rule ready for linking: either an automaton that may still be merged
/// with its neighbours, or finished bytecode.
enum Lowered {
    Fa(Fa),
    Fragment(Vec<Instruction>),
}

/// Collects rules for a [`Lexer`].
#[derive(Default)]
pub struct LexerBuilder<'o> {
    rules: Vec<Rule>,
    options: LexerOptions,
    observer: Option<&'o mut dyn ProgressObserver>,
}

impl<'o> LexerBuilder<'o> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regex(mut self, symbol: i32, pattern: impl Into<String>) -> Self {
        self.rules.push(Rule::Regex {
            symbol,
            pattern: pattern.into(),
        });
        self
    }

    /// A rule matching `pattern` regardless of letter case.
    pub fn regex_ignore_case(mut self, symbol: i32, pattern: impl Into<String>) -> Self {
        self.rules.push(Rule::RegexIgnoreCase {
            symbol,
            pattern: pattern.into(),
        });
        self
    }

    pub fn literal(mut self, symbol: i32, text: impl Into<String>) -> Self {
        self.rules.push(Rule::Literal {
            symbol,
            text: text.into(),
        });
        self
    }

    /// A precompiled body, for example from [`assemble`](crate::program::assemble).
    /// Its targets are relative to its first instruction; falling off the
    /// end means the rule matched.
    pub fn program(mut self, symbol: i32, program: Program) -> Self {
        self.rules.push(Rule::Program { symbol, program });
        self
    }

    pub fn options(mut self, options: LexerOptions) -> Self {
        self.options = options;
        self
    }

    /// Receive progress from determinization and duplicate trimming.
    pub fn observer(mut self, observer: &'o mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    #[instrument(level = "debug", skip_all, fields(rules = self.rules.len(), optimize = self.options.optimize))]
    pub fn build(self) -> Result<Lexer> {
        let LexerBuilder {
            rules,
            options,
            mut observer,
        } = self;

        let mut fragments: Vec<Vec<Instruction>> = Vec::with_capacity(rules.len());
        let mut group: Vec<(i32, Fa)> = Vec::new();
        for rule in &rules {
            let symbol = rule.symbol();
            if symbol < 0 {
                return Err(BuildError::NegativeSymbol { symbol }.into());
            }
            match lower(rule, options)? {
                Lowered::Fa(fa) => {
                    group.push((symbol, fa));
                    if !options.optimize {
                        flush_group(&mut group, &mut fragments, reborrow(&mut observer))?;
                    }
                }
                Lowered::Fragment(fragment) => {
                    flush_group(&mut group, &mut fragments, reborrow(&mut observer))?;
                    fragments.push(fragment);
                }
            }
        }
        flush_group(&mut group, &mut fragments, reborrow(&mut observer))?;

        let mut program = link_fragments(fragments.iter().map(Vec::as_slice));
        if options.optimize {
            program = fold_root_dispatch(&remove_dead_code(&program));
        }
        program.validate()?;
        debug!(
            fragments = fragments.len(),
            instructions = program.len(),
            "built lexer"
        );
        Ok(Lexer { program })
    }
}

fn lower(rule: &Rule, options: LexerOptions) -> Result<Lowered> {
    let lowered = match rule {
        Rule::Regex { symbol, pattern } => {
            let ast = regexp::parse(pattern)?;
            debug!(symbol, pattern = pattern.as_str(), lazy = ast.has_lazy(), "parsed rule");
            if options.optimize && !ast.has_lazy() {
                Lowered::Fa(ast.to_fa(Some(*symbol))?)
            } else {
                Lowered::Fragment(compile_rule(&ast, *symbol)?)
            }
        }
        Rule::RegexIgnoreCase { symbol, pattern } => {
            let fa = Fa::parse(pattern, Some(*symbol))?;
            Lowered::Fa(make_case_insensitive_fa(&fa, Some(*symbol))?)
        }
        Rule::Literal { symbol, text } if options.optimize => Lowered::Fa(make_literal_fa(
            text.chars().map(|c| c as u32),
            Some(*symbol),
        )),
        Rule::Literal { symbol, text } => {
            let mut fragment = compile_literal(text);
            terminate(&mut fragment, *symbol);
            Lowered::Fragment(fragment)
        }
        Rule::Program { symbol, program } => {
            let mut fragment = program.instructions().to_vec();
            terminate(&mut fragment, *symbol);
            Lowered::Fragment(fragment)
        }
    };
    Ok(lowered)
}

/// Merge the pending automata into one DFA fragment.
///
/// Determinization keeps the lowest accept symbol, so each rule is keyed by
/// its position in the group while the DFA is built and gets its rule id
/// back afterwards. Ties go to the earlier rule whatever the ids are.
fn flush_group(
    group: &mut Vec<(i32, Fa)>,
    fragments: &mut Vec<Vec<Instruction>>,
    mut observer: Option<&mut dyn ProgressObserver>,
) -> Result<()> {
    if group.is_empty() {
        return Ok(());
    }
    let symbols: Vec<i32> = group.iter().map(|(symbol, _)| *symbol).collect();
    for (position, (_, fa)) in group.iter_mut().enumerate() {
        fa.set_accept_symbol(Some(position as i32));
    }
    let nfa = make_lexer_fa(group.iter().map(|(_, fa)| fa));
    let mut dfa = nfa.to_dfa(reborrow(&mut observer));
    dfa.map_accept_symbols(|position| symbols[position as usize]);
    let before = dfa.state_count();
    dfa.trim_duplicates(reborrow(&mut observer));
    debug!(
        rules = group.len(),
        nfa_states = nfa.state_count(),
        dfa_states = before,
        trimmed_states = dfa.state_count(),
        "merged rules into dfa"
    );
    fragments.push(compile_fa(&dfa)?);
    group.clear();
    Ok(())
}

/// A compiled lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexer {
    program: Program,
}

impl Lexer {
    pub fn builder<'o>() -> LexerBuilder<'o> {
        LexerBuilder::new()
    }

    /// Wrap an already linked program, such as one read back with
    /// [`assemble`](crate::program::assemble).
    pub fn from_program(program: Program) -> Result<Self> {
        program.validate()?;
        Ok(Lexer { program })
    }

    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The program as assembler text.
    pub fn disassemble(&self) -> String {
        self.program.to_string()
    }

    /// Match one token at the cursor. See [`Vm::run`].
    pub fn run<C: Cursor>(&self, cursor: &mut C) -> Option<VmMatch> {
        Vm::new(&self.program).run(cursor)
    }

    pub fn run_with_statistics<C: Cursor>(
        &self,
        cursor: &mut C,
    ) -> (Option<VmMatch>, VmStatistics) {
        Vm::new(&self.program).run_with_statistics(cursor)
    }

    /// True if one non-error token spans all of `input`.
    pub fn is_match(&self, input: &str) -> bool {
        Vm::new(&self.program).is_match(input)
    }

    pub fn tokenize<'l, 'i>(&'l self, input: &'i str) -> Tokenizer<'l, 'i> {
        Tokenizer::new(&self.program, StrCursor::new(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;
    use crate::program::{assemble, ERROR_SYMBOL};
    use crate::progress::{FaProgress, FaStatus};

    fn symbols(lexer: &Lexer, input: &str) -> Vec<(i32, String)> {
        lexer
            .tokenize(input)
            .map(|t| (t.symbol_id, t.value))
            .collect()
    }

    #[test]
    fn test_keyword_beats_identifier() {
        let lexer = Lexer::builder()
            .literal(0, "if")
            .regex(1, "[a-z]+")
            .build()
            .unwrap();
        assert_eq!(
            symbols(&lexer, "if iffy"),
            vec![
                (0, "if".to_string()),
                (ERROR_SYMBOL, " ".to_string()),
                (1, "iffy".to_string()),
            ]
        );
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        for options in [LexerOptions::default(), LexerOptions { optimize: false }] {
            let lexer = Lexer::builder()
                .literal(5, "if")
                .regex(1, "[a-z]+")
                .options(options)
                .build()
                .unwrap();
            assert_eq!(symbols(&lexer, "if"), vec![(5, "if".to_string())]);
        }
        let merged = Lexer::builder()
            .literal(5, "if")
            .regex(1, "[a-z]+")
            .build()
            .unwrap();
        assert_eq!(symbols(&merged, "iffy"), vec![(1, "iffy".to_string())]);
    }

    #[test]
    fn test_optimized_program_folds_root() {
        let lexer = Lexer::builder().regex(0, "[0-9]+").build().unwrap();
        assert!(matches!(
            lexer.program()[1],
            Instruction::Switch { ref default, .. } if !default.is_empty()
        ));
        assert!(lexer.is_match("123"));
        assert!(!lexer.is_match("12a"));
    }

    #[test]
    fn test_unoptimized_keeps_rule_fragments() {
        let lexer = Lexer::builder()
            .regex(0, "[0-9]+")
            .literal(1, "+")
            .options(LexerOptions { optimize: false })
            .build()
            .unwrap();
        match &lexer.program()[1] {
            Instruction::Jmp(targets) => assert_eq!(targets.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            symbols(&lexer, "12+3"),
            vec![
                (0, "12".to_string()),
                (1, "+".to_string()),
                (0, "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_lazy_rule_stays_bytecode() {
        let lexer = Lexer::builder()
            .regex(0, r"/\*.*?\*/")
            .regex(1, "[a-z]+")
            .build()
            .unwrap();
        assert_eq!(
            symbols(&lexer, "/* a */b/* c */"),
            vec![
                (0, "/* a */".to_string()),
                (1, "b".to_string()),
                (0, "/* c */".to_string()),
            ]
        );
    }

    #[test]
    fn test_ignore_case_rule() {
        let lexer = Lexer::builder()
            .regex_ignore_case(0, "select")
            .build()
            .unwrap();
        assert!(lexer.is_match("SeLeCt"));
        assert!(lexer.is_match("select"));
        assert!(!lexer.is_match("selec"));
    }

    #[test]
    fn test_program_rule() {
        let body = assemble("digits: set \"0\"..\"9\"\njmp digits, end\nend: char \";\"").unwrap();
        let lexer = Lexer::builder().program(4, body).build().unwrap();
        assert_eq!(symbols(&lexer, "42;"), vec![(4, "42;".to_string())]);
    }

    #[test]
    fn test_observer_sees_progress() {
        let mut seen: Vec<FaProgress> = Vec::new();
        let mut observer = |p: FaProgress| seen.push(p);
        Lexer::builder()
            .regex(0, "a|ab|abc")
            .observer(&mut observer)
            .build()
            .unwrap();
        assert!(seen.iter().any(|p| p.status == FaStatus::DfaTransform));
        assert!(seen.iter().any(|p| p.status == FaStatus::TrimDuplicates));
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            Lexer::builder().regex(0, "(a").build(),
            Err(LexError::Parse(_))
        ));
        assert_eq!(
            Lexer::builder().literal(-2, "x").build(),
            Err(LexError::Build(BuildError::NegativeSymbol { symbol: -2 }))
        );
    }

    #[test]
    fn test_disassemble_reassembles() {
        let lexer = Lexer::builder()
            .literal(0, "as")
            .regex(1, "[a-z]+")
            .build()
            .unwrap();
        let again = Lexer::from_program(assemble(&lexer.disassemble()).unwrap()).unwrap();
        assert_eq!(again, lexer);
    }
}
