//! Text assembler for bytecode programs.
//!
//! The accepted syntax is the disassembler's output plus comments, free-form
//! labels and the `regex (...)` pseudo-instruction:
//!
//! ```text
//! ; identifiers
//! start:  save 0
//!         jmp ident, error
//! ident:  regex ([A-Za-z_][A-Za-z_0-9]*)
//!         save 1
//!         match 1
//! error:  any
//!         save 1
//!         match -1
//! ```

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cursor::{Cursor, StrCursor};
use crate::error::{ParseError, ProgramError, Result};
use crate::range::{self, CodepointRange, MAX_CODEPOINT};
use crate::regexp::{parse_embedded, ParseOptions};
use crate::unicode_categories::UnicodeCategory;

use super::compiler::{compile_ast, relocate};
use super::instruction::{Instruction, Program, SwitchCase};

const MNEMONICS: &[&str] = &[
    "any", "char", "jmp", "match", "nset", "nucode", "regex", "save", "set", "switch", "ucode",
];

/// Assemble `source` into a validated program.
pub fn assemble(source: &str) -> Result<Program> {
    let mut assembler = Assembler {
        cursor: StrCursor::new(source),
        prog: Vec::new(),
        labels: FxHashMap::default(),
        references: Vec::new(),
    };
    assembler.run()?;
    let program = assembler.resolve()?;
    program.validate()?;
    debug!(instructions = program.len(), "assembled program");
    Ok(program)
}

/// Label names used by one instruction, in target order.
struct References {
    pc: usize,
    names: Vec<(String, usize)>,
}

struct Assembler<'a> {
    cursor: StrCursor<'a>,
    prog: Vec<Instruction>,
    labels: FxHashMap<String, usize>,
    references: Vec<References>,
}

impl<'a> Assembler<'a> {
    fn current_char(&self) -> Option<char> {
        self.cursor.current().and_then(char::from_u32)
    }

    fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Skip spaces, tabs and a trailing comment, but not the newline.
    fn skip_blank(&mut self) {
        while let Some(c) = self.current_char() {
            match c {
                ';' => {
                    while !matches!(self.current_char(), None | Some('\n')) {
                        self.advance();
                    }
                }
                '\n' => break,
                c if c.is_whitespace() => self.advance(),
                _ => break,
            }
        }
    }

    /// Skip blanks, comments and newlines. Returns true if input remains.
    fn skip_trivia(&mut self) -> bool {
        loop {
            self.skip_blank();
            match self.current_char() {
                Some('\n') => self.advance(),
                Some(_) => return true,
                None => return false,
            }
        }
    }

    fn expect(&mut self, wanted: char) -> std::result::Result<(), ParseError> {
        self.skip_blank();
        if self.current_char() == Some(wanted) {
            self.advance();
            Ok(())
        } else {
            let wanted = wanted.to_string();
            Err(self.cursor.expecting(&[wanted.as_str()]))
        }
    }

    fn end_of_line(&mut self) -> std::result::Result<(), ParseError> {
        self.skip_blank();
        match self.current_char() {
            None => Ok(()),
            Some('\n') => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(self.cursor.expecting(&["end of line"])),
        }
    }

    fn read_identifier(&mut self) -> std::result::Result<String, ParseError> {
        self.skip_blank();
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if c == '_' || c.is_alphanumeric() {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.cursor.expecting(&["identifier"]));
        }
        Ok(name)
    }

    fn read_integer(&mut self) -> std::result::Result<i64, ParseError> {
        self.skip_blank();
        let negative = self.current_char() == Some('-');
        if negative {
            self.advance();
        }
        let mut value: Option<i64> = None;
        while let Some(d) = self.current_char().and_then(|c| c.to_digit(10)) {
            let next = value.unwrap_or(0).checked_mul(10).and_then(|v| v.checked_add(d as i64));
            let Some(next) = next else {
                return Err(self.cursor.error("integer out of range"));
            };
            value = Some(next);
            self.advance();
        }
        match value {
            Some(v) if negative => Ok(-v),
            Some(v) => Ok(v),
            None => Err(self.cursor.expecting(&["integer"])),
        }
    }

    fn read_hex(&mut self, min: usize, max: usize) -> std::result::Result<u32, ParseError> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let Some(d) = self.current_char().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value.saturating_mul(16).saturating_add(d);
            count += 1;
            self.advance();
        }
        if count < min {
            return Err(self.cursor.expecting(&["hex digit"]));
        }
        Ok(value)
    }

    /// A quoted code point: `"a"`, `'a'`, `"\n"`, `"é"`.
    fn read_char_literal(&mut self) -> std::result::Result<u32, ParseError> {
        self.skip_blank();
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        let quote = match self.current_char() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.cursor.expecting(&["character literal"])),
        };
        self.advance();
        let cp = match self.current_char() {
            None | Some('\n') => return Err(self.cursor.error("unterminated character literal")),
            Some('\\') => {
                self.advance();
                let Some(c) = self.current_char() else {
                    return Err(self.cursor.error("unterminated escape"));
                };
                self.advance();
                match c {
                    'r' => 0x0D,
                    'n' => 0x0A,
                    't' => 0x09,
                    'a' => 0x07,
                    'b' => 0x08,
                    'f' => 0x0C,
                    'v' => 0x0B,
                    '0' => 0x00,
                    '\\' | '\'' | '"' => c as u32,
                    'x' => self.read_hex(1, 4)?,
                    'u' => self.read_hex(4, 4)?,
                    'U' => self.read_hex(8, 8)?,
                    other => {
                        return Err(ParseError::new(
                            format!("unknown escape \\{other}"),
                            line,
                            column,
                            offset,
                        ))
                    }
                }
            }
            Some(c) => {
                self.advance();
                c as u32
            }
        };
        if self.current_char() != Some(quote) {
            let quote = quote.to_string();
            return Err(self.cursor.expecting(&[quote.as_str()]));
        }
        self.advance();
        if cp > MAX_CODEPOINT {
            return Err(ParseError::new(
                format!("code point {cp:#x} out of range"),
                line,
                column,
                offset,
            ));
        }
        Ok(cp)
    }

    /// Comma-separated `"a"` or `"a".."z"` items, normalized.
    fn read_ranges(&mut self) -> std::result::Result<Vec<CodepointRange>, ParseError> {
        let mut ranges = Vec::new();
        loop {
            let low = self.read_char_literal()?;
            self.skip_blank();
            let high = if self.cursor.remaining().starts_with("..") {
                self.advance();
                self.advance();
                self.read_char_literal()?
            } else {
                low
            };
            if high < low {
                return Err(self.cursor.error("range out of order"));
            }
            ranges.push(CodepointRange::new(low, high));
            self.skip_blank();
            if self.current_char() != Some(',') {
                break;
            }
            self.advance();
        }
        Ok(range::normalized(ranges))
    }

    fn read_labels(&mut self) -> std::result::Result<Vec<(String, usize)>, ParseError> {
        let mut names = Vec::new();
        loop {
            self.skip_blank();
            let line = self.cursor.line();
            names.push((self.read_identifier()?, line));
            self.skip_blank();
            if self.current_char() != Some(',') {
                break;
            }
            self.advance();
        }
        Ok(names)
    }

    fn read_category(&mut self) -> std::result::Result<UnicodeCategory, ParseError> {
        self.skip_blank();
        let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
        let category = if self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            let id = self.read_integer()?;
            u32::try_from(id).ok().and_then(UnicodeCategory::from_id)
        } else {
            let name = self.read_identifier()?;
            UnicodeCategory::from_abbreviation(&name)
        };
        category.ok_or_else(|| {
            ParseError::new("unknown unicode category", line, column, offset)
                .with_expected(UnicodeCategory::abbreviations().iter().copied())
        })
    }

    fn run(&mut self) -> Result<()> {
        while self.skip_trivia() {
            let (line, column, offset) = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
            let name = self.read_identifier()?;
            self.skip_blank();
            if self.current_char() == Some(':') {
                self.advance();
                if self.labels.insert(name.clone(), self.prog.len()).is_some() {
                    return Err(ProgramError::DuplicateLabel { name, line }.into());
                }
                continue;
            }
            match name.to_ascii_lowercase().as_str() {
                "any" => self.prog.push(Instruction::Any),
                "char" => {
                    let cp = self.read_char_literal()?;
                    self.prog.push(Instruction::Char(cp));
                }
                "set" => {
                    let ranges = self.read_ranges()?;
                    self.prog.push(Instruction::Set(ranges));
                }
                "nset" => {
                    let ranges = self.read_ranges()?;
                    self.prog.push(Instruction::NSet(ranges));
                }
                "ucode" => {
                    let category = self.read_category()?;
                    self.prog.push(Instruction::UCode(category));
                }
                "nucode" => {
                    let category = self.read_category()?;
                    self.prog.push(Instruction::NUCode(category));
                }
                "save" => {
                    let slot = self.read_integer()?;
                    let slot = usize::try_from(slot)
                        .map_err(|_| ParseError::new("negative save slot", line, column, offset))?;
                    self.prog.push(Instruction::Save(slot));
                }
                "match" => {
                    let symbol = self.read_integer()?;
                    let symbol = i32::try_from(symbol)
                        .map_err(|_| ParseError::new("rule id out of range", line, column, offset))?;
                    self.prog.push(Instruction::Match(symbol));
                }
                "jmp" => {
                    self.skip_blank();
                    let names = match self.current_char() {
                        None | Some('\n') => Vec::new(),
                        Some(_) => self.read_labels()?,
                    };
                    self.push_branch(Instruction::Jmp(vec![0; names.len()]), names);
                }
                "switch" => self.parse_switch()?,
                "regex" => self.parse_regex()?,
                _ => {
                    return Err(ParseError::new(
                        format!("unknown instruction {name}"),
                        line,
                        column,
                        offset,
                    )
                    .with_expected(MNEMONICS.iter().copied())
                    .into())
                }
            }
            self.end_of_line()?;
        }
        Ok(())
    }

    fn push_branch(&mut self, inst: Instruction, names: Vec<(String, usize)>) {
        self.references.push(References {
            pc: self.prog.len(),
            names,
        });
        self.prog.push(inst);
    }

    fn parse_switch(&mut self) -> Result<()> {
        let mut cases = Vec::new();
        let mut names = Vec::new();
        let mut default = Vec::new();
        self.skip_blank();
        while matches!(self.current_char(), Some(c) if c.is_alphabetic()) {
            let keyword = self.read_identifier()?;
            match keyword.to_ascii_lowercase().as_str() {
                "case" => {
                    let ranges = self.read_ranges()?;
                    self.expect(':')?;
                    self.skip_blank();
                    let line = self.cursor.line();
                    names.push((self.read_identifier()?, line));
                    cases.push(SwitchCase { ranges, target: 0 });
                }
                "default" => {
                    self.expect(':')?;
                    default = self.read_labels()?;
                    break;
                }
                _ => return Err(self.cursor.expecting(&["case", "default"]).into()),
            }
            self.skip_blank();
            if self.current_char() != Some(',') {
                break;
            }
            self.advance();
            self.skip_blank();
        }
        let count = default.len();
        names.extend(default);
        let inst = if cases.is_empty() && count > 0 {
            Instruction::Jmp(vec![0; count])
        } else {
            Instruction::Switch {
                cases,
                default: vec![0; count],
            }
        };
        self.push_branch(inst, names);
        Ok(())
    }

    fn parse_regex(&mut self) -> Result<()> {
        self.expect('(')?;
        let ast = parse_embedded(&mut self.cursor, ParseOptions::default())?;
        self.expect(')')?;
        let mut body = compile_ast(&ast)?;
        relocate(&mut body, self.prog.len());
        self.prog.extend(body);
        Ok(())
    }

    fn resolve(mut self) -> Result<Program> {
        for refs in &self.references {
            let mut addresses = Vec::with_capacity(refs.names.len());
            for (name, line) in &refs.names {
                match self.labels.get(name) {
                    Some(&pc) => addresses.push(pc),
                    None => {
                        return Err(ProgramError::UndefinedLabel {
                            name: name.clone(),
                            line: *line,
                        }
                        .into())
                    }
                }
            }
            let mut addresses = addresses.into_iter();
            self.prog[refs.pc].for_each_target_mut(|t| {
                if let Some(pc) = addresses.next() {
                    *t = pc;
                }
            });
        }
        Ok(Program::new(self.prog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;

    use Instruction::*;

    #[test]
    fn test_assemble_basic() {
        let source = r#"
            ; a tiny program
            start:  save 0
                    jmp word, error   ; fan out
            word:   set "a".."z", "_"
                    save 1
                    MATCH 3
            error:  any
                    save 1
                    match -1
        "#;
        let program = assemble(source).unwrap();
        assert_eq!(
            program.instructions(),
            &[
                Save(0),
                Jmp(vec![2, 5]),
                Set(vec![
                    CodepointRange::single('_' as u32),
                    CodepointRange::new('a' as u32, 'z' as u32),
                ]),
                Save(1),
                Match(3),
                Any,
                Save(1),
                Match(-1),
            ]
        );
    }

    #[test]
    fn test_assemble_escapes() {
        let program = assemble(r#"char "\n"
char '\''
char "\x41"
char "é"
char "\U0001F600"
char "\\""#)
        .unwrap();
        let chars: Vec<_> = program
            .iter()
            .map(|inst| match inst {
                Char(cp) => *cp,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(chars, vec![0x0A, 0x27, 0x41, 0xE9, 0x1F600, 0x5C]);
    }

    #[test]
    fn test_assemble_switch_forms() {
        let program = assemble(
            r#"L0: switch case "a": L1, case "0".."9": L2, default: L0, L2
L1: switch default: L2
L2: switch
"#,
        )
        .unwrap();
        assert_eq!(
            program[0],
            Switch {
                cases: vec![
                    SwitchCase {
                        ranges: vec![CodepointRange::single('a' as u32)],
                        target: 1,
                    },
                    SwitchCase {
                        ranges: vec![CodepointRange::new('0' as u32, '9' as u32)],
                        target: 2,
                    },
                ],
                default: vec![0, 2],
            }
        );
        assert_eq!(program[1], Jmp(vec![2]));
        assert_eq!(
            program[2],
            Switch {
                cases: vec![],
                default: vec![],
            }
        );
    }

    #[test]
    fn test_assemble_regex() {
        let program = assemble("save 0\nregex (a|b)\nsave 1\nmatch 0\n").unwrap();
        assert_eq!(program[0], Save(0));
        assert_eq!(program[1], Jmp(vec![2, 4]));
        assert_eq!(program[program.len() - 1], Match(0));
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_disassembly_round_trip() {
        let source = r#"L0000: save 0
L0001: jmp L0002, L0005
L0002: switch case "a".."z", "\t": L0003, default: L0005
L0003: ucode Lu
L0004: nucode 8
L0005: nset "\u0000".."\u001F", "\"", "\\"
L0006: save 1
L0007: match 7
"#;
        let program = assemble(source).unwrap();
        let again = assemble(&program.to_string()).unwrap();
        assert_eq!(again, program);
    }

    #[test]
    fn test_label_errors() {
        assert_eq!(
            assemble("a: any\na: any\n"),
            Err(LexError::Program(ProgramError::DuplicateLabel {
                name: "a".into(),
                line: 2,
            }))
        );
        assert_eq!(
            assemble("any\n  jmp nowhere\n"),
            Err(LexError::Program(ProgramError::UndefinedLabel {
                name: "nowhere".into(),
                line: 2,
            }))
        );
    }

    #[test]
    fn test_syntax_errors() {
        match assemble("any\nfrob 3\n") {
            Err(LexError::Parse(err)) => {
                assert_eq!((err.line, err.column), (2, 1));
                assert!(err.expected.iter().any(|e| e == "jmp"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match assemble("char \"ab\"") {
            Err(LexError::Parse(err)) => assert_eq!(err.offset, 7),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(assemble(""), Err(LexError::Program(ProgramError::EmptyProgram))));
    }
}
