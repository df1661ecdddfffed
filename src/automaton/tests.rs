use super::*;
use crate::cursor::{Cursor, StrCursor};
use crate::program::{compile_fa, link_fragments};
use crate::vm::Vm;

const KEYWORD: i32 = 0;
const IDENT: i32 = 1;
const STRING: i32 = 2;
const SPACE: i32 = 3;
const NUMBER: i32 = 4;

fn demo_rules() -> Vec<Fa> {
    [
        (KEYWORD, "as|base|case"),
        (IDENT, "[A-Z_a-z][0-9A-Z_a-z]*"),
        (STRING, r#""([^"\\]|\\.)*""#),
        (SPACE, r"[ \t\r\n]+"),
        (NUMBER, r"0|(\-?[1-9][0-9]*)"),
    ]
    .into_iter()
    .map(|(symbol, pattern)| Fa::parse(pattern, Some(symbol)).unwrap())
    .collect()
}

fn demo_lexer() -> Fa {
    let rules = demo_rules();
    make_lexer_fa(rules.iter())
}

/// Tokenize with a DFA table; text no row accepts becomes `-1` tokens.
fn table_tokens(table: &[DfaEntry], input: &str) -> Vec<(i32, String)> {
    let mut cursor = StrCursor::new(input);
    let mut tokens = Vec::new();
    while cursor.current().is_some() {
        cursor.clear_capture();
        let symbol = lex_dfa_table(table, &mut cursor);
        if cursor.capture_buffer().is_empty() {
            cursor.capture();
            cursor.advance();
        }
        tokens.push((symbol.unwrap_or(-1), cursor.capture_buffer().to_string()));
    }
    tokens
}

#[test]
fn test_demo_lexer_through_dfa_table() {
    let symbols = [KEYWORD, IDENT, STRING, SPACE, NUMBER];
    let table = demo_lexer().to_dfa_table(Some(&symbols[..]), None).unwrap();
    let tokens = table_tokens(
        &table,
        "base foo \"bar\" foobar bar 123 baz -345 fubar 1foo *#( 0",
    );
    let expected: Vec<(i32, &str)> = vec![
        (KEYWORD, "base"),
        (SPACE, " "),
        (IDENT, "foo"),
        (SPACE, " "),
        (STRING, "\"bar\""),
        (SPACE, " "),
        (IDENT, "foobar"),
        (SPACE, " "),
        (IDENT, "bar"),
        (SPACE, " "),
        (NUMBER, "123"),
        (SPACE, " "),
        (IDENT, "baz"),
        (SPACE, " "),
        (NUMBER, "-345"),
        (SPACE, " "),
        (IDENT, "fubar"),
        (SPACE, " "),
        (NUMBER, "1"),
        (IDENT, "foo"),
        (SPACE, " "),
        (-1, "*"),
        (-1, "#"),
        (-1, "("),
        (SPACE, " "),
        (NUMBER, "0"),
    ];
    let actual: Vec<(i32, &str)> = tokens.iter().map(|(s, v)| (*s, v.as_str())).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_symbol_table_renumbers_rows() {
    let table = demo_lexer()
        .to_dfa_table(Some(&[NUMBER, SPACE, STRING, IDENT, KEYWORD][..]), None)
        .unwrap();
    let tokens = table_tokens(&table, "case 7");
    assert_eq!(
        tokens,
        vec![
            (4, "case".to_string()),
            (1, " ".to_string()),
            (0, "7".to_string()),
        ]
    );
}

#[test]
fn test_nfa_table_keeps_rule_entries() {
    let fa = demo_lexer();
    let table = fa.to_nfa_table(None).unwrap();
    assert_eq!(table.len(), fa.state_count());
    assert_eq!(table[0].accept_symbol_id, NO_ACCEPT);
    assert_eq!(table[0].epsilons.len(), 5);
    assert!(table[0].transitions.is_empty());
    let accepting: Vec<i32> = table
        .iter()
        .map(|row| row.accept_symbol_id)
        .filter(|s| *s != NO_ACCEPT)
        .collect();
    for symbol in [KEYWORD, IDENT, STRING, SPACE, NUMBER] {
        assert!(accepting.contains(&symbol));
    }
}

#[test]
fn test_vm_agrees_with_automaton() {
    let fa = demo_lexer();
    let mut dfa = fa.to_dfa(None);
    dfa.trim_duplicates(None);
    let fragment = compile_fa(&dfa).unwrap();
    let program = link_fragments([fragment.as_slice()]);

    for sample in ["base", "basement", "as", "case_1", r#""a\"b""#, "-345", " \t ", "0"] {
        let mut cursor = StrCursor::new(sample);
        let expected = fa.lex(&mut cursor);
        assert_eq!(cursor.capture_buffer(), sample);

        let mut cursor = StrCursor::new(sample);
        let m = Vm::new(&program).run(&mut cursor).unwrap();
        assert_eq!(Some(m.symbol), expected, "{sample}");
        assert_eq!(m.end, sample.len(), "{sample}");
    }
}

#[test]
fn test_trimmed_dfa_keeps_language() {
    let nfa = Fa::parse("(a|b)*abb", Some(0)).unwrap();
    let dfa = nfa.to_dfa(None);
    let mut trimmed = dfa.clone();
    trimmed.trim_duplicates(None);
    assert!(trimmed.is_dfa());
    assert!(trimmed.state_count() <= dfa.state_count());
    assert!(trimmed.state_count() >= 4);

    let mut words = vec![String::new()];
    for _ in 0..6 {
        let longer: Vec<String> = words
            .iter()
            .flat_map(|w| [format!("{w}a"), format!("{w}b")])
            .collect();
        words.extend(longer);
        words.sort();
        words.dedup();
    }
    for word in &words {
        let expected = word.ends_with("abb");
        assert_eq!(nfa.accepts(word), expected, "{word}");
        assert_eq!(dfa.accepts(word), expected, "{word}");
        assert_eq!(trimmed.accepts(word), expected, "{word}");
    }
}

#[test]
fn test_case_insensitive_dfa() {
    let fa = Fa::parse("[a-c]x|Q", Some(0)).unwrap();
    let folded = make_case_insensitive_fa(&fa, Some(0)).unwrap();
    let dfa = folded.to_dfa(None);
    for word in ["ax", "AX", "cX", "q", "Q"] {
        assert!(dfa.accepts(word), "{word}");
    }
    assert!(!dfa.accepts("dx"));
}
