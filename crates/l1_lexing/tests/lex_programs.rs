use l1_lexing::lex;
use l1_tokens::token::{Declaration, TokenKind, TypeKeyword};
use l1_types::{Literal, ValueType};
use test_log::test;

#[test]
fn lex_declaration() {
    let lexed = lex("val x: number = 3 + 4");
    assert!(lexed.is_clean());
    let kinds = lexed
        .lexemes
        .iter()
        .map(|lexeme| *lexeme.kind())
        .collect::<Vec<_>>();
    assert_eq!(kinds[0], TokenKind::Declaration(Declaration::Val));
    assert_eq!(kinds[1], TokenKind::Identifier);
    assert_eq!(kinds[2], TokenKind::Punct);
    assert_eq!(kinds[3], TokenKind::Type(TypeKeyword::Number));
    assert_eq!(kinds[4], TokenKind::Assign);
    assert_eq!(kinds.len(), 8);

    assert_eq!(lexed.tables.identifiers.len(), 1);
    assert_eq!(lexed.tables.constants.len(), 2);
    assert_eq!(
        lexed.tables.constants.get(1).map(|c| c.value().clone()),
        Some(Literal::Number(4.0))
    );
}

#[test]
fn lex_links_repeated_names_to_one_entry() {
    let lexed = lex("var i = 0\ni = i + 1\ns = 'i'");
    assert!(lexed.is_clean());
    let identifier_indices = lexed
        .lexemes
        .iter()
        .filter(|lexeme| lexeme.is_identifier())
        .map(|lexeme| lexeme.table_index())
        .collect::<Vec<_>>();
    assert_eq!(
        identifier_indices,
        vec![Some(0), Some(0), Some(0), Some(1)]
    );
    let string = lexed
        .tables
        .constants
        .iter()
        .find(|constant| constant.value_type() == ValueType::String)
        .expect("string constant");
    assert_eq!(string.literal(), "'i'");
    assert_eq!(string.value(), &Literal::String("i".to_string()));
}

#[test]
fn lex_reports_every_unknown_lexeme() {
    let lexed = lex("x = 1 ! 2\ny = #");
    let messages = lexed
        .diagnostics
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        messages,
        vec![
            "Unidentified lexem \"!\" on the row 1.",
            "Unidentified lexem \"#\" on the row 2."
        ]
    );
    assert_eq!(lexed.lexemes.len(), 6);
}

#[test]
fn lex_condition_row() {
    let lexed = lex("if a != b then goto done");
    assert!(lexed.is_clean());
    assert_eq!(lexed.lexemes.len(), 7);
    assert!(lexed.lexemes.iter().all(|lexeme| lexeme.row() == 1));
    assert_eq!(lexed.tables.identifiers.len(), 3);
}
