use caret_runtime::{GrammarRecognizer, Recognizer};
use indoc::indoc;

use super::complete::{CaretPosition, resolve_caret, resolve_rules, resolve_tokens};

const ASSIGN: &str = indoc! {r"
    grammar Assign;
    stat : ID '=' expr ';' ;
    expr : ID | INT ;
    ID  : /[a-z]+/ ;
    INT : /[0-9]+/ ;
    WS  : / +/ -> skip ;
"};

fn recognizer() -> GrammarRecognizer {
    GrammarRecognizer::from_text(ASSIGN).unwrap()
}

#[test]
fn caret_from_token_index() {
    let stream = recognizer().tokenize("x = 1").unwrap();
    assert_eq!(resolve_caret(&stream, CaretPosition::Token(2)), Ok(2));
    assert_eq!(
        resolve_caret(&stream, CaretPosition::Token(9)),
        Err("caret 9 is past the last token (stream has 4 tokens)".to_string())
    );
}

#[test]
fn caret_from_offset() {
    let stream = recognizer().tokenize("x = 1").unwrap();
    assert_eq!(resolve_caret(&stream, CaretPosition::Offset(0)), Ok(0));
    assert_eq!(resolve_caret(&stream, CaretPosition::Offset(4)), Ok(2));
    assert_eq!(
        resolve_caret(&stream, CaretPosition::Offset(6)),
        Err("offset 6 is past the end of the input".to_string())
    );
}

#[test]
fn caret_defaults_to_eof() {
    let stream = recognizer().tokenize("x = ").unwrap();
    assert_eq!(resolve_caret(&stream, CaretPosition::End), Ok(2));
}

#[test]
fn rules_by_name() {
    let recognizer = recognizer();
    let atn = recognizer.atn().unwrap();
    assert_eq!(resolve_rules(atn, &["expr".into(), "stat".into()]), Ok(vec![1, 0]));
    assert_eq!(
        resolve_rules(atn, &["term".into()]),
        Err("unknown rule `term`".to_string())
    );
}

#[test]
fn tokens_by_name_or_literal() {
    let recognizer = recognizer();
    let vocabulary = recognizer.vocabulary();
    let ids = resolve_tokens(vocabulary, &["ID".into(), "'='".into(), "EOF".into()]).unwrap();
    assert_eq!(
        ids,
        vec![
            recognizer.token_type("ID").unwrap(),
            recognizer.token_type("'='").unwrap(),
            -1
        ]
    );
    assert_eq!(
        resolve_tokens(vocabulary, &["'+'".into()]),
        Err("unknown token `'+'`".to_string())
    );
}
