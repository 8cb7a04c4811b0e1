use caret_core::{Channel, EOF};
use caret_runtime::{BufferedTokenStream, GrammarRecognizer, Token, TokenStream};
use indoc::indoc;

use super::*;

const GRAMMAR: &str = indoc! {r"
    s       : ID* ;
    ID      : /[a-z]+/ ;
    WS      : / +/ -> skip ;
    COMMENT : /#[a-z]*/ -> hidden ;
"};

fn stream(text: &str) -> BufferedTokenStream {
    GrammarRecognizer::from_text(GRAMMAR)
        .unwrap()
        .tokenize(text)
        .unwrap()
}

fn indices(window: &TokenWindow) -> Vec<usize> {
    window.tokens().iter().map(|t| t.index).collect()
}

#[test]
fn hidden_tokens_are_left_out() {
    let mut stream = stream("a #x b c");
    let window = TokenWindow::build(&mut stream, 0, 2);
    assert_eq!(indices(&window), vec![0, 2]);
    assert_eq!(window.caret_index(), 1);
    assert_eq!(window.stream_index(1), 2);
}

#[test]
fn caret_on_hidden_token_moves_to_next_visible() {
    let mut stream = stream("a #x b c");
    let window = TokenWindow::build(&mut stream, 0, 1);
    assert_eq!(indices(&window), vec![0, 2]);
}

#[test]
fn caret_past_input_ends_at_eof() {
    let mut stream = stream("a b");
    let window = TokenWindow::build(&mut stream, 0, 10);
    assert_eq!(indices(&window), vec![0, 1, 2]);
    assert_eq!(window.token_type(window.caret_index()), EOF);
    assert_eq!(window.token_type(99), EOF);
    assert_eq!(window.stream_index(99), 2);
}

#[test]
fn window_starts_at_context_token() {
    let mut stream = stream("a b c");
    let window = TokenWindow::build(&mut stream, 1, 2);
    assert_eq!(indices(&window), vec![1, 2]);
    assert_eq!(window.len(), 2);
    assert!(!window.is_empty());
}

#[test]
fn cursor_is_restored() {
    let mut stream = stream("a b c");
    stream.seek(3);
    TokenWindow::build(&mut stream, 0, 2);
    assert_eq!(stream.index(), 3);
}

fn token(index: usize, channel: Channel, start: usize) -> Token {
    Token {
        token_type: 1,
        index,
        channel,
        span: start..start + 1,
        text: "a".to_string(),
    }
}

#[test]
fn stream_without_eof_gets_a_synthetic_one() {
    let mut stream = BufferedTokenStream::new(vec![
        token(0, Channel::Default, 0),
        token(1, Channel::Hidden, 2),
    ]);
    let window = TokenWindow::build(&mut stream, 0, 5);
    let last = &window.tokens()[window.caret_index()];
    assert!(last.is_eof());
    assert_eq!(last.index, 2);
    assert_eq!(last.span, 3..3);
}

#[test]
fn empty_stream() {
    let mut stream = BufferedTokenStream::new(Vec::new());
    let window = TokenWindow::build(&mut stream, 0, 0);
    assert_eq!(window.len(), 1);
    assert!(window.token(0).unwrap().is_eof());
    assert_eq!(window.stream_index(0), 0);
}
