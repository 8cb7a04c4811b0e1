use caret_core::Channel;

use super::*;

fn token(index: usize, token_type: i32, channel: Channel, span: std::ops::Range<usize>) -> Token {
    Token {
        token_type,
        index,
        channel,
        text: String::new(),
        span,
    }
}

fn stream() -> BufferedTokenStream {
    BufferedTokenStream::new(vec![
        token(0, 3, Channel::Default, 0..1),
        token(1, 5, Channel::Hidden, 1..4),
        token(2, 1, Channel::Default, 4..5),
        token(3, caret_core::EOF, Channel::Default, 5..5),
    ])
}

#[test]
fn cursor_walks_and_seeks() {
    let mut s = stream();
    assert_eq!(s.index(), 0);
    assert_eq!(s.next_token().map(|t| t.token_type), Some(3));
    assert_eq!(s.next_token().map(|t| t.token_type), Some(5));
    assert_eq!(s.index(), 2);

    s.seek(3);
    assert!(s.next_token().unwrap().is_eof());
    assert!(s.next_token().is_none());
    assert_eq!(s.index(), 4);

    s.seek(100);
    assert_eq!(s.index(), s.size());
}

#[test]
fn random_access_does_not_move_cursor() {
    let s = stream();
    assert_eq!(s.get(2).map(|t| t.token_type), Some(1));
    assert!(s.get(4).is_none());
    assert_eq!(s.index(), 0);
}

#[test]
fn caret_offset_to_token_index() {
    let s = stream();
    assert_eq!(s.token_index_at(0), Some(0));
    assert_eq!(s.token_index_at(1), Some(0));
    // Inside the hidden token the next visible one is the caret token.
    assert_eq!(s.token_index_at(2), Some(2));
    assert_eq!(s.token_index_at(5), Some(2));
    assert_eq!(s.token_index_at(6), None);
}

#[test]
fn visibility() {
    let s = stream();
    assert!(s.get(0).unwrap().is_visible());
    assert!(!s.get(1).unwrap().is_visible());
}
