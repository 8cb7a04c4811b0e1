use caret_core::TokenSpan;
use caret_runtime::{GrammarRecognizer, Recognizer};
use indoc::indoc;

use super::*;

#[test]
fn conflicting_following_lists_collapse() {
    let mut a = CandidatesCollection::new();
    a.add_token(3, vec![1]);
    a.add_token(3, vec![1]);
    assert_eq!(a.following(3), Some(&[1][..]));

    a.add_token(3, vec![2]);
    assert_eq!(a.following(3), Some(&[][..]));
    a.add_token(3, vec![1]);
    assert_eq!(a.following(3), Some(&[][..]));

    let mut b = CandidatesCollection::new();
    b.add_token(3, vec![2]);
    b.add_token(3, vec![1]);
    b.add_token(3, vec![1]);
    assert_eq!(a, b);
}

#[test]
fn rule_paths_are_deduplicated() {
    let mut c = CandidatesCollection::new();
    assert!(c.add_rule(1, vec![0]));
    assert!(!c.add_rule(1, vec![0]));
    assert!(c.add_rule(1, vec![0, 1]));
    assert_eq!(c.rules()[&1].len(), 2);
    assert!(c.contains_rule(1));
    assert!(!c.contains_token(1));
}

#[test]
fn rule_position_widens() {
    let mut c = CandidatesCollection::new();
    c.record_rule_position(1, TokenSpan::new(4, 6));
    c.record_rule_position(1, TokenSpan::new(2, 6));
    c.record_rule_position(1, TokenSpan::at(5));
    assert_eq!(c.rule_positions()[&1], TokenSpan::new(2, 6));
}

#[test]
fn empty_collection() {
    let c = CandidatesCollection::new();
    assert!(c.is_empty());
    assert_eq!(c.token_types().count(), 0);
    assert_eq!(c.following(1), None);
}

#[test]
fn dump_uses_vocabulary_names() {
    let recognizer = GrammarRecognizer::from_text(indoc! {r"
        stat : ID '=' expr ';' ;
        expr : ID ;
        ID   : /[a-z]+/ ;
    "})
    .unwrap();
    let atn = recognizer.atn().unwrap();

    let mut c = CandidatesCollection::new();
    c.add_token(3, vec![1, 2]);
    c.add_token(2, vec![]);
    c.add_rule(1, vec![0]);
    c.record_rule_position(1, TokenSpan::new(2, 4));

    insta::assert_snapshot!(c.dump(atn), @r"
    token ';'
    token ID → '=' ';'
    rule expr [stat]
    position expr 2..4
    ");
}
