//! Properties that must hold for any grammar and input: the result does not
//! depend on transition order, and follow sets are computed at most once
//! per rule, however often the rule is walked.

use caret_runtime::{Atn, BufferedTokenStream, GrammarRecognizer, Recognizer};
use indoc::indoc;

use super::*;

const ASSIGN: &str = indoc! {r"
    stat : ID '=' expr ';' ;
    expr : ID | INT ;
    ID  : /[a-z]+/ ;
    INT : /[0-9]+/ ;
    WS  : / +/ -> skip ;
"};

const CALC: &str = indoc! {r"
    stat : expr ';' ;
    expr : expr '+' expr | expr '*' expr | '(' expr ')' | ID ;
    ID : /[a-z]+/ ;
    WS : / +/ -> skip ;
"};

const NESTED: &str = indoc! {r"
    file : item* ;
    item : decl | call ;
    decl : 'let' ID opt '=' value ';' ;
    opt  : ':' ID | ;
    call : ID '(' args? ')' ';' ;
    args : value (',' value)* ;
    value : ID | INT | call_expr ;
    call_expr : ID '(' ')' ;
    ID  : /[a-z]+/ ;
    INT : /[0-9]+/ ;
    WS  : / +/ -> skip ;
"};

fn collect(atn: &Atn, stream: &mut BufferedTokenStream, caret: usize, preferred: &[u32]) -> CandidatesCollection {
    let mut core = CodeCompletionCore::builder(atn)
        .preferred_rules(preferred.iter().copied())
        .build()
        .unwrap();
    core.collect_candidates(stream, caret, None).unwrap()
}

fn assert_order_invariant(grammar: &str, text: &str, preferred: &[&str]) {
    let recognizer = GrammarRecognizer::from_text(grammar).unwrap();
    let atn = recognizer.atn().unwrap();
    let preferred: Vec<_> = preferred
        .iter()
        .map(|n| recognizer.rule_index(n).unwrap())
        .collect();
    let mut stream = recognizer.tokenize(text).unwrap();
    let size = stream.tokens().len();

    let mut variants = vec![atn.reverse_transitions()];
    variants.extend((0..8).map(|seed| atn.shuffle_transitions(seed)));

    for caret in 0..size {
        let expected = collect(atn, &mut stream, caret, &preferred);
        for variant in &variants {
            let actual = collect(variant, &mut stream, caret, &preferred);
            assert_eq!(expected, actual, "{text:?} caret {caret}");
        }
    }
}

#[test]
fn order_invariance_simple() {
    assert_order_invariant(ASSIGN, "x = 1 ;", &[]);
    assert_order_invariant(ASSIGN, "x = 1 ;", &["expr"]);
}

#[test]
fn order_invariance_left_recursion() {
    assert_order_invariant(CALC, "a + b * ( c + d ) ;", &[]);
    assert_order_invariant(CALC, "a + b * ( c + d ) ;", &["expr"]);
    assert_order_invariant(CALC, "a + b * ( c + d ) ;", &["expr", "stat"]);
}

#[test]
fn order_invariance_nested() {
    let text = "let x : y = f ( ) ; g ( a , 1 ) ;";
    assert_order_invariant(NESTED, text, &[]);
    assert_order_invariant(NESTED, text, &["value"]);
    assert_order_invariant(NESTED, text, &["args", "call_expr"]);
}

fn layered(depth: usize) -> String {
    let mut grammar = String::new();
    for i in 0..depth - 1 {
        grammar.push_str(&format!("r{i} : r{} ;\n", i + 1));
    }
    grammar.push_str(&format!("r{} : ID ';' ;\n", depth - 1));
    grammar.push_str("ID : /[a-z]+/ ;\n");
    grammar
}

#[test]
fn follow_sets_computed_once_per_rule() {
    let recognizer = GrammarRecognizer::from_text(&layered(60)).unwrap();
    let mut stream = recognizer.tokenize("x").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .retain_follow_sets(true)
        .build()
        .unwrap();

    let candidates = core.collect_candidates(&mut stream, 1, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @"token ';'");
    assert_eq!(core.stats().follow_set_computations, 60);
    assert_eq!(core.stats().rule_walks, 60);

    core.collect_candidates(&mut stream, 1, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 0);
    assert_eq!(core.follow_set_cache().computations(), 60);
}

/// Operator layers `e0 .. e{depth-2}`, each a loop over the next one, with
/// a primary layer that nests back into `e0` through parentheses.
fn expression_layers(depth: usize) -> String {
    let mut grammar = String::new();
    for i in 0..depth - 1 {
        let next = i + 1;
        grammar.push_str(&format!("e{i} : e{next} ('o{i}' e{next})* ;\n"));
    }
    grammar.push_str(&format!("e{} : ID | '(' e0 ')' ;\n", depth - 1));
    grammar.push_str("ID : /[a-z]+/ ;\n");
    grammar.push_str("WS : / +/ -> skip ;\n");
    grammar
}

#[test]
fn follow_sets_shared_across_revisited_rules() {
    let recognizer = GrammarRecognizer::from_text(&expression_layers(55)).unwrap();
    let atn = recognizer.atn().unwrap();
    let rule_starts = atn.rule_count();
    assert_eq!(rule_starts, 55);

    let mut stream = recognizer.tokenize("a o3 ( b o10 c o0 d ) o50 e o1").unwrap();
    let caret = stream.tokens().len() - 1;
    let mut core = CodeCompletionCore::builder(&recognizer)
        .retain_follow_sets(true)
        .build()
        .unwrap();

    let candidates = core.collect_candidates(&mut stream, caret, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    token '('
    token ID
    ");
    let stats = core.stats();
    assert!(stats.follow_set_computations <= rule_starts, "{stats:?}");
    assert!(stats.rule_walks > rule_starts, "{stats:?}");

    core.collect_candidates(&mut stream, caret, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 0);
    assert!(core.follow_set_cache().computations() <= rule_starts);
}

#[test]
fn deep_grammar_hits_recursion_limit() {
    let recognizer = GrammarRecognizer::from_text(&layered(60)).unwrap();
    let mut stream = recognizer.tokenize("x").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .recursion_limit(30)
        .build()
        .unwrap();
    let err = core.collect_candidates(&mut stream, 1, None).unwrap_err();
    assert!(matches!(err, CompletionError::RecursionLimitExceeded(30)));
}
