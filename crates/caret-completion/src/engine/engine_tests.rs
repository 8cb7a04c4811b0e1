//! End-to-end completion tests over grammars written in the grammar notation.

use std::cell::RefCell;
use std::rc::Rc;

use caret_runtime::{Atn, GrammarRecognizer, Recognizer, TokenStream};
use indoc::indoc;

use super::*;

const ASSIGN: &str = indoc! {r"
    grammar Assign;
    stat : ID '=' expr ';' ;
    expr : ID | INT ;
    ID  : /[a-z]+/ ;
    INT : /[0-9]+/ ;
    WS  : / +/ -> skip ;
"};

const CALC: &str = indoc! {r"
    grammar Calc;
    stat : expr ';' ;
    expr : expr '+' expr | expr '*' expr | '(' expr ')' | ID ;
    ID : /[a-z]+/ ;
    WS : / +/ -> skip ;
"};

fn recognizer(grammar: &str) -> GrammarRecognizer {
    GrammarRecognizer::from_text(grammar).expect("grammar should build")
}

fn rules(recognizer: &GrammarRecognizer, names: &[&str]) -> Vec<u32> {
    names
        .iter()
        .map(|n| recognizer.rule_index(n).expect("rule exists"))
        .collect()
}

/// Candidates at stream index `caret`, with `preferred` rules.
fn complete(grammar: &str, text: &str, caret: usize, preferred: &[&str]) -> String {
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize(text).expect("input should lex");
    let mut core = CodeCompletionCore::builder(&recognizer)
        .preferred_rules(rules(&recognizer, preferred))
        .build()
        .expect("core should build");
    let candidates = core
        .collect_candidates(&mut stream, caret, None)
        .expect("completion should succeed");
    candidates.dump(core.atn())
}

#[test]
fn tokens_after_assignment() {
    insta::assert_snapshot!(complete(ASSIGN, "x = ", 2, &[]), @r"
    token ID
    token INT
    ");
}

#[test]
fn preferred_rule_replaces_its_tokens() {
    insta::assert_snapshot!(complete(ASSIGN, "x = ", 2, &["expr"]), @r"
    rule expr [stat]
    position expr 2..2
    ");
}

#[test]
fn caret_after_identifier() {
    insta::assert_snapshot!(complete(ASSIGN, "x = ", 1, &[]), @"token '='");
}

#[test]
fn caret_at_start_reports_following_tokens() {
    insta::assert_snapshot!(complete(ASSIGN, "", 0, &[]), @"token ID → '='");
}

#[test]
fn caret_from_byte_offset() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let caret = stream.token_index_at(4).unwrap();
    assert_eq!(caret, 2);

    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let candidates = core.collect_candidates(&mut stream, caret, None).unwrap();
    let id = recognizer.token_type("ID").unwrap();
    let int = recognizer.token_type("INT").unwrap();
    assert_eq!(candidates.token_types().collect::<Vec<_>>(), vec![id, int]);
    assert!(candidates.rules().is_empty());
}

#[test]
fn caret_past_end_of_input() {
    let at_eof = complete(ASSIGN, "x = ", 2, &[]);
    insta::assert_snapshot!(at_eof, @r"
    token ID
    token INT
    ");
    assert_eq!(complete(ASSIGN, "x = ", 50, &[]), at_eof);
    assert_eq!(complete(ASSIGN, "x = ", 50, &["expr"]), complete(ASSIGN, "x = ", 2, &["expr"]));
}

#[test]
fn ignored_tokens_are_dropped_and_cut_following() {
    let recognizer = recognizer(ASSIGN);
    let eq = recognizer.token_type("'='").unwrap();
    let int = recognizer.token_type("INT").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .ignored_tokens([eq])
        .ignore_tokens_where(move |t| t == int)
        .build()
        .unwrap();

    let mut stream = recognizer.tokenize("").unwrap();
    let candidates = core.collect_candidates(&mut stream, 0, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @"token ID");

    let mut stream = recognizer.tokenize("x = ").unwrap();
    let candidates = core.collect_candidates(&mut stream, 2, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @"token ID");
}

#[test]
fn left_recursive_rule_tokens() {
    insta::assert_snapshot!(complete(CALC, "a + ", 2, &[]), @r"
    token '('
    token ID
    ");
}

#[test]
fn left_recursive_rule_paths_are_distinct() {
    insta::assert_snapshot!(complete(CALC, "a + ", 2, &["expr"]), @r"
    rule expr [stat]
    rule expr [stat expr]
    position expr 0..2
    ");
}

#[test]
fn left_recursion_continues_after_operand() {
    insta::assert_snapshot!(complete(CALC, "a + b", 3, &[]), @r"
    token ';'
    token '+'
    token '*'
    ");
}

#[test]
fn outermost_preference() {
    let recognizer = recognizer(CALC);
    let mut stream = recognizer.tokenize("a + ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .preferred_rules(rules(&recognizer, &["expr"]))
        .rule_preference(RulePreference::Outermost)
        .build()
        .unwrap();
    let candidates = core.collect_candidates(&mut stream, 2, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    rule expr [stat]
    position expr 0..2
    ");
}

#[test]
fn nullable_rule_lets_caller_continue() {
    let grammar = indoc! {r"
        s   : ID opt ID ;
        opt : '-'? ;
        ID  : /[a-z]+/ ;
        WS  : / +/ -> skip ;
    "};
    insta::assert_snapshot!(complete(grammar, "x ", 1, &[]), @r"
    token '-'
    token ID
    ");
    insta::assert_snapshot!(complete(grammar, "x ", 1, &["opt"]), @r"
    token ID
    rule opt [s]
    position opt 1..1
    ");
}

#[test]
fn wildcard_offers_every_token() {
    let grammar = indoc! {r"
        s  : 'x' . ;
        ID : /[a-z]+/ ;
    "};
    insta::assert_snapshot!(complete(grammar, "x", 1, &[]), @r"
    token 'x'
    token ID
    ");
}

#[test]
fn not_set_offers_the_complement() {
    let grammar = indoc! {r"
        s  : ~';' ';' ;
        ID : /[a-z]+/ ;
    "};
    insta::assert_snapshot!(complete(grammar, "", 0, &[]), @"token ID → ';'");
}

#[test]
fn shortcut_replays_under_each_call_path() {
    let grammar = indoc! {r"
        s  : p ';' | q '=' ;
        p  : v ;
        q  : v ;
        v  : ID ID ;
        ID : /[a-z]+/ ;
        WS : / +/ -> skip ;
    "};
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize("x ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .preferred_rules(rules(&recognizer, &["v"]))
        .build()
        .unwrap();
    let candidates = core.collect_candidates(&mut stream, 1, None).unwrap();

    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    rule v [s p]
    rule v [s q]
    position v 0..1
    ");
    let stats = core.stats();
    assert_eq!(stats.shortcut_hits, 1);
    assert_eq!(stats.rule_walks, 4);
}

#[test]
fn shortcut_reuses_end_positions() {
    let grammar = indoc! {r"
        s  : a ';' | a '=' ;
        a  : ID ;
        ID : /[a-z]+/ ;
    "};
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize("x").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let candidates = core.collect_candidates(&mut stream, 1, None).unwrap();

    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    token ';'
    token '='
    ");
    assert_eq!(core.stats().shortcut_hits, 1);
    assert_eq!(core.stats().rule_walks, 2);
}

#[test]
fn rule_context_starts_mid_stream() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let expr = recognizer.rule_index("expr").unwrap();
    let context = RuleContext::new(expr, 2);
    let candidates = core
        .collect_candidates(&mut stream, 2, Some(&context))
        .unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    token ID
    token INT
    ");
}

#[test]
fn grammar_without_rules_gives_nothing() {
    let recognizer = recognizer("grammar Empty; WS : / / -> skip ;");
    let mut stream = recognizer.tokenize("").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let candidates = core.collect_candidates(&mut stream, 0, None).unwrap();
    assert!(candidates.is_empty());
}

#[test]
fn requests_are_idempotent() {
    let recognizer = recognizer(CALC);
    let mut stream = recognizer.tokenize("a + ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .preferred_rules(rules(&recognizer, &["expr"]))
        .build()
        .unwrap();
    let first = core.collect_candidates(&mut stream, 2, None).unwrap();
    let first_stats = core.stats();
    let second = core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_stats, core.stats());
}

#[test]
fn stream_cursor_is_restored() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    stream.seek(1);
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(stream.index(), 1);
}

#[test]
fn follow_sets_are_cleared_per_request_by_default() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();

    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 2);
    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 2);
}

#[test]
fn retained_follow_sets_survive_requests() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .retain_follow_sets(true)
        .build()
        .unwrap();

    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 2);
    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 0);
    assert_eq!(core.follow_set_cache().len(), 2);

    let cache = core.into_follow_set_cache();
    assert_eq!(cache.computations(), 2);
    let mut core = CodeCompletionCore::builder(&recognizer)
        .follow_set_cache(cache)
        .build()
        .unwrap();
    core.collect_candidates(&mut stream, 2, None).unwrap();
    assert_eq!(core.stats().follow_set_computations, 0);
}

#[test]
fn follow_set_cache_from_another_grammar_is_dropped() {
    let assign = recognizer(ASSIGN);
    let mut stream = assign.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::builder(&assign)
        .retain_follow_sets(true)
        .build()
        .unwrap();
    core.collect_candidates(&mut stream, 2, None).unwrap();
    let cache = core.into_follow_set_cache();
    assert!(!cache.is_empty());

    let calc = recognizer(CALC);
    let core = CodeCompletionCore::builder(&calc)
        .follow_set_cache(cache)
        .build()
        .unwrap();
    assert!(core.follow_set_cache().is_empty());
    assert_eq!(
        core.follow_set_cache().fingerprint(),
        Some(calc.atn().unwrap().fingerprint())
    );
}

#[test]
fn predicates_filter_alternatives() {
    let grammar = indoc! {r"
        s   : {allowed}? ID | INT ;
        ID  : /[a-z]+/ ;
        INT : /[0-9]+/ ;
    "};
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize("").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .predicates(|p: &caret_runtime::PredicateInfo, _: &PredicateContext<'_>| {
            Ok::<_, PredicateError>(p.name != "allowed")
        })
        .build()
        .unwrap();
    let candidates = core.collect_candidates(&mut stream, 0, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @"token INT");
}

#[test]
fn predicates_see_the_walk_position() {
    let grammar = indoc! {r"
        s  : ID {p}? ID ;
        ID : /[a-z]+/ ;
        WS : / +/ -> skip ;
    "};
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize("a b").unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut core = CodeCompletionCore::builder(&recognizer)
        .predicates(
            move |_: &caret_runtime::PredicateInfo, ctx: &PredicateContext<'_>| {
                let text = ctx.lookahead.map(|t| t.text.clone());
                log.borrow_mut().push((ctx.token_index, text));
                Ok::<_, PredicateError>(true)
            },
        )
        .build()
        .unwrap();
    core.collect_candidates(&mut stream, 1, None).unwrap();

    assert_eq!(*seen.borrow(), vec![(Some(1), Some("b".to_string()))]);
}

#[test]
fn predicate_errors_end_the_request() {
    let grammar = indoc! {r"
        s  : {allowed}? ID ;
        ID : /[a-z]+/ ;
    "};
    let recognizer = recognizer(grammar);
    let mut stream = recognizer.tokenize("").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .predicates(|_: &caret_runtime::PredicateInfo, _: &PredicateContext<'_>| {
            Err::<bool, _>(PredicateError::new("boom"))
        })
        .build()
        .unwrap();
    let err = core.collect_candidates(&mut stream, 0, None).unwrap_err();
    assert!(matches!(err, CompletionError::Predicate { ref name, .. } if name == "allowed"));
    insta::assert_snapshot!(err.to_string(), @"predicate `allowed` failed: boom");
}

#[test]
fn exec_fuel_is_enforced() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .exec_fuel(1)
        .build()
        .unwrap();
    let err = core.collect_candidates(&mut stream, 2, None).unwrap_err();
    assert!(matches!(err, CompletionError::ExecFuelExhausted(1)));
}

#[test]
fn limits_defaults_and_setters() {
    let limits = Limits::default();
    assert_eq!(limits.get_exec_fuel(), 1_000_000);
    assert_eq!(limits.get_recursion_limit(), 65_536);

    let limits = Limits::new().exec_fuel(10).recursion_limit(3);
    assert_eq!(limits.get_exec_fuel(), 10);
    assert_eq!(limits.get_recursion_limit(), 3);
}

#[test]
fn recursion_limit_is_enforced() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::builder(&recognizer)
        .limits(Limits::new().recursion_limit(1))
        .build()
        .unwrap();
    let err = core.collect_candidates(&mut stream, 2, None).unwrap_err();
    assert!(matches!(err, CompletionError::RecursionLimitExceeded(1)));
}

const LIST: &str = indoc! {r"
    list : ID (',' list)? ;
    ID : /[a-z]+/ ;
"};

#[test]
fn long_right_recursive_list() {
    let items = 5_000;
    let text = "x,".repeat(items);
    let recognizer = recognizer(LIST);
    let mut stream = recognizer.tokenize(&text).unwrap();
    let caret = stream.tokens().len() - 1;
    assert_eq!(caret, 2 * items);

    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let candidates = core.collect_candidates(&mut stream, caret, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @"token ID");
    assert_eq!(core.stats().rule_walks, items);
}

#[test]
fn long_list_with_preferred_rule() {
    let text = "x,".repeat(2_000);
    let recognizer = recognizer(LIST);
    let mut stream = recognizer.tokenize(&text).unwrap();
    let caret = stream.tokens().len() - 1;
    let mut core = CodeCompletionCore::builder(&recognizer)
        .preferred_rules(rules(&recognizer, &["list"]))
        .rule_preference(RulePreference::Outermost)
        .build()
        .unwrap();
    let candidates = core.collect_candidates(&mut stream, caret, None).unwrap();
    insta::assert_snapshot!(candidates.dump(core.atn()), @r"
    rule list []
    position list 0..4000
    ");
}

#[test]
fn list_ends_continue_in_caller() {
    let grammar = indoc! {r"
        stat : list ';' ;
        list : ID (',' list)? ;
        ID : /[a-z]+/ ;
        WS : / +/ -> skip ;
    "};
    insta::assert_snapshot!(complete(grammar, "a , b , c", 5, &[]), @r"
    token ';'
    token ','
    ");
    insta::assert_snapshot!(complete(grammar, "a , b , c ;", 5, &[]), @r"
    token ';'
    token ','
    ");
}

#[test]
fn cancelled_request_fails() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = core
        .collect_candidates_with(&mut stream, 2, None, &mut NoopTracer, &cancel)
        .unwrap_err();
    assert!(matches!(err, CompletionError::Cancelled));
}

#[test]
fn unknown_context_rule() {
    let recognizer = recognizer(ASSIGN);
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::new(&recognizer).unwrap();
    let err = core
        .collect_candidates(&mut stream, 2, Some(&RuleContext::new(99, 0)))
        .unwrap_err();
    assert!(matches!(err, CompletionError::UnknownRule(99)));
}

#[test]
fn unknown_preferred_rule() {
    let recognizer = recognizer(ASSIGN);
    let err = CodeCompletionCore::builder(&recognizer)
        .preferred_rules([7])
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CompletionError::UnknownRule(7)));
}

struct Bare;

impl Recognizer for Bare {
    fn grammar_name(&self) -> &str {
        "Bare"
    }

    fn atn(&self) -> Option<&Atn> {
        None
    }
}

#[test]
fn recognizer_without_atn() {
    let err = CodeCompletionCore::new(&Bare).err().unwrap();
    insta::assert_snapshot!(err.to_string(), @"no ATN available for grammar `Bare`");
}

#[test]
fn atn_is_its_own_recognizer() {
    let recognizer = recognizer(ASSIGN);
    let atn = recognizer.atn().unwrap();
    let mut stream = recognizer.tokenize("x = ").unwrap();
    let mut core = CodeCompletionCore::new(atn).unwrap();
    let candidates = core.collect_candidates(&mut stream, 2, None).unwrap();
    insta::assert_snapshot!(candidates.dump(atn), @r"
    token ID
    token INT
    ");
}
