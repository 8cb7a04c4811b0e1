use indoc::indoc;

use super::*;

fn sym(name: &str) -> Rule {
    Rule::Symbol(name.into())
}

fn lit(text: &str) -> Rule {
    Rule::Literal(text.into())
}

#[test]
fn parse_assignment_grammar() {
    let source = indoc! {r"
        grammar Assign;

        stat : ID '=' expr ';' ;
        expr : ID | INT ;

        ID  : /[a-z]+/ ;
        INT : /[0-9]+/ ;
        WS  : /\s+/ -> skip ;
    "};

    let grammar = Grammar::parse(source).unwrap();
    assert_eq!(grammar.name, "Assign");
    assert_eq!(grammar.start_rule(), Some("stat"));
    assert_eq!(
        grammar.rule("stat"),
        Some(&Rule::Seq(vec![sym("ID"), lit("="), sym("expr"), lit(";")]))
    );
    assert_eq!(
        grammar.rule("expr"),
        Some(&Rule::Choice(vec![sym("ID"), sym("INT")]))
    );

    let ws = grammar.token("WS").unwrap();
    assert_eq!(ws.pattern, TokenPattern::Regex(r"\s+".into()));
    assert_eq!(ws.channel, Channel::Skip);
    assert_eq!(grammar.tokens.len(), 3);
}

#[test]
fn header_is_optional() {
    let grammar = Grammar::parse("s : 'a' ;").unwrap();
    assert_eq!(grammar.name, "Grammar");
    assert_eq!(grammar.rules, vec![("s".to_string(), lit("a"))]);
}

#[test]
fn quantifiers_groups_and_sets() {
    let grammar = Grammar::parse("list : item (',' item)* ~(';' | EOL)? .+? {more}? ;").unwrap();

    assert_eq!(
        grammar.rule("list"),
        Some(&Rule::Seq(vec![
            sym("item"),
            Rule::Repeat(Box::new(Rule::Seq(vec![lit(","), sym("item")]))),
            Rule::Optional(Box::new(Rule::Not(vec![lit(";"), sym("EOL")]))),
            Rule::Repeat1(Box::new(Rule::Wildcard)),
            Rule::Predicate("more".into()),
        ]))
    );
}

#[test]
fn empty_alternative_is_blank() {
    let grammar = Grammar::parse("opt : 'x' | ;").unwrap();
    assert_eq!(
        grammar.rule("opt"),
        Some(&Rule::Choice(vec![lit("x"), Rule::Blank]))
    );
}

#[test]
fn literal_escapes() {
    let grammar = Grammar::parse(r"q : '\'' '\\' ; NL : '\n' -> hidden ;").unwrap();
    assert_eq!(
        grammar.rule("q"),
        Some(&Rule::Seq(vec![lit("'"), lit("\\")]))
    );
    let nl = grammar.token("NL").unwrap();
    assert_eq!(nl.pattern, TokenPattern::Literal("\n".into()));
    assert_eq!(nl.channel, Channel::Hidden);
}

#[test]
fn duplicate_rule_is_rejected() {
    let err = Grammar::parse("a : 'x' ; a : 'y' ;").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at 10..11: duplicate rule `a`");
}

#[test]
fn token_rule_must_be_single_pattern() {
    let err = Grammar::parse("ID : letter+ ;").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 5..11: token rule `ID` must be a single 'literal' or /regex/"
    );
}

#[test]
fn regex_in_parser_rule_is_rejected() {
    let err = Grammar::parse("s : /x/ ;").unwrap_err();
    assert_eq!(err.span(), Some(4..7));
}

#[test]
fn unknown_lexer_command() {
    let err = Grammar::parse("WS : ' ' -> drop ;").unwrap_err();
    assert_eq!(err.span(), Some(12..16));
}

#[test]
fn missing_semicolon_reports_end() {
    let source = "s : 'a'";
    let err = Grammar::parse(source).unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 7..7: expected `;` at end of rule, found end of grammar"
    );
}

#[test]
fn unclosed_group() {
    let err = Grammar::parse("s : ('a' ;").unwrap_err();
    assert_eq!(err.span(), Some(9..10));
}

#[test]
fn empty_literal_is_rejected() {
    let err = Grammar::parse("s : '' ;").unwrap_err();
    assert_eq!(err.span(), Some(4..6));
}

#[test]
fn render_points_at_the_error() {
    let source = "s : 'a' ;\nt : ) ;\n";
    let err = Grammar::parse(source).unwrap_err();
    let rendered = err.render(source, false);

    assert!(rendered.contains("expected `;` at end of rule, found `)`"));
    assert!(rendered.contains("t : ) ;"));
    assert!(rendered.contains('^'));
}

#[test]
fn render_without_location_falls_back_to_message() {
    let err = Grammar::from_json("{").unwrap_err();
    assert_eq!(err.render("{", false), err.to_string());
}
