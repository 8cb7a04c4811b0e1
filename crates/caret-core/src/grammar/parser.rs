//! Recursive-descent parser for the grammar notation.
//!
//! ```text
//! grammar  := ('grammar' Id ';')? rule*
//! rule     := Id ':' body ';'
//! body     := seq ('|' seq)*                  -- parser rules (lowercase)
//!           | (Literal | Regex) ('->' Id)?    -- token rules (uppercase)
//! seq      := element*
//! element  := atom ('*' | '+' | '?')? '?'?
//! atom     := Id | Literal | '.' | '(' body ')' | '~' set | Predicate
//! set      := Id | Literal | '(' (Id | Literal) ('|' (Id | Literal))* ')'
//! ```

use std::collections::HashSet;
use std::ops::Range;

use super::error::GrammarError;
use super::lexer::{Lexeme, TokenKind, lex, unescape};
use super::types::{Channel, Grammar, Rule, TokenDef, TokenPattern};

const LITERAL_ESCAPES: &[char] = &['\'', '\\', 'n', 'r', 't'];
const REGEX_ESCAPES: &[char] = &['/'];

impl Grammar {
    /// Parse grammar notation.
    ///
    /// Rules starting with an uppercase letter are token rules and must be a
    /// single `'literal'` or `/regex/`, optionally followed by `-> skip` or
    /// `-> hidden`.
    pub fn parse(source: &str) -> Result<Self, GrammarError> {
        let tokens = lex(source)?;
        Parser {
            source,
            tokens,
            pos: 0,
        }
        .parse_grammar()
    }
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Lexeme>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn parse_grammar(mut self) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar::new("Grammar");

        if self.eat(TokenKind::KwGrammar).is_some() {
            let name = self.expect(TokenKind::Id, "grammar name")?;
            grammar.name = self.text(&name).to_string();
            self.expect(TokenKind::Semi, "`;` after grammar name")?;
        }

        let mut seen = HashSet::new();
        while self.peek().is_some() {
            let name_span = self.expect(TokenKind::Id, "rule name")?;
            let name = self.text(&name_span).to_string();
            if !seen.insert(name.clone()) {
                return Err(GrammarError::syntax(
                    format!("duplicate rule `{name}`"),
                    name_span,
                ));
            }
            self.expect(TokenKind::Colon, "`:` after rule name")?;

            if is_token_rule(&name) {
                grammar.tokens.push(self.parse_token_rule(name)?);
            } else {
                let body = self.parse_alternatives()?;
                grammar.rules.push((name, body));
            }
            self.expect(TokenKind::Semi, "`;` at end of rule")?;
        }

        Ok(grammar)
    }

    fn parse_token_rule(&mut self, name: String) -> Result<TokenDef, GrammarError> {
        let Some(lexeme) = self.bump() else {
            return Err(self.unexpected_end());
        };
        let text = self.text(&lexeme.span);
        let pattern = match lexeme.kind {
            TokenKind::StringLiteral => {
                TokenPattern::Literal(unescape(&text[1..text.len() - 1], LITERAL_ESCAPES))
            }
            TokenKind::RegexLiteral => {
                TokenPattern::Regex(unescape(&text[1..text.len() - 1], REGEX_ESCAPES))
            }
            _ => {
                return Err(GrammarError::syntax(
                    format!("token rule `{name}` must be a single 'literal' or /regex/"),
                    lexeme.span,
                ));
            }
        };

        let mut channel = Channel::Default;
        if self.eat(TokenKind::Arrow).is_some() {
            let command = self.expect(TokenKind::Id, "lexer command")?;
            channel = match self.text(&command) {
                "skip" => Channel::Skip,
                "hidden" => Channel::Hidden,
                other => {
                    return Err(GrammarError::syntax(
                        format!("unknown lexer command `{other}` (expected `skip` or `hidden`)"),
                        command,
                    ));
                }
            };
        }

        Ok(TokenDef {
            name,
            pattern,
            channel,
        })
    }

    fn parse_alternatives(&mut self) -> Result<Rule, GrammarError> {
        let mut alts = vec![self.parse_sequence()?];
        while self.eat(TokenKind::Pipe).is_some() {
            alts.push(self.parse_sequence()?);
        }
        Ok(if alts.len() == 1 {
            alts.pop().unwrap_or(Rule::Blank)
        } else {
            Rule::Choice(alts)
        })
    }

    fn parse_sequence(&mut self) -> Result<Rule, GrammarError> {
        let mut items = Vec::new();
        while self.at_element_start() {
            items.push(self.parse_element()?);
        }
        Ok(match items.len() {
            0 => Rule::Blank,
            1 => items.pop().unwrap_or(Rule::Blank),
            _ => Rule::Seq(items),
        })
    }

    fn at_element_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TokenKind::Id
                    | TokenKind::StringLiteral
                    | TokenKind::Dot
                    | TokenKind::ParenOpen
                    | TokenKind::Tilde
                    | TokenKind::Predicate
                    | TokenKind::RegexLiteral
            )
        )
    }

    fn parse_element(&mut self) -> Result<Rule, GrammarError> {
        let atom = self.parse_atom()?;
        let rule = if self.eat(TokenKind::Star).is_some() {
            Rule::Repeat(Box::new(atom))
        } else if self.eat(TokenKind::Plus).is_some() {
            Rule::Repeat1(Box::new(atom))
        } else if self.eat(TokenKind::Question).is_some() {
            Rule::Optional(Box::new(atom))
        } else {
            return Ok(atom);
        };
        // Non-greedy marker; matching order does not change the language.
        self.eat(TokenKind::Question);
        Ok(rule)
    }

    fn parse_atom(&mut self) -> Result<Rule, GrammarError> {
        let Some(lexeme) = self.bump() else {
            return Err(self.unexpected_end());
        };
        let text = self.text(&lexeme.span);
        match lexeme.kind {
            TokenKind::Id => Ok(Rule::Symbol(text.to_string())),
            TokenKind::StringLiteral => self.literal(&lexeme),
            TokenKind::Dot => Ok(Rule::Wildcard),
            TokenKind::Predicate => {
                let name = text[1..text.len() - 2].trim();
                Ok(Rule::Predicate(name.to_string()))
            }
            TokenKind::ParenOpen => {
                let inner = self.parse_alternatives()?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                Ok(inner)
            }
            TokenKind::Tilde => self.parse_not_set(),
            TokenKind::RegexLiteral => Err(GrammarError::syntax(
                "regex literals are only allowed in token rules",
                lexeme.span,
            )),
            _ => Err(GrammarError::syntax(
                format!("expected an element, found `{text}`"),
                lexeme.span,
            )),
        }
    }

    fn parse_not_set(&mut self) -> Result<Rule, GrammarError> {
        if self.eat(TokenKind::ParenOpen).is_none() {
            return Ok(Rule::Not(vec![self.parse_set_member()?]));
        }
        let mut members = vec![self.parse_set_member()?];
        while self.eat(TokenKind::Pipe).is_some() {
            members.push(self.parse_set_member()?);
        }
        self.expect(TokenKind::ParenClose, "`)` after set")?;
        Ok(Rule::Not(members))
    }

    fn parse_set_member(&mut self) -> Result<Rule, GrammarError> {
        let Some(lexeme) = self.bump() else {
            return Err(self.unexpected_end());
        };
        match lexeme.kind {
            TokenKind::Id => Ok(Rule::Symbol(self.text(&lexeme.span).to_string())),
            TokenKind::StringLiteral => self.literal(&lexeme),
            _ => Err(GrammarError::syntax(
                "sets may only contain token names and literals",
                lexeme.span,
            )),
        }
    }

    fn literal(&self, lexeme: &Lexeme) -> Result<Rule, GrammarError> {
        let text = self.text(&lexeme.span);
        let value = unescape(&text[1..text.len() - 1], LITERAL_ESCAPES);
        if value.is_empty() {
            return Err(GrammarError::syntax(
                "empty literals are not allowed",
                lexeme.span.clone(),
            ));
        }
        Ok(Rule::Literal(value))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token cursor
    // ─────────────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(lexeme)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Range<usize>> {
        if self.peek() == Some(kind) {
            self.bump().map(|t| t.span)
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Range<usize>, GrammarError> {
        if let Some(span) = self.eat(kind) {
            return Ok(span);
        }
        match self.tokens.get(self.pos) {
            Some(found) => Err(GrammarError::syntax(
                format!("expected {what}, found `{}`", self.text(&found.span)),
                found.span.clone(),
            )),
            None => Err(GrammarError::syntax(
                format!("expected {what}, found end of grammar"),
                self.source.len()..self.source.len(),
            )),
        }
    }

    fn unexpected_end(&self) -> GrammarError {
        GrammarError::syntax(
            "unexpected end of grammar",
            self.source.len()..self.source.len(),
        )
    }

    fn text(&self, span: &Range<usize>) -> &'s str {
        &self.source[span.clone()]
    }
}

fn is_token_rule(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}
