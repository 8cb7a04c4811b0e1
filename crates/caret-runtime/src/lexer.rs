//! Maximal-munch lexer built from a grammar's token rules.
//!
//! Candidates are tried at every position; the longest match wins and ties
//! go to the rule with the lower token type, so implicit literals beat token
//! rules and earlier token rules beat later ones.

use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::{Anchored, Input, MatchKind};

use caret_core::{Channel, EOF, Grammar, TokenPattern, TokenType, Vocabulary};

use crate::error::LexError;
use crate::token_stream::Token;

#[derive(Debug)]
enum Matcher {
    Literal(String),
    Regex(dense::DFA<Vec<u32>>),
}

impl Matcher {
    /// Length of the match starting at `pos`, if any.
    fn match_len(&self, text: &str, pos: usize) -> Option<usize> {
        match self {
            Matcher::Literal(lit) => text[pos..].starts_with(lit.as_str()).then_some(lit.len()),
            Matcher::Regex(dfa) => {
                let input = Input::new(text).range(pos..).anchored(Anchored::Yes);
                // Anchored search on a DFA built for anchored starts cannot fail.
                let m = dfa.try_search_fwd(&input).ok()??;
                Some(m.offset() - pos)
            }
        }
    }
}

#[derive(Debug)]
struct LexRule {
    token_type: TokenType,
    channel: Channel,
    matcher: Matcher,
}

#[derive(Debug)]
pub struct Lexer {
    rules: Vec<LexRule>,
}

impl Lexer {
    pub fn new(grammar: &Grammar, vocabulary: &Vocabulary) -> Result<Self, LexError> {
        let mut rules = Vec::new();

        // Implicit literals: a literal name without a symbolic one.
        for t in 1..=vocabulary.max_token_type() {
            if vocabulary.symbolic_name(t).is_some() {
                continue;
            }
            if let Some(quoted) = vocabulary.literal_name(t) {
                rules.push(LexRule {
                    token_type: t,
                    channel: Channel::Default,
                    matcher: Matcher::Literal(quoted[1..quoted.len() - 1].to_string()),
                });
            }
        }

        for def in &grammar.tokens {
            let token_type = vocabulary
                .token_type(&def.name)
                .filter(|&t| t != EOF)
                .ok_or_else(|| LexError::UnassignedToken {
                    token: def.name.clone(),
                })?;
            let matcher = match &def.pattern {
                TokenPattern::Literal(text) => Matcher::Literal(text.clone()),
                TokenPattern::Regex(pattern) => Matcher::Regex(compile(&def.name, pattern)?),
            };
            rules.push(LexRule {
                token_type,
                channel: def.channel,
                matcher,
            });
        }

        rules.sort_by_key(|r| r.token_type);
        Ok(Self { rules })
    }

    /// Tokenize `text`. Skipped tokens are dropped; the result always ends
    /// with an EOF token.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some((rule, len)) = self.longest_match(text, pos) else {
                let text = text[pos..].chars().next().map(String::from).unwrap_or_default();
                return Err(LexError::UnexpectedInput { offset: pos, text });
            };
            let span = pos..pos + len;
            pos += len;
            if rule.channel == Channel::Skip {
                continue;
            }
            tokens.push(Token {
                token_type: rule.token_type,
                index: tokens.len(),
                channel: rule.channel,
                text: text[span.clone()].to_string(),
                span,
            });
        }

        tokens.push(Token {
            token_type: EOF,
            index: tokens.len(),
            channel: Channel::Default,
            span: text.len()..text.len(),
            text: String::new(),
        });
        Ok(tokens)
    }

    fn longest_match(&self, text: &str, pos: usize) -> Option<(&LexRule, usize)> {
        let mut best: Option<(&LexRule, usize)> = None;
        for rule in &self.rules {
            let Some(len) = rule.matcher.match_len(text, pos) else {
                continue;
            };
            if len == 0 {
                continue;
            }
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((rule, len));
            }
        }
        best
    }
}

fn compile(token: &str, pattern: &str) -> Result<dense::DFA<Vec<u32>>, LexError> {
    dense::DFA::builder()
        .configure(
            dense::DFA::config()
                .start_kind(StartKind::Anchored)
                .match_kind(MatchKind::All),
        )
        .build(pattern)
        .map_err(|e| LexError::InvalidPattern {
            token: token.to_string(),
            message: e.to_string(),
        })
}
