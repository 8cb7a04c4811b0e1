//! Result of a completion request.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use caret_core::{TokenSpan, TokenType};
use caret_runtime::{Atn, RuleIndex};

/// Token and rule candidates at the caret.
///
/// All three maps are ordered, so two collections with the same contents
/// compare equal however they were filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatesCollection {
    /// Token type → tokens that must follow it (empty when not unique).
    tokens: BTreeMap<TokenType, Vec<TokenType>>,
    /// Preferred rule → distinct call paths (outermost rule first).
    rules: BTreeMap<RuleIndex, BTreeSet<Vec<RuleIndex>>>,
    /// Preferred rule → stream positions from its start to the caret.
    rule_positions: BTreeMap<RuleIndex, TokenSpan>,
}

impl CandidatesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token candidate. A token offered with two different following
    /// lists keeps an empty one.
    pub fn add_token(&mut self, token: TokenType, following: Vec<TokenType>) {
        match self.tokens.entry(token) {
            Entry::Vacant(e) => {
                e.insert(following);
            }
            Entry::Occupied(mut e) => {
                if *e.get() != following {
                    e.get_mut().clear();
                }
            }
        }
    }

    /// Add a rule candidate reached through `path`. Returns false when that
    /// path was already recorded.
    pub fn add_rule(&mut self, rule: RuleIndex, path: Vec<RuleIndex>) -> bool {
        self.rules.entry(rule).or_default().insert(path)
    }

    /// Widen the recorded span of `rule` to cover `span`.
    pub fn record_rule_position(&mut self, rule: RuleIndex, span: TokenSpan) {
        self.rule_positions
            .entry(rule)
            .and_modify(|s| *s = s.union(span))
            .or_insert(span);
    }

    pub fn tokens(&self) -> &BTreeMap<TokenType, Vec<TokenType>> {
        &self.tokens
    }

    pub fn rules(&self) -> &BTreeMap<RuleIndex, BTreeSet<Vec<RuleIndex>>> {
        &self.rules
    }

    pub fn rule_positions(&self) -> &BTreeMap<RuleIndex, TokenSpan> {
        &self.rule_positions
    }

    pub fn token_types(&self) -> impl Iterator<Item = TokenType> + '_ {
        self.tokens.keys().copied()
    }

    pub fn following(&self, token: TokenType) -> Option<&[TokenType]> {
        self.tokens.get(&token).map(Vec::as_slice)
    }

    pub fn contains_token(&self, token: TokenType) -> bool {
        self.tokens.contains_key(&token)
    }

    pub fn contains_rule(&self, rule: RuleIndex) -> bool {
        self.rules.contains_key(&rule)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.rules.is_empty() && self.rule_positions.is_empty()
    }

    /// Text form with token and rule names, one candidate per line.
    ///
    /// ```text
    /// token ID → '='
    /// rule expr [stat]
    /// position expr 2..2
    /// ```
    pub fn dump(&self, atn: &Atn) -> String {
        let vocabulary = atn.vocabulary();
        let mut out = String::new();

        for (&token, following) in &self.tokens {
            write!(out, "token {}", vocabulary.display_name(token)).expect("String write never fails");
            if !following.is_empty() {
                let names: Vec<_> = following.iter().map(|&t| vocabulary.display_name(t)).collect();
                write!(out, " → {}", names.join(" ")).expect("String write never fails");
            }
            out.push('\n');
        }

        for (&rule, paths) in &self.rules {
            for path in paths {
                let names: Vec<_> = path.iter().map(|&r| atn.rule_display(r)).collect();
                writeln!(out, "rule {} [{}]", atn.rule_display(rule), names.join(" "))
                    .expect("String write never fails");
            }
        }

        for (&rule, span) in &self.rule_positions {
            writeln!(out, "position {} {span}", atn.rule_display(rule))
                .expect("String write never fails");
        }

        out
    }
}
