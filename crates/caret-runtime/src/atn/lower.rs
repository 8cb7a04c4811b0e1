//! Grammar → ATN lowering.
//!
//! Token types are assigned first: literals used directly in parser rules
//! (in order of first appearance), then token rules in definition order.
//! Every parser rule gets its start and stop state up front so calls can
//! target rules defined later.
//!
//! Direct left recursion is rewritten the way precedence-climbing parsers
//! do it:
//!
//! ```text
//! e : e '*' e | e '+' e | '-' e | ID ;
//!
//! e : ( '-' e[2] | ID ) ( precpred(4) '*' e[5] | precpred(3) '+' e[4] )* ;
//! ```
//!
//! Alternative `k` of `n` has precedence `n - k`. Suffix alternatives are
//! guarded by a precedence transition and call the trailing `e` one level
//! higher (left associative); prefix alternatives call it at their own level.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use caret_core::{EOF, Grammar, IntervalSet, Rule, TokenPattern, TokenType, Vocabulary};

use super::build::{AtnBuilder, Fragment};
use super::{Atn, PredicateInfo, RuleIndex, StateId, StateKind};
use crate::error::AtnError;

impl Atn {
    /// Lower a grammar and verify the result.
    pub fn from_grammar(grammar: &Grammar) -> Result<Atn, AtnError> {
        let tokens = TokenTable::new(grammar);
        let rules: IndexMap<&str, RuleIndex> = grammar
            .rules
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.as_str(), i as RuleIndex))
            .collect();

        let mut builder = AtnBuilder::new();
        let mut rule_start = Vec::with_capacity(rules.len());
        let mut rule_stop = Vec::with_capacity(rules.len());
        for &index in rules.values() {
            builder.set_rule(index);
            rule_start.push(builder.add_state(StateKind::RuleStart));
            rule_stop.push(builder.add_state(StateKind::RuleStop));
        }

        let mut lowering = Lowering {
            tokens: &tokens,
            rules: &rules,
            rule_start: &rule_start,
            builder,
            predicates: Vec::new(),
            current: 0,
            current_name: "",
        };

        for (i, (name, body)) in grammar.rules.iter().enumerate() {
            let index = i as RuleIndex;
            lowering.current = index;
            lowering.current_name = name;
            lowering.builder.set_rule(index);

            let body = lowering.lower_rule(body)?;
            lowering.builder.epsilon(rule_start[i], body.entry);
            lowering.builder.epsilon(body.exit, rule_stop[i]);
        }

        let Lowering {
            builder,
            predicates,
            ..
        } = lowering;
        let rule_names = grammar.rules.iter().map(|(n, _)| n.clone()).collect();
        let atn = builder.finish(
            grammar.name.clone(),
            rule_names,
            rule_start,
            rule_stop,
            predicates,
            tokens.vocabulary,
        );
        atn.verify()?;
        Ok(atn)
    }
}

/// Token type assignment for one grammar.
struct TokenTable {
    /// Unquoted literal text → type (implicit literals and literal token rules).
    literals: IndexMap<String, TokenType>,
    /// Token rule name → type.
    names: IndexMap<String, TokenType>,
    vocabulary: Vocabulary,
}

impl TokenTable {
    fn new(grammar: &Grammar) -> Self {
        let defined: HashSet<&str> = grammar
            .tokens
            .iter()
            .filter_map(|t| match &t.pattern {
                TokenPattern::Literal(text) => Some(text.as_str()),
                TokenPattern::Regex(_) => None,
            })
            .collect();

        let mut implicit = IndexSet::new();
        for (_, rule) in &grammar.rules {
            collect_literals(rule, &mut implicit);
        }
        implicit.retain(|text| !defined.contains(text));

        let mut literal_names = vec![None];
        let mut symbolic_names = vec![None];
        let mut literals = IndexMap::new();
        let mut names = IndexMap::new();

        for text in implicit {
            let t = literal_names.len() as TokenType;
            literal_names.push(Some(quote(text)));
            symbolic_names.push(None);
            literals.insert(text.to_string(), t);
        }

        for def in &grammar.tokens {
            let t = literal_names.len() as TokenType;
            match &def.pattern {
                TokenPattern::Literal(text) => {
                    literal_names.push(Some(quote(text)));
                    literals.entry(text.clone()).or_insert(t);
                }
                TokenPattern::Regex(_) => literal_names.push(None),
            }
            symbolic_names.push(Some(def.name.clone()));
            names.insert(def.name.clone(), t);
        }

        Self {
            literals,
            names,
            vocabulary: Vocabulary::new(literal_names, symbolic_names),
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{text}'")
}

fn collect_literals<'r>(rule: &'r Rule, out: &mut IndexSet<&'r str>) {
    match rule {
        Rule::Literal(text) => {
            out.insert(text);
        }
        Rule::Seq(items) | Rule::Choice(items) | Rule::Not(items) => {
            for item in items {
                collect_literals(item, out);
            }
        }
        Rule::Repeat(inner) | Rule::Repeat1(inner) | Rule::Optional(inner) => {
            collect_literals(inner, out);
        }
        Rule::Blank | Rule::Symbol(_) | Rule::Wildcard | Rule::Predicate(_) => {}
    }
}

struct Lowering<'a> {
    tokens: &'a TokenTable,
    rules: &'a IndexMap<&'a str, RuleIndex>,
    rule_start: &'a [StateId],
    builder: AtnBuilder,
    predicates: Vec<PredicateInfo>,
    current: RuleIndex,
    current_name: &'a str,
}

impl Lowering<'_> {
    fn lower_rule(&mut self, body: &Rule) -> Result<Fragment, AtnError> {
        let alternatives = body.alternatives();
        let (recursive, primary) = split_left_recursive(self.current_name, alternatives);
        if recursive.is_empty() {
            return self.lower(body);
        }
        if primary.is_empty() {
            return Err(AtnError::NoPrimaryAlternative {
                rule: self.current_name.to_string(),
            });
        }

        let n = alternatives.len();
        let precedence = |k: usize| (n - k) as u32;

        let mut primary_fragments = Vec::with_capacity(primary.len());
        for (k, alt) in primary {
            primary_fragments.push(self.lower_elements(alt.elements(), precedence(k))?);
        }
        let primary_block = self.builder.alternation(&primary_fragments);

        let mut suffix_fragments = Vec::with_capacity(recursive.len());
        for (k, alt) in recursive {
            let level = precedence(k);
            let guard = self.builder.precedence_fragment(level);
            let rest = self.lower_elements(&alt.elements()[1..], level + 1)?;
            suffix_fragments.push(self.builder.sequence(&[guard, rest]));
        }
        let suffixes = self.builder.alternation(&suffix_fragments);
        let suffix_loop = self.builder.zero_or_more(suffixes);

        Ok(self.builder.sequence(&[primary_block, suffix_loop]))
    }

    /// Lower a sequence whose trailing self-reference (if any) is called at
    /// `trailing_precedence`.
    fn lower_elements(
        &mut self,
        elements: &[Rule],
        trailing_precedence: u32,
    ) -> Result<Fragment, AtnError> {
        let mut fragments = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let trailing = i + 1 == elements.len();
            let fragment = if trailing && element.is_symbol(self.current_name) {
                self.symbol(self.current_name, trailing_precedence)?
            } else {
                self.lower(element)?
            };
            fragments.push(fragment);
        }
        Ok(self.builder.sequence(&fragments))
    }

    fn lower(&mut self, rule: &Rule) -> Result<Fragment, AtnError> {
        match rule {
            Rule::Blank => Ok(self.builder.epsilon_fragment()),
            Rule::Literal(text) => {
                let token = self.literal(text)?;
                Ok(self.builder.atom_fragment(token))
            }
            Rule::Symbol(name) => self.symbol(name, 0),
            Rule::Seq(items) => {
                let fragments = self.lower_all(items)?;
                Ok(self.builder.sequence(&fragments))
            }
            Rule::Choice(items) => {
                let fragments = self.lower_all(items)?;
                Ok(self.builder.alternation(&fragments))
            }
            Rule::Repeat(inner) => {
                let inner = self.lower(inner)?;
                Ok(self.builder.zero_or_more(inner))
            }
            Rule::Repeat1(inner) => {
                let inner = self.lower(inner)?;
                Ok(self.builder.one_or_more(inner))
            }
            Rule::Optional(inner) => {
                let inner = self.lower(inner)?;
                Ok(self.builder.optional(inner))
            }
            Rule::Wildcard => Ok(self.builder.wildcard_fragment()),
            Rule::Not(members) => {
                let set = self.token_set(members)?;
                if set.is_empty() {
                    return Err(AtnError::EmptyNotSet {
                        rule: self.current_name.to_string(),
                    });
                }
                Ok(self.builder.not_set_fragment(set))
            }
            Rule::Predicate(name) => {
                let index = self.predicates.len() as u32;
                self.predicates.push(PredicateInfo {
                    rule: self.current,
                    name: name.clone(),
                });
                Ok(self.builder.predicate_fragment(index))
            }
        }
    }

    fn lower_all(&mut self, items: &[Rule]) -> Result<Vec<Fragment>, AtnError> {
        items.iter().map(|item| self.lower(item)).collect()
    }

    fn symbol(&mut self, name: &str, precedence: u32) -> Result<Fragment, AtnError> {
        if let Some(&rule) = self.rules.get(name) {
            let start = self.rule_start[rule as usize];
            return Ok(self.builder.rule_fragment(rule, start, precedence));
        }
        let token = self.token(name)?;
        Ok(self.builder.atom_fragment(token))
    }

    fn token(&self, name: &str) -> Result<TokenType, AtnError> {
        if let Some(&t) = self.tokens.names.get(name) {
            return Ok(t);
        }
        if name == "EOF" {
            return Ok(EOF);
        }
        Err(AtnError::UndefinedSymbol {
            rule: self.current_name.to_string(),
            name: name.to_string(),
        })
    }

    fn literal(&self, text: &str) -> Result<TokenType, AtnError> {
        self.tokens
            .literals
            .get(text)
            .copied()
            .ok_or_else(|| AtnError::UndefinedSymbol {
                rule: self.current_name.to_string(),
                name: quote(text),
            })
    }

    fn token_set(&self, members: &[Rule]) -> Result<IntervalSet, AtnError> {
        let mut set = IntervalSet::new();
        for member in members {
            let t = match member {
                Rule::Literal(text) => self.literal(text)?,
                Rule::Symbol(name) if self.rules.contains_key(name.as_str()) => {
                    return Err(AtnError::InvalidSetElement {
                        rule: self.current_name.to_string(),
                        name: name.clone(),
                    });
                }
                Rule::Symbol(name) => self.token(name)?,
                other => {
                    return Err(AtnError::InvalidSetElement {
                        rule: self.current_name.to_string(),
                        name: format!("{other:?}"),
                    });
                }
            };
            set.add(t);
        }
        Ok(set)
    }
}

/// Split alternatives into (left-recursive, primary), keeping their positions.
fn split_left_recursive<'r>(
    name: &str,
    alternatives: &'r [Rule],
) -> (Vec<(usize, &'r Rule)>, Vec<(usize, &'r Rule)>) {
    alternatives
        .iter()
        .enumerate()
        .partition(|(_, alt)| alt.elements().first().is_some_and(|e| e.is_symbol(name)))
}
