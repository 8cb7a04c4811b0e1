//! Follow sets: the tokens a rule can start with, split by the call path
//! that reaches them.
//!
//! A rule's sets are computed by walking from its start state without
//! consuming input. Rule calls descend into the callee and resume at the
//! call's follow state when the callee's stop state is reached; reaching the
//! rule's own stop state contributes `EPSILON`. A rule already on the path
//! is not entered again, which cuts left-recursive cycles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use caret_core::{EPSILON, IntervalSet, MIN_USER_TOKEN_TYPE, TokenType};
use caret_runtime::{Atn, RuleIndex, StateId, StateKind, Transition};

use super::error::CompletionError;
use super::predicate::{PredicateContext, PredicateEvaluator};

/// Tokens reachable along one call path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSetWithPath {
    pub intervals: IntervalSet,
    /// Rules entered on the way, outermost first.
    pub path: Vec<RuleIndex>,
    /// Tokens that must follow when `intervals` has exactly one member.
    pub following: Vec<TokenType>,
}

/// All follow sets of one start state, plus their union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowSetsHolder {
    pub sets: Vec<FollowSetWithPath>,
    pub combined: IntervalSet,
}

impl FollowSetsHolder {
    pub fn new(sets: Vec<FollowSetWithPath>) -> Self {
        let mut combined = IntervalSet::new();
        for set in &sets {
            combined.add_set(&set.intervals);
        }
        Self { sets, combined }
    }

    /// The rule can end without consuming a token.
    pub fn is_nullable(&self) -> bool {
        self.combined.contains(EPSILON)
    }
}

/// Follow sets keyed by rule start state.
///
/// Tagged with the fingerprint of the ATN it was filled from; binding it to
/// a different ATN empties it.
#[derive(Debug, Clone, Default)]
pub struct FollowSetCache {
    fingerprint: Option<u32>,
    holders: HashMap<StateId, Arc<FollowSetsHolder>>,
    rule_follow: Option<Arc<RuleFollowSets>>,
    computations: usize,
}

impl FollowSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to the ATN with `fingerprint`, dropping entries computed for
    /// another one.
    pub fn bind(&mut self, fingerprint: u32) {
        if self.fingerprint != Some(fingerprint) {
            self.clear();
            self.fingerprint = Some(fingerprint);
        }
    }

    pub fn fingerprint(&self) -> Option<u32> {
        self.fingerprint
    }

    pub fn get(&self, state: StateId) -> Option<Arc<FollowSetsHolder>> {
        self.holders.get(&state).cloned()
    }

    pub fn insert(&mut self, state: StateId, holder: Arc<FollowSetsHolder>) {
        self.computations += 1;
        self.holders.insert(state, holder);
    }

    pub(crate) fn rule_follow(&self) -> Option<Arc<RuleFollowSets>> {
        self.rule_follow.clone()
    }

    pub(crate) fn set_rule_follow(&mut self, sets: Arc<RuleFollowSets>) {
        self.rule_follow = Some(sets);
    }

    /// Number of holders computed into this cache over its lifetime.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn clear(&mut self) {
        self.holders.clear();
        self.rule_follow = None;
    }
}

/// Tokens that can come right after each rule at any of its call sites,
/// indexed by rule.
///
/// Predicates and precedence are ignored, so a set may hold tokens that never
/// follow in practice; it never misses one that does. A rule that ends before
/// the caret on a token outside its set cannot lead anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFollowSets {
    sets: Vec<IntervalSet>,
}

impl RuleFollowSets {
    pub fn compute(atn: &Atn) -> Self {
        let rules = atn.rule_count();

        let mut firsts = vec![IntervalSet::new(); rules];
        let mut nullable = vec![false; rules];
        let mut changed = true;
        while changed {
            changed = false;
            for rule in 0..rules {
                let Some(start) = atn.rule_start_state(rule as RuleIndex) else {
                    continue;
                };
                let (tokens, ends) = first_from(atn, start, &firsts, &nullable);
                if tokens != firsts[rule] || ends != nullable[rule] {
                    firsts[rule] = tokens;
                    nullable[rule] = ends;
                    changed = true;
                }
            }
        }

        // (caller, callee, tokens after the call, caller can end after it)
        let mut sites = Vec::new();
        for state in atn.states() {
            for t in &state.transitions {
                let Transition::Rule { rule, follow, .. } = *t else {
                    continue;
                };
                if rule as usize >= rules || state.rule as usize >= rules {
                    continue;
                }
                let (tokens, ends) = first_from(atn, follow, &firsts, &nullable);
                sites.push((state.rule as usize, rule as usize, tokens, ends));
            }
        }

        let mut sets = vec![IntervalSet::new(); rules];
        changed = true;
        while changed {
            changed = false;
            for (caller, callee, tokens, ends) in &sites {
                let mut next = sets[*callee].clone();
                next.add_set(tokens);
                if *ends {
                    let outer = sets[*caller].clone();
                    next.add_set(&outer);
                }
                if next != sets[*callee] {
                    sets[*callee] = next;
                    changed = true;
                }
            }
        }

        Self { sets }
    }

    pub fn get(&self, rule: RuleIndex) -> Option<&IntervalSet> {
        self.sets.get(rule as usize)
    }

    pub fn can_follow(&self, rule: RuleIndex, token: TokenType) -> bool {
        self.get(rule).is_some_and(|set| set.contains(token))
    }
}

/// Tokens consumable first from `state`, and whether the rule's stop state
/// is reachable without consuming anything.
fn first_from(
    atn: &Atn,
    state: StateId,
    firsts: &[IntervalSet],
    nullable: &[bool],
) -> (IntervalSet, bool) {
    let max = atn.max_token_type();
    let mut tokens = IntervalSet::new();
    let mut ends = false;
    let mut seen = HashSet::new();
    let mut stack = vec![state];

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(s) = atn.state(id) else {
            continue;
        };
        if s.kind == StateKind::RuleStop {
            ends = true;
            continue;
        }
        for t in &s.transitions {
            match t {
                Transition::Rule { rule, follow, .. } => {
                    let rule = *rule as usize;
                    if let Some(first) = firsts.get(rule) {
                        tokens.add_set(first);
                    }
                    if nullable.get(rule).copied().unwrap_or(false) {
                        stack.push(*follow);
                    }
                }
                Transition::Wildcard { .. } => tokens.add_range(MIN_USER_TOKEN_TYPE, max),
                Transition::Atom { .. } | Transition::Set { .. } | Transition::NotSet { .. } => {
                    if let Some(label) = t.label(max) {
                        tokens.add_set(&label);
                    }
                }
                Transition::Epsilon { .. }
                | Transition::Predicate { .. }
                | Transition::Precedence { .. } => stack.push(t.target()),
            }
        }
    }

    (tokens, ends)
}

/// Rule call entered while collecting: the callee and where to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Call {
    rule: RuleIndex,
    follow: StateId,
}

enum Step {
    Visit(StateId, Vec<Call>),
    Emit(FollowSetWithPath),
}

/// Compute the follow sets of the rule starting at `start`.
pub(crate) fn determine_follow_sets(
    atn: &Atn,
    start: StateId,
    predicates: &dyn PredicateEvaluator,
    is_ignored: &dyn Fn(TokenType) -> bool,
) -> Result<Vec<FollowSetWithPath>, CompletionError> {
    let max = atn.max_token_type();
    let mut sets = Vec::new();
    let mut seen: HashSet<(StateId, Vec<Call>)> = HashSet::new();
    let mut stack = vec![Step::Visit(start, Vec::new())];

    while let Some(step) = stack.pop() {
        let (id, calls) = match step {
            Step::Emit(set) => {
                sets.push(set);
                continue;
            }
            Step::Visit(id, calls) => (id, calls),
        };
        if !seen.insert((id, calls.clone())) {
            continue;
        }
        let state = atn.state(id).ok_or(CompletionError::MissingState(id))?;

        if state.kind == StateKind::RuleStop {
            match calls.split_last() {
                Some((call, outer)) => stack.push(Step::Visit(call.follow, outer.to_vec())),
                None => stack.push(Step::Emit(FollowSetWithPath {
                    intervals: IntervalSet::of(EPSILON),
                    path: Vec::new(),
                    following: Vec::new(),
                })),
            }
            continue;
        }

        let path = || calls.iter().map(|c| c.rule).collect::<Vec<_>>();

        // Pushed in reverse so transitions are handled in declaration order.
        for t in state.transitions.iter().rev() {
            match t {
                Transition::Rule {
                    target,
                    rule,
                    follow,
                    ..
                } => {
                    if calls.iter().any(|c| c.rule == *rule) {
                        continue;
                    }
                    let mut inner = calls.clone();
                    inner.push(Call {
                        rule: *rule,
                        follow: *follow,
                    });
                    stack.push(Step::Visit(*target, inner));
                }
                Transition::Predicate {
                    target, predicate, ..
                } => {
                    let info = atn
                        .predicate(*predicate)
                        .ok_or(CompletionError::UnknownPredicate(*predicate))?;
                    let context = PredicateContext {
                        rule: info.rule,
                        token_index: None,
                        lookahead: None,
                    };
                    let pass = predicates.evaluate(info, &context).map_err(|source| {
                        CompletionError::Predicate {
                            name: info.name.clone(),
                            source,
                        }
                    })?;
                    if pass {
                        stack.push(Step::Visit(*target, calls.clone()));
                    }
                }
                Transition::Epsilon { target } | Transition::Precedence { target, .. } => {
                    stack.push(Step::Visit(*target, calls.clone()));
                }
                Transition::Wildcard { .. } => {
                    stack.push(Step::Emit(FollowSetWithPath {
                        intervals: IntervalSet::of_range(MIN_USER_TOKEN_TYPE, max),
                        path: path(),
                        following: Vec::new(),
                    }));
                }
                Transition::Atom { .. } | Transition::Set { .. } | Transition::NotSet { .. } => {
                    let Some(label) = t.label(max) else {
                        continue;
                    };
                    if label.is_empty() {
                        continue;
                    }
                    let following = if label.single().is_some() {
                        following_tokens(atn, t.target(), is_ignored)
                    } else {
                        Vec::new()
                    };
                    stack.push(Step::Emit(FollowSetWithPath {
                        intervals: label.into_owned(),
                        path: path(),
                        following,
                    }));
                }
            }
        }
    }

    Ok(sets)
}

/// Tokens that must follow after reaching `state`: the chain of single
/// outgoing epsilon or atom transitions, stopping at the first choice, rule
/// call or ignored token.
pub(crate) fn following_tokens(
    atn: &Atn,
    state: StateId,
    is_ignored: &dyn Fn(TokenType) -> bool,
) -> Vec<TokenType> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut current = state;

    while seen.insert(current) {
        let Some(s) = atn.state(current) else {
            break;
        };
        let [t] = s.transitions.as_slice() else {
            break;
        };
        match *t {
            Transition::Epsilon { target } => current = target,
            Transition::Atom { target, token } if !is_ignored(token) => {
                result.push(token);
                current = target;
            }
            _ => break,
        }
    }

    result
}
