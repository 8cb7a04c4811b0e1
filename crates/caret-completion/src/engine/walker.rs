//! The completion walk.
//!
//! Rule invocations are [`WalkFrame`]s on a heap stack; inside each one an
//! explicit pipeline of packed (state, window position) pairs is drained. A
//! rule transition suspends the caller's frame mid-expansion and pushes the
//! callee; when the callee's pipeline runs dry its end positions continue at
//! the caller's follow state, unless the token there cannot follow the
//! callee anywhere in the grammar. Once a position reaches the caret,
//! token-consuming transitions become candidates instead of being matched:
//!
//! ```text
//! stat : ID '=' expr ';' ;      "x = |"
//!
//! stat @0  ID   consumes x      → @1
//!          '='  consumes =      → @2 (caret)
//!          expr @2              → offers ID, INT
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use caret_core::{EPSILON, IntervalSet, MIN_USER_TOKEN_TYPE, PackedPair, TokenSpan};
use caret_runtime::{Atn, RuleIndex, StateId, StateKind, Transition};

use super::cancel::CancellationToken;
use super::candidates::CandidatesCollection;
use super::collect::CollectStats;
use super::config::{Config, RulePreference};
use super::error::CompletionError;
use super::follow::{
    FollowSetCache, FollowSetsHolder, RuleFollowSets, determine_follow_sets, following_tokens,
};
use super::frame::{CallStack, Frame, Resume, WalkFrame};
use super::predicate::PredicateContext;
use super::shortcut::{CaretEvent, ShortcutKey, ShortcutMap, TokenOffer};
use super::trace::Tracer;
use super::window::TokenWindow;

pub(crate) struct Walker<'w, T: Tracer> {
    atn: &'w Atn,
    config: &'w Config,
    window: &'w TokenWindow,
    follow_sets: &'w mut FollowSetCache,
    tracer: &'w mut T,
    cancel: &'w CancellationToken,
    stack: CallStack,
    /// Rules being walked, innermost last.
    walks: Vec<WalkFrame>,
    shortcuts: ShortcutMap,
    candidates: CandidatesCollection,
    stats: CollectStats,
    fuel: u32,
}

/// A rule transition met while expanding a state.
struct RuleCall {
    rule: RuleIndex,
    index: usize,
    precedence: u32,
    follow: StateId,
}

/// How a rule invocation was handled.
enum Invocation {
    /// Resolved without a walk; these are its end positions.
    Done(BTreeSet<usize>),
    /// A walk has to run first.
    Walk(WalkFrame),
}

impl<'w, T: Tracer> Walker<'w, T> {
    pub fn new(
        atn: &'w Atn,
        config: &'w Config,
        window: &'w TokenWindow,
        follow_sets: &'w mut FollowSetCache,
        tracer: &'w mut T,
        cancel: &'w CancellationToken,
    ) -> Self {
        Self {
            atn,
            config,
            window,
            follow_sets,
            tracer,
            cancel,
            stack: CallStack::new(),
            walks: Vec::new(),
            shortcuts: ShortcutMap::new(),
            candidates: CandidatesCollection::new(),
            stats: CollectStats::default(),
            fuel: config.limits.exec_fuel,
        }
    }

    /// Walk `rule` from the start of the window.
    pub fn run(
        mut self,
        rule: RuleIndex,
    ) -> (Result<CandidatesCollection, CompletionError>, CollectStats) {
        let result = self.execute(rule);
        let stats = self.stats;
        (result.map(|_| self.candidates), stats)
    }

    fn execute(&mut self, rule: RuleIndex) -> Result<(), CompletionError> {
        match self.invoke(rule, 0, 0, None)? {
            Invocation::Done(_) => return Ok(()),
            Invocation::Walk(frame) => self.walks.push(frame),
        }

        while let Some(mut frame) = self.walks.pop() {
            match self.advance(&mut frame)? {
                Some(call) => {
                    self.walks.push(frame);
                    match self.invoke(call.rule, call.index, call.precedence, Some(call.follow))? {
                        Invocation::Done(ends) => self.resume_caller(call.rule, call.follow, &ends),
                        Invocation::Walk(callee) => self.walks.push(callee),
                    }
                }
                None => self.finish(frame),
            }
        }
        Ok(())
    }

    /// Continue the innermost suspended caller at `follow` for each end
    /// of `callee`.
    fn resume_caller(&mut self, callee: RuleIndex, follow: StateId, ends: &BTreeSet<usize>) {
        let caret = self.window.caret_index();
        let rule_follow = match ends.first() {
            Some(&first) if first < caret => Some(self.rule_follow()),
            _ => None,
        };
        let window = self.window;
        let Some(caller) = self.walks.last_mut() else {
            return;
        };
        for &end in ends {
            // Before the caret the next token has to be consumed by someone.
            if end < caret
                && !rule_follow
                    .as_ref()
                    .is_some_and(|f| f.can_follow(callee, window.token_type(end)))
            {
                continue;
            }
            caller.pipeline.push(PackedPair::new(follow, end as u32));
        }
    }

    /// Start one rule invocation at window position `index`.
    fn invoke(
        &mut self,
        rule: RuleIndex,
        index: usize,
        precedence: u32,
        return_state: Option<StateId>,
    ) -> Result<Invocation, CompletionError> {
        let limit = self.config.limits.recursion_limit;
        if self.stack.depth() >= limit as usize {
            return Err(CompletionError::RecursionLimitExceeded(limit));
        }
        let start = self
            .atn
            .rule_start_state(rule)
            .ok_or(CompletionError::UnknownRule(rule))?;

        let at_caret = index >= self.window.caret_index();
        self.tracer.trace_enter_rule(rule, index, at_caret);
        let ends = if at_caret {
            self.rule_at_caret(rule, start, index)?
        } else {
            match self.rule_before_caret(rule, start, index, precedence)? {
                Some(ends) => ends,
                None => {
                    let frame = WalkFrame::new(rule, start, index, precedence, return_state);
                    self.stats.rule_walks += 1;
                    self.stack.push(rule, index);
                    self.shortcuts.enter(frame.key, self.stack.depth() - 1);
                    return Ok(Invocation::Walk(frame));
                }
            }
        };
        self.tracer.trace_exit_rule(rule, &ends);
        Ok(Invocation::Done(ends))
    }

    /// Close a walk whose pipeline is drained, handing its end positions
    /// to the caller.
    fn finish(&mut self, frame: WalkFrame) {
        self.stack.pop();
        self.shortcuts.leave(&frame.ends);
        self.tracer.trace_exit_rule(frame.rule, &frame.ends);
        if let Some(follow) = frame.return_state {
            self.resume_caller(frame.rule, follow, &frame.ends);
        }
    }

    /// Report the rule (if preferred) or everything it can start with.
    fn rule_at_caret(
        &mut self,
        rule: RuleIndex,
        start: StateId,
        index: usize,
    ) -> Result<BTreeSet<usize>, CompletionError> {
        let follow = self.follow_sets(start)?;
        self.stack.push(rule, index);

        if self.config.is_preferred(rule) {
            self.record(CaretEvent {
                frames: self.stack.frames().into(),
                offer: None,
            });
        } else {
            for set in &follow.sets {
                if set.intervals.contains(EPSILON) {
                    continue;
                }
                let path: Vec<Frame> = set
                    .path
                    .iter()
                    .map(|&rule| Frame { rule, start: index })
                    .collect();
                let offer = TokenOffer {
                    set: set.intervals.clone(),
                    following: set.following.clone(),
                };
                self.record(CaretEvent {
                    frames: self.stack.extended(&path).into(),
                    offer: Some(Arc::new(offer)),
                });
            }
        }

        self.stack.pop();

        // A rule that can be empty lets the caller continue at the caret.
        let mut ends = BTreeSet::new();
        if follow.is_nullable() {
            ends.insert(index);
        }
        Ok(ends)
    }

    /// Resolve a rule before the caret without walking it, if possible.
    /// `None` means it has to be walked.
    fn rule_before_caret(
        &mut self,
        rule: RuleIndex,
        start: StateId,
        index: usize,
        precedence: u32,
    ) -> Result<Option<BTreeSet<usize>>, CompletionError> {
        let key = ShortcutKey::new(rule, index, precedence);
        if let Some(outcome) = self.shortcuts.get(key) {
            self.stats.shortcut_hits += 1;
            self.tracer.trace_shortcut(rule, index);
            for event in &outcome.events {
                self.record(CaretEvent {
                    frames: self.stack.extended(event.frames()).into(),
                    offer: event.offer().cloned(),
                });
            }
            return Ok(Some(outcome.ends.clone()));
        }

        // Re-entered at the same position without consuming anything:
        // left recursion, which the outer invocation already covers.
        if self.shortcuts.cut(key) {
            return Ok(Some(BTreeSet::new()));
        }

        let follow = self.follow_sets(start)?;
        let current = self.window.token_type(index);
        if !follow.is_nullable() && !follow.combined.contains(current) {
            self.tracer.trace_pruned(rule, index, current);
            return Ok(Some(BTreeSet::new()));
        }
        Ok(None)
    }

    /// Drain `frame`'s pipeline until it is empty or a rule transition
    /// needs the callee walked first.
    fn advance(&mut self, frame: &mut WalkFrame) -> Result<Option<RuleCall>, CompletionError> {
        let atn = self.atn;
        let config = self.config;
        let caret = self.window.caret_index();
        let max = atn.max_token_type();

        loop {
            let (id, index, first) = match frame.resume.take() {
                Some(resume) => (resume.state, resume.index, resume.next),
                None => {
                    let Some(entry) = frame.pipeline.pop() else {
                        return Ok(None);
                    };
                    if !frame.seen.insert(entry) {
                        continue;
                    }
                    self.tick()?;

                    let (id, index) = (entry.high(), entry.low() as usize);
                    let state = atn.state(id).ok_or(CompletionError::MissingState(id))?;
                    self.stats.states_processed += 1;
                    self.tracer.trace_state(id, index);

                    if state.kind == StateKind::RuleStop {
                        frame.ends.insert(index);
                        continue;
                    }
                    (id, index, 0)
                }
            };
            let state = atn.state(id).ok_or(CompletionError::MissingState(id))?;

            let at_caret = index >= caret;
            let current = self.window.token_type(index);
            let here = |target: StateId| PackedPair::new(target, index as u32);
            let next = |target: StateId| PackedPair::new(target, index as u32 + 1);

            for (i, t) in state.transitions.iter().enumerate().skip(first) {
                match *t {
                    Transition::Rule {
                        target,
                        rule,
                        follow,
                        precedence,
                    } => {
                        if atn.rule_start_state(rule) != Some(target) {
                            return Err(CompletionError::DanglingRuleCall { state: id, rule });
                        }
                        frame.resume = Some(Resume {
                            state: id,
                            index,
                            next: i + 1,
                        });
                        return Ok(Some(RuleCall {
                            rule,
                            index,
                            precedence,
                            follow,
                        }));
                    }
                    Transition::Predicate {
                        target, predicate, ..
                    } => {
                        if self.check_predicate(predicate, index)? {
                            frame.pipeline.push(here(target));
                        }
                    }
                    Transition::Precedence { target, precedence } => {
                        if precedence >= frame.precedence {
                            frame.pipeline.push(here(target));
                        }
                    }
                    Transition::Epsilon { target } => {
                        if at_caret && !config.preferred.is_empty() {
                            self.record(CaretEvent {
                                frames: self.stack.frames().into(),
                                offer: None,
                            });
                        }
                        frame.pipeline.push(here(target));
                    }
                    Transition::Wildcard { target } => {
                        if at_caret {
                            let offer = TokenOffer {
                                set: IntervalSet::of_range(MIN_USER_TOKEN_TYPE, max),
                                following: Vec::new(),
                            };
                            self.record(CaretEvent {
                                frames: self.stack.frames().into(),
                                offer: Some(Arc::new(offer)),
                            });
                        } else {
                            frame.pipeline.push(next(target));
                        }
                    }
                    Transition::Atom { .. } | Transition::Set { .. } | Transition::NotSet { .. } => {
                        let Some(label) = t.label(max) else {
                            continue;
                        };
                        if label.is_empty() {
                            continue;
                        }
                        if at_caret {
                            let following = if label.single().is_some() {
                                following_tokens(atn, t.target(), &|tt| config.is_ignored(tt))
                            } else {
                                Vec::new()
                            };
                            let offer = TokenOffer {
                                set: label.into_owned(),
                                following,
                            };
                            self.record(CaretEvent {
                                frames: self.stack.frames().into(),
                                offer: Some(Arc::new(offer)),
                            });
                        } else if label.contains(current) {
                            frame.pipeline.push(next(t.target()));
                        }
                    }
                }
            }
        }
    }

    fn follow_sets(&mut self, start: StateId) -> Result<Arc<FollowSetsHolder>, CompletionError> {
        if let Some(holder) = self.follow_sets.get(start) {
            return Ok(holder);
        }
        let config = self.config;
        let sets = determine_follow_sets(self.atn, start, config.predicates.as_ref(), &|t| {
            config.is_ignored(t)
        })?;
        let holder = Arc::new(FollowSetsHolder::new(sets));
        self.follow_sets.insert(start, Arc::clone(&holder));
        self.stats.follow_set_computations += 1;
        self.tracer.trace_follow_sets(start, &holder);
        Ok(holder)
    }

    fn rule_follow(&mut self) -> Arc<RuleFollowSets> {
        if let Some(sets) = self.follow_sets.rule_follow() {
            return sets;
        }
        let sets = Arc::new(RuleFollowSets::compute(self.atn));
        self.follow_sets.set_rule_follow(Arc::clone(&sets));
        sets
    }

    fn check_predicate(&self, predicate: u32, index: usize) -> Result<bool, CompletionError> {
        let info = self
            .atn
            .predicate(predicate)
            .ok_or(CompletionError::UnknownPredicate(predicate))?;
        let context = PredicateContext {
            rule: info.rule,
            token_index: Some(index),
            lookahead: self.window.token(index),
        };
        self.config
            .predicates
            .evaluate(info, &context)
            .map_err(|source| CompletionError::Predicate {
                name: info.name.clone(),
                source,
            })
    }

    fn tick(&mut self) -> Result<(), CompletionError> {
        if self.fuel == 0 {
            return Err(CompletionError::ExecFuelExhausted(
                self.config.limits.exec_fuel,
            ));
        }
        self.fuel -= 1;
        if self.cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }
        Ok(())
    }

    /// Apply a caret recording and remember it for the enclosing walks.
    fn record(&mut self, event: CaretEvent) {
        self.apply(&event);
        self.shortcuts.record(event);
    }

    fn apply(&mut self, event: &CaretEvent) {
        if self.translate(&event.frames) {
            return;
        }
        let Some(offer) = &event.offer else {
            return;
        };
        for token in offer.set.iter() {
            if token == EPSILON || self.config.is_ignored(token) {
                continue;
            }
            self.tracer.trace_token_candidate(token, &offer.following);
            self.candidates.add_token(token, offer.following.clone());
        }
    }

    /// Record the preferred rule on `frames`, if any. Returns whether one
    /// was found.
    fn translate(&mut self, frames: &[Frame]) -> bool {
        let config = self.config;
        if config.preferred.is_empty() {
            return false;
        }
        let is_preferred = |f: &Frame| config.is_preferred(f.rule);
        let found = match config.preference {
            RulePreference::Innermost => frames.iter().rposition(is_preferred),
            RulePreference::Outermost => frames.iter().position(is_preferred),
        };
        let Some(i) = found else {
            return false;
        };

        let frame = frames[i];
        let path: Vec<RuleIndex> = frames[..i].iter().map(|f| f.rule).collect();
        let span = TokenSpan::new(
            self.window.stream_index(frame.start) as u32,
            self.window.stream_index(self.window.caret_index()) as u32,
        );
        self.tracer.trace_rule_candidate(frame.rule, &path);
        self.candidates.add_rule(frame.rule, path);
        self.candidates.record_rule_position(frame.rule, span);
        true
    }
}
