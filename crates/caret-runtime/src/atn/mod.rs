//! Augmented transition network of a grammar.
//!
//! States are stored in a flat vector and referenced by `StateId`. Every
//! parser rule owns a start and a stop state; rule invocations are
//! `Transition::Rule` edges into the callee's start state that name the
//! state to resume at. The network is read-only once built.

mod build;
mod dump;
mod lower;
mod serialize;
#[cfg(feature = "testing")]
mod testing;
mod verify;


use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use caret_core::{IntervalSet, MIN_USER_TOKEN_TYPE, TokenType, Vocabulary};

pub use build::{AtnBuilder, Fragment};
pub use dump::AtnPrinter;

/// Index into `Atn::states`.
pub type StateId = u32;

/// Index of a parser rule, in definition order.
pub type RuleIndex = u32;

/// Structural role of a state. Only `RuleStart`/`RuleStop` carry meaning for
/// completion; the rest describe where the state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Basic,
    RuleStart,
    RuleStop,
    BlockStart,
    BlockEnd,
    StarLoopEntry,
    StarLoopBack,
    PlusBlockStart,
    PlusLoopBack,
    LoopEnd,
}

impl StateKind {
    pub fn label(self) -> &'static str {
        match self {
            StateKind::Basic => "basic",
            StateKind::RuleStart => "rule-start",
            StateKind::RuleStop => "rule-stop",
            StateKind::BlockStart => "block-start",
            StateKind::BlockEnd => "block-end",
            StateKind::StarLoopEntry => "star-loop-entry",
            StateKind::StarLoopBack => "star-loop-back",
            StateKind::PlusBlockStart => "plus-block-start",
            StateKind::PlusLoopBack => "plus-loop-back",
            StateKind::LoopEnd => "loop-end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Epsilon {
        target: StateId,
    },
    /// Matches one token type.
    Atom {
        target: StateId,
        token: TokenType,
    },
    /// Matches any member of `set`.
    Set {
        target: StateId,
        set: IntervalSet,
    },
    /// Matches any user token type not in `set`.
    NotSet {
        target: StateId,
        set: IntervalSet,
    },
    /// Matches any user token type.
    Wildcard {
        target: StateId,
    },
    /// Invokes `rule` (whose start state is `target`), resuming at `follow`.
    Rule {
        target: StateId,
        rule: RuleIndex,
        follow: StateId,
        precedence: u32,
    },
    /// Semantic predicate, evaluated by the host.
    Predicate {
        target: StateId,
        rule: RuleIndex,
        predicate: u32,
    },
    /// Passes when `precedence` is at least the precedence of the innermost
    /// invocation of the enclosing rule.
    Precedence {
        target: StateId,
        precedence: u32,
    },
}

impl Transition {
    pub fn target(&self) -> StateId {
        match *self {
            Transition::Epsilon { target }
            | Transition::Atom { target, .. }
            | Transition::Set { target, .. }
            | Transition::NotSet { target, .. }
            | Transition::Wildcard { target }
            | Transition::Rule { target, .. }
            | Transition::Predicate { target, .. }
            | Transition::Precedence { target, .. } => target,
        }
    }

    /// Moves without consuming input.
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self,
            Transition::Epsilon { .. }
                | Transition::Rule { .. }
                | Transition::Predicate { .. }
                | Transition::Precedence { .. }
        )
    }

    /// Token types this transition consumes, with `NotSet` and `Wildcard`
    /// resolved against `MIN_USER_TOKEN_TYPE..=max_token_type`.
    /// `None` for non-consuming transitions.
    pub fn label(&self, max_token_type: TokenType) -> Option<Cow<'_, IntervalSet>> {
        match self {
            Transition::Atom { token, .. } => Some(Cow::Owned(IntervalSet::of(*token))),
            Transition::Set { set, .. } => Some(Cow::Borrowed(set)),
            Transition::NotSet { set, .. } => {
                Some(Cow::Owned(set.complement(MIN_USER_TOKEN_TYPE, max_token_type)))
            }
            Transition::Wildcard { .. } => Some(Cow::Owned(IntervalSet::of_range(
                MIN_USER_TOKEN_TYPE,
                max_token_type,
            ))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtnState {
    pub id: StateId,
    /// Rule the state belongs to.
    pub rule: RuleIndex,
    pub kind: StateKind,
    pub transitions: Vec<Transition>,
}

/// A named semantic predicate and the rule it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateInfo {
    pub rule: RuleIndex,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atn {
    pub(crate) grammar_name: String,
    pub(crate) states: Vec<AtnState>,
    pub(crate) rule_start: Vec<StateId>,
    pub(crate) rule_stop: Vec<StateId>,
    pub(crate) rule_names: Vec<String>,
    pub(crate) predicates: Vec<PredicateInfo>,
    pub(crate) vocabulary: Vocabulary,
}

impl Atn {
    pub fn grammar_name(&self) -> &str {
        &self.grammar_name
    }

    pub fn state(&self, id: StateId) -> Option<&AtnState> {
        self.states.get(id as usize)
    }

    pub fn states(&self) -> &[AtnState] {
        &self.states
    }

    pub fn rule_count(&self) -> usize {
        self.rule_names.len()
    }

    pub fn rule_start_state(&self, rule: RuleIndex) -> Option<StateId> {
        self.rule_start.get(rule as usize).copied()
    }

    pub fn rule_stop_state(&self, rule: RuleIndex) -> Option<StateId> {
        self.rule_stop.get(rule as usize).copied()
    }

    pub fn rule_name(&self, rule: RuleIndex) -> Option<&str> {
        self.rule_names.get(rule as usize).map(String::as_str)
    }

    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }

    pub fn rule_index(&self, name: &str) -> Option<RuleIndex> {
        self.rule_names
            .iter()
            .position(|n| n == name)
            .map(|i| i as RuleIndex)
    }

    /// The first rule of the grammar, if it has any.
    pub fn start_rule(&self) -> Option<RuleIndex> {
        (!self.rule_names.is_empty()).then_some(0)
    }

    pub fn predicate(&self, index: u32) -> Option<&PredicateInfo> {
        self.predicates.get(index as usize)
    }

    pub fn predicates(&self) -> &[PredicateInfo] {
        &self.predicates
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn max_token_type(&self) -> TokenType {
        self.vocabulary.max_token_type()
    }

    /// Rule name for display, `?` when out of range.
    pub fn rule_display(&self, rule: RuleIndex) -> &str {
        self.rule_name(rule).unwrap_or("?")
    }
}
