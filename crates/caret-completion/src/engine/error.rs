//! Errors that end a completion request.

use caret_runtime::{RuleIndex, StateId};

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The recognizer was built without a grammar network.
    #[error("no ATN available for grammar `{grammar}`")]
    NoAtn { grammar: String },

    #[error("rule index {0} is out of range")]
    UnknownRule(RuleIndex),

    /// A rule transition that does not enter the callee's start state.
    #[error("state {state} calls rule {rule} without entering its start state")]
    DanglingRuleCall { state: StateId, rule: RuleIndex },

    #[error("state {0} does not exist")]
    MissingState(StateId),

    #[error("predicate {0} does not exist")]
    UnknownPredicate(u32),

    /// The host's predicate evaluator failed.
    #[error("predicate `{name}` failed: {source}")]
    Predicate {
        name: String,
        #[source]
        source: PredicateError,
    },

    #[error("completion cancelled")]
    Cancelled,

    /// Execution fuel exhausted (too many walker steps).
    #[error("execution limit of {0} steps exceeded")]
    ExecFuelExhausted(u32),

    /// Too many nested rule invocations.
    #[error("recursion limit of {0} nested rules exceeded")]
    RecursionLimitExceeded(u32),
}

/// Failure reported by a [`PredicateEvaluator`](super::PredicateEvaluator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PredicateError {
    pub message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
