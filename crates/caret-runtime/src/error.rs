//! Errors raised while lowering grammars, checking ATNs and lexing input.

use caret_core::{GrammarError, TokenType};

use crate::atn::{RuleIndex, StateId, StateKind};

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Grammar → ATN lowering and ATN verification errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtnError {
    #[error("rule `{rule}` references undefined symbol `{name}`")]
    UndefinedSymbol { rule: String, name: String },

    #[error("rule `{rule}`: `{name}` inside `~` is not a token")]
    InvalidSetElement { rule: String, name: String },

    #[error("rule `{rule}`: `~` needs at least one token")]
    EmptyNotSet { rule: String },

    #[error("left-recursive rule `{rule}` has no non-recursive alternative")]
    NoPrimaryAlternative { rule: String },

    #[error("state {state} has a transition to missing state {target}")]
    DanglingTarget { state: StateId, target: StateId },

    #[error("state {state} calls rule {rule}, which has no start state")]
    DanglingRuleCall { state: StateId, rule: RuleIndex },

    #[error("state {state} is expected to be a {expected:?} state")]
    WrongStateKind { state: StateId, expected: StateKind },

    #[error("state {state} has an empty token set")]
    EmptySet { state: StateId },

    #[error("state {state} matches token type {token}, outside the vocabulary")]
    TokenOutOfRange { state: StateId, token: TokenType },

    #[error("state {state} refers to unknown predicate {predicate}")]
    UnknownPredicate { state: StateId, predicate: u32 },

    #[error("state {state} belongs to unknown rule {rule}")]
    UnknownRule { state: StateId, rule: RuleIndex },

    #[error(
        "rule tables disagree: {names} names, {starts} start states, {stops} stop states"
    )]
    InconsistentTables {
        names: usize,
        starts: usize,
        stops: usize,
    },

    #[error("binary decode error: {0}")]
    Binary(String),
}

/// Input that cannot be tokenized, or a token rule that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("token rule `{token}` has an invalid pattern: {message}")]
    InvalidPattern { token: String, message: String },

    #[error("token rule `{token}` was not assigned a token type")]
    UnassignedToken { token: String },

    #[error("no token matches input at offset {offset}: `{text}`")]
    UnexpectedInput { offset: usize, text: String },
}

/// Everything that can go wrong between grammar text and a token stream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Atn(#[from] AtnError),

    #[error(transparent)]
    Lex(#[from] LexError),
}
