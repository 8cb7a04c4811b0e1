//! Completion engine.
//!
//! A request builds a [`TokenWindow`] from the stream, then walks the start
//! rule over it. Rule follow sets are memoised per start state, whole rule
//! walks per (rule, token index, precedence); both live for one request
//! unless the follow-set cache is retained.

mod cancel;
mod candidates;
mod collect;
mod config;
mod error;
mod follow;
mod frame;
mod predicate;
mod shortcut;
mod trace;
mod walker;
mod window;

#[cfg(test)]
mod candidates_tests;
#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod properties_tests;
#[cfg(test)]
mod window_tests;

pub use cancel::CancellationToken;
pub use candidates::CandidatesCollection;
pub use collect::{CodeCompletionCore, CollectStats, CompletionBuilder, RuleContext};
pub use config::{Limits, RulePreference};
pub use error::{CompletionError, PredicateError};
pub use follow::{FollowSetCache, FollowSetWithPath, FollowSetsHolder};
pub use predicate::{AlwaysTrue, PredicateContext, PredicateEvaluator};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use window::TokenWindow;
