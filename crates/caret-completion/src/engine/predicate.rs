//! Host-side evaluation of semantic predicates.

use caret_runtime::{PredicateInfo, RuleIndex, Token};

use super::error::PredicateError;

/// What a predicate sees when it is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct PredicateContext<'a> {
    /// Rule the predicate appears in.
    pub rule: RuleIndex,
    /// Window position the walk is at; `None` while follow sets are
    /// computed, which happens once per state independent of the input.
    pub token_index: Option<usize>,
    /// Token at `token_index`.
    pub lookahead: Option<&'a Token>,
}

/// Decides whether a predicate transition may be taken.
pub trait PredicateEvaluator {
    fn evaluate(
        &self,
        predicate: &PredicateInfo,
        context: &PredicateContext<'_>,
    ) -> Result<bool, PredicateError>;
}

impl<F> PredicateEvaluator for F
where
    F: Fn(&PredicateInfo, &PredicateContext<'_>) -> Result<bool, PredicateError>,
{
    fn evaluate(
        &self,
        predicate: &PredicateInfo,
        context: &PredicateContext<'_>,
    ) -> Result<bool, PredicateError> {
        self(predicate, context)
    }
}

/// Treats every predicate as satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl PredicateEvaluator for AlwaysTrue {
    #[inline(always)]
    fn evaluate(
        &self,
        _predicate: &PredicateInfo,
        _context: &PredicateContext<'_>,
    ) -> Result<bool, PredicateError> {
        Ok(true)
    }
}
