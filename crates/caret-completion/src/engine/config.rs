//! Walker limits and rule-translation preference.

use std::collections::BTreeSet;

use caret_core::TokenType;
use caret_runtime::RuleIndex;

use super::predicate::{AlwaysTrue, PredicateEvaluator};

/// Runtime limits for one completion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum walker steps (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum rule nesting (default: 65,536).
    pub(crate) recursion_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 65_536,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Which preferred rule wins when several are on the call stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RulePreference {
    /// The one closest to the caret.
    #[default]
    Innermost,
    /// The one closest to the start rule.
    Outermost,
}

/// Everything a request needs besides the ATN, fixed at build time.
pub(crate) struct Config {
    pub preferred: BTreeSet<RuleIndex>,
    pub ignored: BTreeSet<TokenType>,
    pub ignore_where: Option<Box<dyn Fn(TokenType) -> bool>>,
    pub preference: RulePreference,
    pub predicates: Box<dyn PredicateEvaluator>,
    pub limits: Limits,
    pub retain_follow_sets: bool,
}

impl Config {
    pub fn is_ignored(&self, token: TokenType) -> bool {
        self.ignored.contains(&token) || self.ignore_where.as_ref().is_some_and(|f| f(token))
    }

    pub fn is_preferred(&self, rule: RuleIndex) -> bool {
        self.preferred.contains(&rule)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred: BTreeSet::new(),
            ignored: BTreeSet::new(),
            ignore_where: None,
            preference: RulePreference::default(),
            predicates: Box::new(AlwaysTrue),
            limits: Limits::default(),
            retain_follow_sets: false,
        }
    }
}
