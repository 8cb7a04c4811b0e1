//! Completion requests: configuration and the entry point.

use caret_core::TokenType;
use caret_runtime::{Atn, Recognizer, RuleIndex, TokenStream};

use super::cancel::CancellationToken;
use super::candidates::CandidatesCollection;
use super::config::{Config, Limits, RulePreference};
use super::error::CompletionError;
use super::follow::FollowSetCache;
use super::predicate::PredicateEvaluator;
use super::trace::{NoopTracer, Tracer};
use super::walker::Walker;
use super::window::TokenWindow;

/// Counters of the last request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Follow-set holders computed (cache misses).
    pub follow_set_computations: usize,
    /// Rule walks performed before the caret.
    pub rule_walks: usize,
    /// Rule walks replayed from the memo.
    pub shortcut_hits: usize,
    pub states_processed: usize,
}

/// Where to start walking: a rule and the stream index its input starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub rule: RuleIndex,
    pub start_token: usize,
}

impl RuleContext {
    pub fn new(rule: RuleIndex, start_token: usize) -> Self {
        Self { rule, start_token }
    }
}

/// Builder for [`CodeCompletionCore`].
pub struct CompletionBuilder<'a> {
    grammar: String,
    atn: Option<&'a Atn>,
    config: Config,
    cache: Option<FollowSetCache>,
}

impl<'a> CompletionBuilder<'a> {
    fn new<R: Recognizer + ?Sized>(recognizer: &'a R) -> Self {
        Self {
            grammar: recognizer.grammar_name().to_string(),
            atn: recognizer.atn(),
            config: Config::default(),
            cache: None,
        }
    }

    /// Rules reported as candidates instead of the tokens they start with.
    pub fn preferred_rules(mut self, rules: impl IntoIterator<Item = RuleIndex>) -> Self {
        self.config.preferred.extend(rules);
        self
    }

    /// Token types never reported.
    pub fn ignored_tokens(mut self, tokens: impl IntoIterator<Item = TokenType>) -> Self {
        self.config.ignored.extend(tokens);
        self
    }

    /// Ignore every token type the filter accepts, in addition to
    /// [`ignored_tokens`](Self::ignored_tokens).
    pub fn ignore_tokens_where(mut self, filter: impl Fn(TokenType) -> bool + 'static) -> Self {
        self.config.ignore_where = Some(Box::new(filter));
        self
    }

    pub fn rule_preference(mut self, preference: RulePreference) -> Self {
        self.config.preference = preference;
        self
    }

    pub fn predicates(mut self, evaluator: impl PredicateEvaluator + 'static) -> Self {
        self.config.predicates = Box::new(evaluator);
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.config.limits.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.config.limits.recursion_limit = limit;
        self
    }

    /// Keep follow sets across requests instead of clearing them per request.
    pub fn retain_follow_sets(mut self, retain: bool) -> Self {
        self.config.retain_follow_sets = retain;
        self
    }

    /// Start from a cache filled by another instance. Implies
    /// [`retain_follow_sets`](Self::retain_follow_sets); entries computed for
    /// a different ATN are dropped.
    pub fn follow_set_cache(mut self, cache: FollowSetCache) -> Self {
        self.cache = Some(cache);
        self.config.retain_follow_sets = true;
        self
    }

    pub fn build(self) -> Result<CodeCompletionCore<'a>, CompletionError> {
        let atn = self.atn.ok_or(CompletionError::NoAtn {
            grammar: self.grammar,
        })?;
        if let Some(&rule) = self
            .config
            .preferred
            .iter()
            .find(|&&r| r as usize >= atn.rule_count())
        {
            return Err(CompletionError::UnknownRule(rule));
        }

        let mut follow_sets = self.cache.unwrap_or_default();
        follow_sets.bind(atn.fingerprint());

        Ok(CodeCompletionCore {
            atn,
            config: self.config,
            follow_sets,
            stats: CollectStats::default(),
        })
    }
}

/// Collects completion candidates for one grammar.
///
/// Configuration is fixed at build time. Each request walks from a start
/// rule over the tokens up to the caret; only the follow-set cache may
/// outlive a request.
pub struct CodeCompletionCore<'a> {
    atn: &'a Atn,
    config: Config,
    follow_sets: FollowSetCache,
    stats: CollectStats,
}

impl<'a> CodeCompletionCore<'a> {
    pub fn builder<R: Recognizer + ?Sized>(recognizer: &'a R) -> CompletionBuilder<'a> {
        CompletionBuilder::new(recognizer)
    }

    /// Default configuration: no preferred rules, nothing ignored.
    pub fn new<R: Recognizer + ?Sized>(recognizer: &'a R) -> Result<Self, CompletionError> {
        Self::builder(recognizer).build()
    }

    pub fn atn(&self) -> &'a Atn {
        self.atn
    }

    /// Counters of the last request.
    pub fn stats(&self) -> CollectStats {
        self.stats
    }

    pub fn follow_set_cache(&self) -> &FollowSetCache {
        &self.follow_sets
    }

    pub fn into_follow_set_cache(self) -> FollowSetCache {
        self.follow_sets
    }

    /// Candidates at stream index `caret`.
    ///
    /// Walks `context.rule` from `context.start_token`, or the grammar's
    /// first rule from the start of the stream. The stream cursor is
    /// restored before returning.
    pub fn collect_candidates<S: TokenStream + ?Sized>(
        &mut self,
        stream: &mut S,
        caret: usize,
        context: Option<&RuleContext>,
    ) -> Result<CandidatesCollection, CompletionError> {
        self.collect_candidates_with(
            stream,
            caret,
            context,
            &mut NoopTracer,
            &CancellationToken::new(),
        )
    }

    /// [`collect_candidates`](Self::collect_candidates) with a tracer and a
    /// cancellation token checked at every walker step.
    pub fn collect_candidates_with<S: TokenStream + ?Sized, T: Tracer>(
        &mut self,
        stream: &mut S,
        caret: usize,
        context: Option<&RuleContext>,
        tracer: &mut T,
        cancel: &CancellationToken,
    ) -> Result<CandidatesCollection, CompletionError> {
        self.stats = CollectStats::default();

        let (rule, start) = match context {
            Some(ctx) => (ctx.rule, ctx.start_token),
            None => match self.atn.start_rule() {
                Some(rule) => (rule, 0),
                None => return Ok(CandidatesCollection::new()),
            },
        };
        if rule as usize >= self.atn.rule_count() {
            return Err(CompletionError::UnknownRule(rule));
        }

        let window = TokenWindow::build(stream, start, caret);
        if !self.config.retain_follow_sets {
            self.follow_sets.clear();
        }
        tracer.trace_request(rule, &window);

        let walker = Walker::new(
            self.atn,
            &self.config,
            &window,
            &mut self.follow_sets,
            tracer,
            cancel,
        );
        let (result, stats) = walker.run(rule);
        self.stats = stats;
        result
    }
}
