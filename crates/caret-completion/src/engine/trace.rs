//! Tracing for completion requests.
//!
//! The walker is generic over [`Tracer`]; with [`NoopTracer`] every call is
//! an empty `#[inline(always)]` function and compiles away. [`PrintTracer`]
//! collects an indented log of rule entries, exits and candidates.

use std::collections::BTreeSet;

use caret_core::{Colors, TokenType};
use caret_runtime::{Atn, RuleIndex, StateId};

use super::follow::FollowSetsHolder;
use super::window::TokenWindow;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Rule entries and exits, shortcuts, pruning, candidates.
    #[default]
    Default,
    /// Also follow-set computations.
    Verbose,
    /// Also every ATN state the walk visits.
    VeryVerbose,
}

/// Instrumentation points of a completion request.
///
/// Methods receive raw ids; name resolution happens in the implementation.
pub trait Tracer {
    /// Called once per request after the window is built.
    fn trace_request(&mut self, rule: RuleIndex, window: &TokenWindow);

    /// Called when a rule is entered at window position `index`.
    fn trace_enter_rule(&mut self, rule: RuleIndex, index: usize, at_caret: bool);

    /// Called when a rule invocation returns its end positions.
    fn trace_exit_rule(&mut self, rule: RuleIndex, ends: &BTreeSet<usize>);

    /// Called when a rule walk is replayed from the memo.
    fn trace_shortcut(&mut self, rule: RuleIndex, index: usize);

    /// Called when a rule cannot start with the current token.
    fn trace_pruned(&mut self, rule: RuleIndex, index: usize, token: TokenType);

    /// Called after the follow sets of a start state are computed.
    fn trace_follow_sets(&mut self, state: StateId, holder: &FollowSetsHolder);

    /// Called for every (state, position) the walk processes.
    fn trace_state(&mut self, state: StateId, index: usize);

    fn trace_token_candidate(&mut self, token: TokenType, following: &[TokenType]);

    fn trace_rule_candidate(&mut self, rule: RuleIndex, path: &[RuleIndex]);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_request(&mut self, _rule: RuleIndex, _window: &TokenWindow) {}

    #[inline(always)]
    fn trace_enter_rule(&mut self, _rule: RuleIndex, _index: usize, _at_caret: bool) {}

    #[inline(always)]
    fn trace_exit_rule(&mut self, _rule: RuleIndex, _ends: &BTreeSet<usize>) {}

    #[inline(always)]
    fn trace_shortcut(&mut self, _rule: RuleIndex, _index: usize) {}

    #[inline(always)]
    fn trace_pruned(&mut self, _rule: RuleIndex, _index: usize, _token: TokenType) {}

    #[inline(always)]
    fn trace_follow_sets(&mut self, _state: StateId, _holder: &FollowSetsHolder) {}

    #[inline(always)]
    fn trace_state(&mut self, _state: StateId, _index: usize) {}

    #[inline(always)]
    fn trace_token_candidate(&mut self, _token: TokenType, _following: &[TokenType]) {}

    #[inline(always)]
    fn trace_rule_candidate(&mut self, _rule: RuleIndex, _path: &[RuleIndex]) {}
}

/// Tracer that collects an indented log of the request.
pub struct PrintTracer<'a> {
    atn: &'a Atn,
    verbosity: Verbosity,
    colors: Colors,
    /// Collected trace lines.
    lines: Vec<String>,
    /// Current rule nesting.
    depth: usize,
}

impl<'a> PrintTracer<'a> {
    pub fn new(atn: &'a Atn, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            atn,
            verbosity,
            colors,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines.
    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn push(&mut self, content: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{content}"));
    }

    fn rule(&self, rule: RuleIndex) -> String {
        self.colors.rule(self.atn.rule_display(rule))
    }

    fn token(&self, token: TokenType) -> String {
        self.colors.token(&self.atn.vocabulary().display_name(token))
    }

    fn tokens(&self, tokens: impl IntoIterator<Item = TokenType>) -> String {
        tokens
            .into_iter()
            .map(|t| self.token(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_request(&mut self, rule: RuleIndex, window: &TokenWindow) {
        let tokens = self.tokens(window.tokens().iter().map(|t| t.token_type));
        let line = format!("request {} on [{tokens}]", self.rule(rule));
        self.push(line);
    }

    fn trace_enter_rule(&mut self, rule: RuleIndex, index: usize, at_caret: bool) {
        let caret = if at_caret { " (caret)" } else { "" };
        let line = format!("▶ {} @{index}{caret}", self.rule(rule));
        self.push(line);
        self.depth += 1;
    }

    fn trace_exit_rule(&mut self, rule: RuleIndex, ends: &BTreeSet<usize>) {
        self.depth = self.depth.saturating_sub(1);
        let ends: Vec<_> = ends.iter().map(usize::to_string).collect();
        let line = format!("◀ {} → [{}]", self.rule(rule), ends.join(", "));
        self.push(line);
    }

    fn trace_shortcut(&mut self, rule: RuleIndex, index: usize) {
        let line = format!("↺ {} @{index}", self.rule(rule));
        self.push(line);
    }

    fn trace_pruned(&mut self, rule: RuleIndex, index: usize, token: TokenType) {
        let line = format!(
            "✗ {} @{index} cannot start with {}",
            self.rule(rule),
            self.token(token)
        );
        self.push(line);
    }

    fn trace_follow_sets(&mut self, state: StateId, holder: &FollowSetsHolder) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let combined = holder.combined.display_with(self.atn.vocabulary()).to_string();
        let line = self
            .colors
            .dimmed(&format!("follow S{state}: {combined}"));
        self.push(line);
    }

    fn trace_state(&mut self, state: StateId, index: usize) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        let line = self.colors.dimmed(&format!("S{state} @{index}"));
        self.push(line);
    }

    fn trace_token_candidate(&mut self, token: TokenType, following: &[TokenType]) {
        let mut line = format!("+ {}", self.token(token));
        if !following.is_empty() {
            line.push_str(&format!(" → {}", self.tokens(following.iter().copied())));
        }
        self.push(line);
    }

    fn trace_rule_candidate(&mut self, rule: RuleIndex, path: &[RuleIndex]) {
        let path: Vec<_> = path.iter().map(|&r| self.rule(r)).collect();
        let line = format!("+ {} [{}]", self.rule(rule), path.join(" "));
        self.push(line);
    }
}
