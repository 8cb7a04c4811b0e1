//! Rule call stack of the walk.
//!
//! Two views of the same nesting: [`CallStack`] is the rule context copied
//! into caret recordings, and [`WalkFrame`] holds the suspended state of
//! every rule still being walked. Both live on the heap, so nesting depth is
//! bounded by `recursion_limit`, not by the thread stack.

use std::collections::{BTreeSet, HashSet};

use caret_core::PackedPair;
use caret_runtime::{RuleIndex, StateId};

use super::shortcut::ShortcutKey;

/// One active rule invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    pub rule: RuleIndex,
    /// Window position the invocation started at.
    pub start: usize,
}

#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: RuleIndex, start: usize) {
        self.frames.push(Frame { rule, start });
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Current frames followed by `suffix`.
    pub fn extended(&self, suffix: &[Frame]) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.frames.len() + suffix.len());
        frames.extend_from_slice(&self.frames);
        frames.extend_from_slice(suffix);
        frames
    }
}

/// Transition expansion interrupted by a rule call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resume {
    pub state: StateId,
    pub index: usize,
    /// First transition not yet expanded.
    pub next: usize,
}

/// A rule invocation being walked.
#[derive(Debug)]
pub struct WalkFrame {
    pub rule: RuleIndex,
    pub key: ShortcutKey,
    pub precedence: u32,
    /// Follow state in the caller that every end position continues at.
    /// `None` for the start rule.
    pub return_state: Option<StateId>,
    pub pipeline: Vec<PackedPair>,
    pub seen: HashSet<PackedPair>,
    pub ends: BTreeSet<usize>,
    pub resume: Option<Resume>,
}

impl WalkFrame {
    pub fn new(
        rule: RuleIndex,
        start: StateId,
        index: usize,
        precedence: u32,
        return_state: Option<StateId>,
    ) -> Self {
        Self {
            rule,
            key: ShortcutKey::new(rule, index, precedence),
            precedence,
            return_state,
            pipeline: vec![PackedPair::new(start, index as u32)],
            seen: HashSet::new(),
            ends: BTreeSet::new(),
            resume: None,
        }
    }
}
