//! Memo of whole rule walks within one request.
//!
//! Walking a rule from a given token index with a given precedence always
//! ends at the same token indices and makes the same recordings at the caret,
//! relative to the rule's own frame. The outcome is stored once and replayed
//! under the caller's call stack, so a rule reached through a new path still
//! reports that path.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use caret_core::{IntervalSet, PackedPair, TokenType};
use caret_runtime::RuleIndex;

use super::frame::Frame;

/// (rule, token index) plus the invocation's precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShortcutKey {
    position: PackedPair,
    precedence: u32,
}

impl ShortcutKey {
    pub fn new(rule: RuleIndex, index: usize, precedence: u32) -> Self {
        Self {
            position: PackedPair::new(rule, index as u32),
            precedence,
        }
    }
}

/// Tokens offered at the caret, shared by every replay.
#[derive(Debug, PartialEq, Eq)]
pub struct TokenOffer {
    pub set: IntervalSet,
    pub following: Vec<TokenType>,
}

/// A recording made at the caret: the call stack at that point, and the
/// tokens to offer if no preferred rule is on it.
#[derive(Debug, Clone)]
pub struct CaretEvent {
    pub frames: Arc<[Frame]>,
    pub offer: Option<Arc<TokenOffer>>,
}

/// A caret recording seen from a rule that encloses it.
#[derive(Debug, Clone)]
pub struct ScopedEvent {
    event: CaretEvent,
    /// Position of the enclosing rule's own frame.
    depth: usize,
}

impl ScopedEvent {
    /// Frames from the enclosing rule's own frame inwards.
    pub fn frames(&self) -> &[Frame] {
        let frames = &self.event.frames;
        &frames[self.depth.min(frames.len())..]
    }

    pub fn offer(&self) -> Option<&Arc<TokenOffer>> {
        self.event.offer.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct RuleOutcome {
    pub ends: BTreeSet<usize>,
    pub events: Vec<ScopedEvent>,
}

#[derive(Debug)]
struct Active {
    key: ShortcutKey,
    depth: usize,
    /// Events with full call stacks.
    events: Vec<CaretEvent>,
    tainted: bool,
}

#[derive(Debug, Default)]
pub struct ShortcutMap {
    outcomes: HashMap<ShortcutKey, Arc<RuleOutcome>>,
    active: Vec<Active>,
    /// Position in `active` of every key being walked.
    positions: HashMap<ShortcutKey, usize>,
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ShortcutKey) -> Option<Arc<RuleOutcome>> {
        self.outcomes.get(&key).cloned()
    }

    /// If `key` is being walked already, mark every walk nested inside it as
    /// incomplete and return true.
    pub fn cut(&mut self, key: ShortcutKey) -> bool {
        let Some(&pos) = self.positions.get(&key) else {
            return false;
        };
        for inner in &mut self.active[pos + 1..] {
            inner.tainted = true;
        }
        true
    }

    /// Start a walk whose own frame sits at `depth` in the call stack.
    pub fn enter(&mut self, key: ShortcutKey, depth: usize) {
        self.positions.insert(key, self.active.len());
        self.active.push(Active {
            key,
            depth,
            events: Vec::new(),
            tainted: false,
        });
    }

    /// Remember an event for the innermost walk.
    pub fn record(&mut self, event: CaretEvent) {
        if let Some(innermost) = self.active.last_mut() {
            innermost.events.push(event);
        }
    }

    /// Finish the innermost walk; its events move to the enclosing one.
    pub fn leave(&mut self, ends: &BTreeSet<usize>) {
        let Some(done) = self.active.pop() else {
            return;
        };
        self.positions.remove(&done.key);

        if !done.tainted {
            // Frames are shared with the full recording, not copied per level.
            let events = done
                .events
                .iter()
                .map(|event| ScopedEvent {
                    event: event.clone(),
                    depth: done.depth,
                })
                .collect();
            let outcome = RuleOutcome {
                ends: ends.clone(),
                events,
            };
            self.outcomes.insert(done.key, Arc::new(outcome));
        }

        if let Some(parent) = self.active.last_mut() {
            parent.events.extend(done.events);
        }
    }
}
