//! State allocation and fragment combinators for ATN construction.
//!
//! Every grammar element lowers to a fragment with one entry and one exit
//! state. Combinators wire fragments together with epsilon transitions and
//! add the structural states (block start/end, loop entry/back/end).

use caret_core::{IntervalSet, TokenType, Vocabulary};

use super::{Atn, AtnState, PredicateInfo, RuleIndex, StateId, StateKind, Transition};

/// A sub-network with single entry and exit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub entry: StateId,
    pub exit: StateId,
}

impl Fragment {
    pub fn new(entry: StateId, exit: StateId) -> Self {
        Self { entry, exit }
    }

    /// Single-state fragment where entry equals exit.
    pub fn single(state: StateId) -> Self {
        Self {
            entry: state,
            exit: state,
        }
    }
}

/// Build-time ATN.
///
/// States are attributed to the rule set with [`AtnBuilder::set_rule`].
#[derive(Debug, Default)]
pub struct AtnBuilder {
    states: Vec<AtnState>,
    rule: RuleIndex,
}

impl AtnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule that subsequently added states belong to.
    pub fn set_rule(&mut self, rule: RuleIndex) {
        self.rule = rule;
    }

    pub fn add_state(&mut self, kind: StateKind) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(AtnState {
            id,
            rule: self.rule,
            kind,
            transitions: Vec::new(),
        });
        id
    }

    pub fn state(&self, id: StateId) -> &AtnState {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn add_transition(&mut self, from: StateId, transition: Transition) {
        self.states[from as usize].transitions.push(transition);
    }

    pub fn epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Transition::Epsilon { target: to });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fragment Combinators
    // ─────────────────────────────────────────────────────────────────────

    /// Two basic states joined by a transition built for the exit state.
    fn edge_fragment(&mut self, make: impl FnOnce(StateId) -> Transition) -> Fragment {
        let entry = self.add_state(StateKind::Basic);
        let exit = self.add_state(StateKind::Basic);
        self.add_transition(entry, make(exit));
        Fragment::new(entry, exit)
    }

    pub fn epsilon_fragment(&mut self) -> Fragment {
        Fragment::single(self.add_state(StateKind::Basic))
    }

    pub fn atom_fragment(&mut self, token: TokenType) -> Fragment {
        self.edge_fragment(|target| Transition::Atom { target, token })
    }

    pub fn set_fragment(&mut self, set: IntervalSet) -> Fragment {
        self.edge_fragment(|target| Transition::Set { target, set })
    }

    pub fn not_set_fragment(&mut self, set: IntervalSet) -> Fragment {
        self.edge_fragment(|target| Transition::NotSet { target, set })
    }

    pub fn wildcard_fragment(&mut self) -> Fragment {
        self.edge_fragment(|target| Transition::Wildcard { target })
    }

    pub fn predicate_fragment(&mut self, predicate: u32) -> Fragment {
        let rule = self.rule;
        self.edge_fragment(|target| Transition::Predicate {
            target,
            rule,
            predicate,
        })
    }

    pub fn precedence_fragment(&mut self, precedence: u32) -> Fragment {
        self.edge_fragment(|target| Transition::Precedence { target, precedence })
    }

    /// Invocation of `rule` whose start state is `start`.
    pub fn rule_fragment(&mut self, rule: RuleIndex, start: StateId, precedence: u32) -> Fragment {
        let entry = self.add_state(StateKind::Basic);
        let follow = self.add_state(StateKind::Basic);
        self.add_transition(
            entry,
            Transition::Rule {
                target: start,
                rule,
                follow,
                precedence,
            },
        );
        Fragment::new(entry, follow)
    }

    /// Connect fragments in sequence: f1 → f2 → ... → fn
    pub fn sequence(&mut self, fragments: &[Fragment]) -> Fragment {
        match fragments {
            [] => self.epsilon_fragment(),
            [single] => *single,
            [first, .., last] => {
                for window in fragments.windows(2) {
                    self.epsilon(window[0].exit, window[1].entry);
                }
                Fragment::new(first.entry, last.exit)
            }
        }
    }

    /// Connect fragments in parallel: block-start → [f1|f2|...|fn] → block-end
    pub fn alternation(&mut self, fragments: &[Fragment]) -> Fragment {
        match fragments {
            [] => return self.epsilon_fragment(),
            [single] => return *single,
            _ => {}
        }

        let entry = self.add_state(StateKind::BlockStart);
        let exit = self.add_state(StateKind::BlockEnd);
        for f in fragments {
            self.epsilon(entry, f.entry);
            self.epsilon(f.exit, exit);
        }
        Fragment::new(entry, exit)
    }

    /// Zero or more: inner*
    ///
    /// ```text
    ///          ┌──────── back ◀──┐
    ///          ↓                 │
    /// entry ─→ loop-entry ─→ inner
    ///            │
    ///            └─→ loop-end
    /// ```
    pub fn zero_or_more(&mut self, inner: Fragment) -> Fragment {
        let entry = self.add_state(StateKind::StarLoopEntry);
        let back = self.add_state(StateKind::StarLoopBack);
        let exit = self.add_state(StateKind::LoopEnd);

        self.epsilon(entry, inner.entry);
        self.epsilon(entry, exit);
        self.epsilon(inner.exit, back);
        self.epsilon(back, entry);

        Fragment::new(entry, exit)
    }

    /// One or more: inner+
    pub fn one_or_more(&mut self, inner: Fragment) -> Fragment {
        let entry = self.add_state(StateKind::PlusBlockStart);
        let back = self.add_state(StateKind::PlusLoopBack);
        let exit = self.add_state(StateKind::LoopEnd);

        self.epsilon(entry, inner.entry);
        self.epsilon(inner.exit, back);
        self.epsilon(back, entry);
        self.epsilon(back, exit);

        Fragment::new(entry, exit)
    }

    /// Zero or one: inner?
    pub fn optional(&mut self, inner: Fragment) -> Fragment {
        let entry = self.add_state(StateKind::BlockStart);
        let exit = self.add_state(StateKind::BlockEnd);

        self.epsilon(entry, inner.entry);
        self.epsilon(entry, exit);
        self.epsilon(inner.exit, exit);

        Fragment::new(entry, exit)
    }

    /// Freeze into an `Atn`. No checks; call [`Atn::verify`] on the result.
    pub fn finish(
        self,
        grammar_name: impl Into<String>,
        rule_names: Vec<String>,
        rule_start: Vec<StateId>,
        rule_stop: Vec<StateId>,
        predicates: Vec<PredicateInfo>,
        vocabulary: Vocabulary,
    ) -> Atn {
        Atn {
            grammar_name: grammar_name.into(),
            states: self.states,
            rule_start,
            rule_stop,
            rule_names,
            predicates,
            vocabulary,
        }
    }
}
