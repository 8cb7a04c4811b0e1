//! Structural checks for a built or deserialized ATN.

use caret_core::{EOF, MIN_USER_TOKEN_TYPE};

use super::{Atn, StateKind, Transition};
use crate::error::AtnError;

impl Atn {
    /// Check every structural invariant completion relies on.
    ///
    /// - rule tables have one name, start and stop state per rule
    /// - start/stop entries point at `RuleStart`/`RuleStop` states of that rule
    /// - every transition targets an existing state
    /// - rule transitions enter the callee's start state
    /// - token transitions carry non-empty sets of known token types
    /// - predicate transitions name a known predicate
    pub fn verify(&self) -> Result<(), AtnError> {
        let rules = self.rule_names.len();
        if self.rule_start.len() != rules || self.rule_stop.len() != rules {
            return Err(AtnError::InconsistentTables {
                names: rules,
                starts: self.rule_start.len(),
                stops: self.rule_stop.len(),
            });
        }

        for (table, kind) in [
            (&self.rule_start, StateKind::RuleStart),
            (&self.rule_stop, StateKind::RuleStop),
        ] {
            for (rule, &id) in table.iter().enumerate() {
                match self.state(id) {
                    Some(s) if s.kind == kind && s.rule as usize == rule => {}
                    Some(_) => {
                        return Err(AtnError::WrongStateKind {
                            state: id,
                            expected: kind,
                        });
                    }
                    None => {
                        return Err(AtnError::DanglingTarget {
                            state: id,
                            target: id,
                        });
                    }
                }
            }
        }

        let max = self.max_token_type();
        for (i, state) in self.states.iter().enumerate() {
            let id = state.id;
            if id as usize != i {
                return Err(AtnError::DanglingTarget {
                    state: i as u32,
                    target: id,
                });
            }
            if state.rule as usize >= rules {
                return Err(AtnError::UnknownRule {
                    state: id,
                    rule: state.rule,
                });
            }

            for t in &state.transitions {
                let target = t.target();
                if self.state(target).is_none() {
                    return Err(AtnError::DanglingTarget { state: id, target });
                }

                match t {
                    Transition::Rule { rule, follow, .. } => {
                        if self.rule_start_state(*rule) != Some(target) {
                            return Err(AtnError::DanglingRuleCall { state: id, rule: *rule });
                        }
                        if self.state(*follow).is_none() {
                            return Err(AtnError::DanglingTarget {
                                state: id,
                                target: *follow,
                            });
                        }
                    }
                    Transition::Atom { token, .. } => {
                        if *token != EOF && !(MIN_USER_TOKEN_TYPE..=max).contains(token) {
                            return Err(AtnError::TokenOutOfRange {
                                state: id,
                                token: *token,
                            });
                        }
                    }
                    Transition::Set { set, .. } | Transition::NotSet { set, .. } => {
                        if set.is_empty() {
                            return Err(AtnError::EmptySet { state: id });
                        }
                        let stray = set.intervals().iter().find(|iv| {
                            let eof_only = iv.start == EOF && iv.end == EOF;
                            !eof_only && (iv.start < MIN_USER_TOKEN_TYPE || iv.end > max)
                        });
                        if let Some(iv) = stray {
                            let token = if iv.start < MIN_USER_TOKEN_TYPE { iv.start } else { iv.end };
                            return Err(AtnError::TokenOutOfRange { state: id, token });
                        }
                    }
                    Transition::Predicate { predicate, .. } => {
                        if self.predicate(*predicate).is_none() {
                            return Err(AtnError::UnknownPredicate {
                                state: id,
                                predicate: *predicate,
                            });
                        }
                    }
                    Transition::Epsilon { .. }
                    | Transition::Wildcard { .. }
                    | Transition::Precedence { .. } => {}
                }
            }
        }

        Ok(())
    }
}
