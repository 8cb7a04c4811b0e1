//! Dump helpers for ATN inspection and testing.

use std::fmt::Write;

use caret_core::Colors;

use super::{Atn, AtnState, StateKind, Transition};

/// Printer for `Atn` with configurable output options.
pub struct AtnPrinter<'a> {
    atn: &'a Atn,
    colors: Colors,
    rules_only: bool,
}

impl<'a> AtnPrinter<'a> {
    pub fn new(atn: &'a Atn) -> Self {
        Self {
            atn,
            colors: Colors::OFF,
            rules_only: false,
        }
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Only print the rule header (names with start/stop states).
    pub fn rules_only(mut self, value: bool) -> Self {
        self.rules_only = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        let c = self.colors;
        for (i, name) in self.atn.rule_names.iter().enumerate() {
            writeln!(
                w,
                "{} = S{} → S{}",
                c.rule(name),
                self.atn.rule_start[i],
                self.atn.rule_stop[i]
            )?;
        }
        if self.rules_only {
            return Ok(());
        }
        if !self.atn.rule_names.is_empty() {
            writeln!(w)?;
        }

        for state in &self.atn.states {
            self.format_state(w, state)?;
        }
        Ok(())
    }

    fn format_state(&self, w: &mut String, state: &AtnState) -> std::fmt::Result {
        let c = self.colors;
        write!(w, "S{}", state.id)?;
        if state.kind != StateKind::Basic {
            write!(w, " {}", c.dimmed(&format!("[{}]", state.kind.label())))?;
        }

        if state.transitions.is_empty() {
            return writeln!(w);
        }

        w.push_str(": ");
        for (i, t) in state.transitions.iter().enumerate() {
            if i > 0 {
                w.push_str(" | ");
            }
            self.format_transition(w, t)?;
        }
        writeln!(w)
    }

    fn format_transition(&self, w: &mut String, t: &Transition) -> std::fmt::Result {
        let c = self.colors;
        let vocabulary = self.atn.vocabulary();
        match t {
            Transition::Epsilon { target } => write!(w, "ε → S{target}"),
            Transition::Atom { target, token } => {
                write!(w, "{} → S{target}", c.token(&vocabulary.display_name(*token)))
            }
            Transition::Set { target, set } => {
                write!(w, "{} → S{target}", set.display_with(vocabulary))
            }
            Transition::NotSet { target, set } => {
                write!(w, "~{} → S{target}", set.display_with(vocabulary))
            }
            Transition::Wildcard { target } => write!(w, ". → S{target}"),
            Transition::Rule {
                target,
                rule,
                follow,
                precedence,
            } => {
                write!(w, "{}", c.rule(self.atn.rule_display(*rule)))?;
                if *precedence > 0 {
                    write!(w, "[{precedence}]")?;
                }
                write!(w, " → S{target} ↩ S{follow}")
            }
            Transition::Predicate {
                target, predicate, ..
            } => {
                let name = self.atn.predicate(*predicate).map_or("?", |p| p.name.as_str());
                write!(w, "{{{name}}}? → S{target}")
            }
            Transition::Precedence { target, precedence } => {
                write!(w, "precpred({precedence}) → S{target}")
            }
        }
    }
}

impl Atn {
    /// Stable text form of the whole network.
    pub fn dump(&self) -> String {
        AtnPrinter::new(self).dump()
    }
}
