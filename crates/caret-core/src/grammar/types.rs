//! Grammar type definitions.

use serde::{Deserialize, Serialize};

/// Complete grammar: parser rules plus token rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// Grammar name (e.g., "Expr", "MySQL").
    pub name: String,
    /// Parser rules, preserving definition order. The first one is the start rule.
    pub rules: Vec<(String, Rule)>,
    /// Token rules, preserving definition order (ties in the lexer go to earlier ones).
    #[serde(default)]
    pub tokens: Vec<TokenDef>,
}

/// Parser rule body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Epsilon (empty match).
    Blank,
    /// Literal token, e.g. `'='`. Text is stored unquoted.
    Literal(String),
    /// Reference to a parser rule or a token rule.
    Symbol(String),
    /// Sequence of rules (must match in order).
    Seq(Vec<Rule>),
    /// Alternation.
    Choice(Vec<Rule>),
    /// Zero or more repetitions.
    Repeat(Box<Rule>),
    /// One or more repetitions.
    Repeat1(Box<Rule>),
    /// Zero or one.
    Optional(Box<Rule>),
    /// Any single token.
    Wildcard,
    /// Any single token except the listed ones (`Literal`/`Symbol` only).
    Not(Vec<Rule>),
    /// Semantic predicate `{name}?`, evaluated by the host.
    Predicate(String),
}

impl Rule {
    /// Top-level alternatives: the members of a `Choice`, or the rule itself.
    pub fn alternatives(&self) -> &[Rule] {
        match self {
            Rule::Choice(alts) => alts,
            other => std::slice::from_ref(other),
        }
    }

    /// Elements of a sequence, or the rule itself as a one-element sequence.
    pub fn elements(&self) -> &[Rule] {
        match self {
            Rule::Seq(items) => items,
            Rule::Blank => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// True for a reference to `name`.
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Rule::Symbol(s) if s == name)
    }
}

/// Token (lexer) rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDef {
    pub name: String,
    pub pattern: TokenPattern,
    #[serde(default)]
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenPattern {
    /// Exact text.
    Literal(String),
    /// Regular expression (regex-syntax dialect).
    Regex(String),
}

/// Where the lexer routes a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Seen by parsers and completion.
    #[default]
    Default,
    /// Kept in the stream but invisible to parsers (comments).
    Hidden,
    /// Dropped by the lexer (whitespace).
    Skip,
}

impl Grammar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn token(&self, name: &str) -> Option<&TokenDef> {
        self.tokens.iter().find(|t| t.name == name)
    }

    /// Name of the designated start rule (the first parser rule).
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.first().map(|(n, _)| n.as_str())
    }

    /// No parser rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
