//! Token type ↔ name table.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::token_type::{EOF, EPSILON, TokenType};

/// Literal and symbolic names per token type.
///
/// Both tables are indexed by token type; slot 0 (`INVALID_TYPE`) is always
/// unnamed. Implicit literals (`'='` used directly in a parser rule) only
/// have a literal name, plain token rules only a symbolic one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    literal_names: Vec<Option<String>>,
    symbolic_names: Vec<Option<String>>,
}

impl Vocabulary {
    pub fn new(literal_names: Vec<Option<String>>, symbolic_names: Vec<Option<String>>) -> Self {
        let len = literal_names.len().max(symbolic_names.len()).max(1);
        let mut literal_names = literal_names;
        let mut symbolic_names = symbolic_names;
        literal_names.resize(len, None);
        symbolic_names.resize(len, None);
        Self {
            literal_names,
            symbolic_names,
        }
    }

    /// Highest assigned token type (0 when the grammar has no tokens).
    pub fn max_token_type(&self) -> TokenType {
        (self.literal_names.len().max(1) - 1) as TokenType
    }

    /// Quoted literal, e.g. `'='`.
    pub fn literal_name(&self, t: TokenType) -> Option<&str> {
        let idx = usize::try_from(t).ok()?;
        self.literal_names.get(idx)?.as_deref()
    }

    pub fn symbolic_name(&self, t: TokenType) -> Option<&str> {
        if t == EOF {
            return Some("EOF");
        }
        let idx = usize::try_from(t).ok()?;
        self.symbolic_names.get(idx)?.as_deref()
    }

    /// Best name for users: the literal if any, then the symbolic name,
    /// then the number itself.
    pub fn display_name(&self, t: TokenType) -> Cow<'_, str> {
        match t {
            EOF => Cow::Borrowed("EOF"),
            EPSILON => Cow::Borrowed("ε"),
            _ => self
                .literal_name(t)
                .or_else(|| self.symbolic_name(t))
                .map_or_else(|| Cow::Owned(t.to_string()), Cow::Borrowed),
        }
    }

    /// Look a token up by symbolic name (`ID`) or quoted literal (`'='`).
    pub fn token_type(&self, name: &str) -> Option<TokenType> {
        if name == "EOF" {
            return Some(EOF);
        }
        let by_name = |names: &[Option<String>]| {
            names
                .iter()
                .position(|n| n.as_deref() == Some(name))
                .map(|idx| idx as TokenType)
        };
        by_name(&self.symbolic_names).or_else(|| by_name(&self.literal_names))
    }
}
