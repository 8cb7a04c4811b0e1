//! JSON deserialization for grammars.
//!
//! Rules use internally-tagged objects with a `type` field, tokens map names
//! to `STRING`/`PATTERN` definitions. Maps keep definition order.

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::GrammarError;
use super::types::{Channel, Grammar, Rule, TokenDef, TokenPattern};

impl Grammar {
    /// Parse grammar from JSON string.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawGrammar = serde_json::from_str(json).map_err(GrammarError::Json)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct RawGrammar {
    name: String,
    rules: IndexMap<String, RawRule>,
    #[serde(default)]
    tokens: IndexMap<String, RawToken>,
}

impl From<RawGrammar> for Grammar {
    fn from(raw: RawGrammar) -> Self {
        // IndexMap preserves insertion order; the start rule is always first.
        Self {
            name: raw.name,
            rules: raw.rules.into_iter().map(|(k, v)| (k, v.into())).collect(),
            tokens: raw
                .tokens
                .into_iter()
                .map(|(name, t)| t.into_def(name))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms)]
enum RawRule {
    BLANK,
    STRING { value: String },
    SYMBOL { name: String },
    SEQ { members: Vec<RawRule> },
    CHOICE { members: Vec<RawRule> },
    REPEAT { content: Box<RawRule> },
    REPEAT1 { content: Box<RawRule> },
    OPTIONAL { content: Box<RawRule> },
    WILDCARD,
    NOT { members: Vec<RawRule> },
    PREDICATE { name: String },
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        #[allow(clippy::boxed_local)] // Fields are Box<RawRule>, output needs Box<Rule>
        fn conv(content: Box<RawRule>) -> Box<Rule> {
            Box::new(Rule::from(*content))
        }

        fn all(members: Vec<RawRule>) -> Vec<Rule> {
            members.into_iter().map(Into::into).collect()
        }

        match raw {
            RawRule::BLANK => Rule::Blank,
            RawRule::STRING { value } => Rule::Literal(value),
            RawRule::SYMBOL { name } => Rule::Symbol(name),
            RawRule::SEQ { members } => Rule::Seq(all(members)),
            RawRule::CHOICE { members } => Rule::Choice(all(members)),
            RawRule::REPEAT { content } => Rule::Repeat(conv(content)),
            RawRule::REPEAT1 { content } => Rule::Repeat1(conv(content)),
            RawRule::OPTIONAL { content } => Rule::Optional(conv(content)),
            RawRule::WILDCARD => Rule::Wildcard,
            RawRule::NOT { members } => Rule::Not(all(members)),
            RawRule::PREDICATE { name } => Rule::Predicate(name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms)]
enum RawToken {
    STRING {
        value: String,
        #[serde(default)]
        channel: RawChannel,
    },
    PATTERN {
        value: String,
        #[serde(default)]
        channel: RawChannel,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawChannel {
    #[default]
    Default,
    Hidden,
    Skip,
}

impl RawToken {
    fn into_def(self, name: String) -> TokenDef {
        let (pattern, channel) = match self {
            RawToken::STRING { value, channel } => (TokenPattern::Literal(value), channel),
            RawToken::PATTERN { value, channel } => (TokenPattern::Regex(value), channel),
        };
        let channel = match channel {
            RawChannel::Default => Channel::Default,
            RawChannel::Hidden => Channel::Hidden,
            RawChannel::Skip => Channel::Skip,
        };
        TokenDef {
            name,
            pattern,
            channel,
        }
    }
}
