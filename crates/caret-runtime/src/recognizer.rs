//! The parser-side view completion needs: a grammar name and its ATN.

use caret_core::{Grammar, TokenType, Vocabulary};

use crate::atn::{Atn, RuleIndex};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::token_stream::BufferedTokenStream;

pub trait Recognizer {
    fn grammar_name(&self) -> &str;

    /// `None` when the recognizer was built without a grammar network.
    fn atn(&self) -> Option<&Atn>;
}

impl Recognizer for Atn {
    fn grammar_name(&self) -> &str {
        Atn::grammar_name(self)
    }

    fn atn(&self) -> Option<&Atn> {
        Some(self)
    }
}

/// Grammar, ATN and lexer built from one grammar definition.
#[derive(Debug)]
pub struct GrammarRecognizer {
    grammar: Grammar,
    atn: Atn,
    lexer: Lexer,
}

impl GrammarRecognizer {
    pub fn new(grammar: Grammar) -> Result<Self> {
        let atn = Atn::from_grammar(&grammar)?;
        let lexer = Lexer::new(&grammar, atn.vocabulary())?;
        Ok(Self {
            grammar,
            atn,
            lexer,
        })
    }

    /// Parse grammar notation and build everything from it.
    pub fn from_text(source: &str) -> Result<Self> {
        Self::new(Grammar::parse(source)?)
    }

    pub fn tokenize(&self, text: &str) -> Result<BufferedTokenStream> {
        Ok(BufferedTokenStream::new(self.lexer.tokenize(text)?))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.atn.vocabulary()
    }

    pub fn rule_index(&self, name: &str) -> Option<RuleIndex> {
        self.atn.rule_index(name)
    }

    pub fn token_type(&self, name: &str) -> Option<TokenType> {
        self.atn.vocabulary().token_type(name)
    }
}

impl Recognizer for GrammarRecognizer {
    fn grammar_name(&self) -> &str {
        self.atn.grammar_name()
    }

    fn atn(&self) -> Option<&Atn> {
        Some(&self.atn)
    }
}
