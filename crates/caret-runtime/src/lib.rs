#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime side of caret: the ATN a grammar lowers to, plus the lexer and
//! token streams completion runs against.
//!
//! ```text
//! Grammar ──lower──▶ Atn ◀── Recognizer ──▶ Lexer ──▶ BufferedTokenStream
//! ```

pub mod atn;
pub mod error;
pub mod lexer;
pub mod recognizer;
pub mod token_stream;

#[cfg(test)]
mod token_stream_tests;

pub use atn::{
    Atn, AtnPrinter, AtnState, PredicateInfo, RuleIndex, StateId, StateKind, Transition,
};
pub use error::{AtnError, Error, LexError, Result};
pub use lexer::Lexer;
pub use recognizer::{GrammarRecognizer, Recognizer};
pub use token_stream::{BufferedTokenStream, Token, TokenStream};
