//! Grammar types for ANTLR-flavoured grammars.
//!
//! A grammar is read from its text notation, from JSON, or from the compact
//! postcard binary form. The model keeps rules as written; lowering to an
//! ATN happens in `caret-runtime`.

mod binary;
mod error;
mod json;
mod lexer;
mod parser;
mod types;

#[cfg(test)]
mod parser_tests;

pub use error::GrammarError;
pub use types::{Channel, Grammar, Rule, TokenDef, TokenPattern};
