#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for caret.
//!
//! - **Grammar model**: parser/token rules as written, loadable from the
//!   grammar notation, JSON, or postcard binary
//! - **Token sets**: `IntervalSet` over token types, plus the `Vocabulary`
//!   that names them
//! - **Packed values**: two-`u32` keys and token spans in one `u64`

pub mod colors;
pub mod grammar;
pub mod interval_set;
pub mod packed;
pub mod token_type;
pub mod vocabulary;

#[cfg(test)]
mod vocabulary_tests;

pub use colors::Colors;
pub use grammar::{Channel, Grammar, GrammarError, Rule, TokenDef, TokenPattern};
pub use interval_set::{Interval, IntervalSet};
pub use packed::{PackedPair, TokenSpan};
pub use token_type::{EOF, EPSILON, INVALID_TYPE, MIN_USER_TOKEN_TYPE, TokenType};
pub use vocabulary::Vocabulary;
