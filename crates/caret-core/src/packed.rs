//! Packed 64-bit values.
//!
//! Worklists and memo tables key on pairs of small integers (state and token
//! index, rule and token index). Packing them into one `u64` keeps those keys
//! `Copy`, cheap to hash, and ordered by (high, low).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token_type::TokenType;

/// Two `u32` halves in one `u64`. Orders by `high`, then `low`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PackedPair(u64);

impl PackedPair {
    #[inline]
    pub const fn new(high: u32, low: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PackedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.high(), self.low())
    }
}

/// Closed span `start..=end` of token-stream positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenSpan(PackedPair);

impl TokenSpan {
    /// Span covering `start..=end`; the bounds are swapped if given in reverse.
    pub fn new(start: u32, end: u32) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self(PackedPair::new(start, end))
    }

    pub fn at(index: u32) -> Self {
        Self::new(index, index)
    }

    #[inline]
    pub fn start(self) -> u32 {
        self.0.high()
    }

    #[inline]
    pub fn end(self) -> u32 {
        self.0.low()
    }

    /// Number of positions covered; never zero.
    pub fn width(self) -> u32 {
        self.end() - self.start() + 1
    }

    pub fn contains(self, index: u32) -> bool {
        self.start() <= index && index <= self.end()
    }

    /// Smallest span covering both.
    pub fn union(self, other: TokenSpan) -> TokenSpan {
        TokenSpan::new(self.start().min(other.start()), self.end().max(other.end()))
    }

    pub fn as_u64(self) -> u64 {
        self.0.as_u64()
    }
}

impl fmt::Debug for TokenSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start(), self.end())
    }
}

impl fmt::Display for TokenSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start(), self.end())
    }
}

/// Bit-cast a token type (which may be negative) into a packable half.
#[inline]
pub const fn pack_token_type(t: TokenType) -> u32 {
    t as u32
}

#[inline]
pub const fn unpack_token_type(raw: u32) -> TokenType {
    raw as TokenType
}
