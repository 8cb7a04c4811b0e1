//! Sets of token types stored as sorted, disjoint, closed intervals.
//!
//! Adjacent and overlapping ranges are merged on insertion, so two sets with
//! the same members always compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token_type::{EOF, TokenType};
use crate::vocabulary::Vocabulary;

/// Closed interval `start..=end` of token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: TokenType,
    pub end: TokenType,
}

impl Interval {
    pub fn new(start: TokenType, end: TokenType) -> Self {
        debug_assert!(start <= end, "interval start after end");
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, t: TokenType) -> bool {
        self.start <= t && t <= self.end
    }

    /// Number of members; never zero.
    pub fn width(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set with one member.
    pub fn of(t: TokenType) -> Self {
        Self::of_range(t, t)
    }

    /// Set holding `start..=end`. Empty when `start > end`.
    pub fn of_range(start: TokenType, end: TokenType) -> Self {
        let mut set = Self::new();
        set.add_range(start, end);
        set
    }

    pub fn add(&mut self, t: TokenType) {
        self.add_range(t, t);
    }

    pub fn add_range(&mut self, start: TokenType, end: TokenType) {
        if start > end {
            return;
        }

        // First interval that could touch the new one (its end reaches start - 1).
        let lo = self
            .intervals
            .partition_point(|iv| i64::from(iv.end) + 1 < i64::from(start));
        let mut merged = Interval::new(start, end);
        let mut hi = lo;
        while hi < self.intervals.len()
            && i64::from(self.intervals[hi].start) <= i64::from(merged.end) + 1
        {
            merged.start = merged.start.min(self.intervals[hi].start);
            merged.end = merged.end.max(self.intervals[hi].end);
            hi += 1;
        }
        self.intervals.splice(lo..hi, std::iter::once(merged));
    }

    pub fn add_set(&mut self, other: &IntervalSet) {
        for iv in &other.intervals {
            self.add_range(iv.start, iv.end);
        }
    }

    pub fn contains(&self, t: TokenType) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.end < t);
        self.intervals.get(idx).is_some_and(|iv| iv.contains(t))
    }

    /// Number of member token types.
    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TokenType> + '_ {
        self.intervals.iter().flat_map(|iv| iv.start..=iv.end)
    }

    pub fn to_vec(&self) -> Vec<TokenType> {
        self.iter().collect()
    }

    /// The only member, if the set has exactly one.
    pub fn single(&self) -> Option<TokenType> {
        match self.intervals.as_slice() {
            [iv] if iv.start == iv.end => Some(iv.start),
            _ => None,
        }
    }

    /// Members of `min..=max` that are not in this set.
    pub fn complement(&self, min: TokenType, max: TokenType) -> IntervalSet {
        let mut out = IntervalSet::new();
        if min > max {
            return out;
        }

        let mut next = i64::from(min);
        for iv in &self.intervals {
            if iv.end < min {
                continue;
            }
            if iv.start > max {
                break;
            }
            if i64::from(iv.start) > next {
                out.intervals
                    .push(Interval::new(next as TokenType, iv.start - 1));
            }
            next = next.max(i64::from(iv.end) + 1);
        }
        if next <= i64::from(max) {
            out.intervals.push(Interval::new(next as TokenType, max));
        }
        out
    }

    /// Render members with vocabulary names: `{'=', ID}`.
    pub fn display_with<'a>(&'a self, vocabulary: &'a Vocabulary) -> impl fmt::Display + 'a {
        NamedSet {
            set: self,
            vocabulary,
        }
    }
}

impl FromIterator<TokenType> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = TokenType>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for t in iter {
            set.add(t);
        }
        set
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(t) = self.single() {
            return write_type(f, t);
        }
        f.write_str("{")?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_type(f, iv.start)?;
            if iv.end != iv.start {
                f.write_str("..")?;
                write_type(f, iv.end)?;
            }
        }
        f.write_str("}")
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, t: TokenType) -> fmt::Result {
    if t == EOF {
        f.write_str("<EOF>")
    } else {
        write!(f, "{t}")
    }
}

struct NamedSet<'a> {
    set: &'a IntervalSet,
    vocabulary: &'a Vocabulary,
}

impl fmt::Display for NamedSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, t) in self.set.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&self.vocabulary.display_name(t))?;
        }
        f.write_str("}")
    }
}
