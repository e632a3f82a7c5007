use std::fmt;

use crate::error::Error;

/// A discrete totally ordered domain with successor and predecessor.
///
/// `succ`/`pred` are only ever called on values that have one: ranges are
/// inclusive, and the algorithms guard the comparisons before stepping.
pub trait Domain: Copy + Ord + fmt::Debug + fmt::Display {
    fn succ(self) -> Self;
    fn pred(self) -> Self;
}

macro_rules! int_domain {
    ($($t:ty),*) => {
        $(impl Domain for $t {
            fn succ(self) -> Self {
                self + 1
            }

            fn pred(self) -> Self {
                self - 1
            }
        })*
    };
}

int_domain!(i32, u8, u32, u64);

/// An inclusive `[lo, hi]` range over a discrete ordered domain.
///
/// `lo <= hi` holds for every constructed range; [`Range::new`] rejects the
/// rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range<T> {
    lo: T,
    hi: T,
}

impl<T: Domain> Range<T> {
    pub fn new(lo: T, hi: T) -> Result<Self, Error> {
        if lo > hi {
            return Err(Error::InvalidRange {
                lo: lo.to_string(),
                hi: hi.to_string(),
            });
        }
        Ok(Self { lo, hi })
    }

    /// Internal constructor for bounds already known to be ordered.
    pub(crate) fn span(lo: T, hi: T) -> Self {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    pub fn lo(&self) -> T {
        self.lo
    }

    pub fn hi(&self) -> T {
        self.hi
    }

    pub fn contains(&self, v: T) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// Whether this range ends exactly one position before `other` starts.
    pub fn adjacent_before(&self, other: &Self) -> bool {
        self.hi < other.lo && self.hi.succ() == other.lo
    }

    /// Whether this range starts exactly one position after `other` ends.
    pub fn adjacent_after(&self, other: &Self) -> bool {
        other.adjacent_before(self)
    }

    /// Componentwise max/min intersection; `None` when disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Self { lo, hi })
    }

    /// Removes `other` from this range, leaving up to two disjoint
    /// remainders: the part below `other` and the part above it.
    pub fn subtract(&self, other: &Self) -> (Option<Self>, Option<Self>) {
        let left = (self.lo < other.lo)
            .then(|| Self::span(self.lo, self.hi.min(other.lo.pred())));
        let right = (self.hi > other.hi)
            .then(|| Self::span(self.lo.max(other.hi.succ()), self.hi));
        (left, right)
    }
}

impl<T: Domain> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == self.hi {
            write!(f, "[{}]", self.lo)
        } else {
            write!(f, "[{}..{}]", self.lo, self.hi)
        }
    }
}
