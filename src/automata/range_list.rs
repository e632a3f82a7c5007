use std::fmt;

use super::range::{Domain, Range};

/// An ordered list of non-overlapping, non-touching ranges.
///
/// Every mutation restores the two invariants: entries are strictly
/// ascending by `lo`, and no two entries overlap or touch (the union of two
/// neighbours is never expressible as a single range).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeList<T> {
    entries: Vec<Range<T>>,
}

impl<T: Domain> RangeList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<T>> {
        self.entries.iter()
    }

    /// Returns the unique entry containing `v`, if any.
    pub fn get(&self, v: T) -> Option<&Range<T>> {
        let idx = self.entries.partition_point(|e| e.hi() < v);
        self.entries.get(idx).filter(|e| e.contains(v))
    }

    pub fn contains(&self, v: T) -> bool {
        self.get(v).is_some()
    }

    /// Inserts a range, merging it with every entry it overlaps or touches.
    pub fn add(&mut self, r: Range<T>) {
        let mut lo = r.lo();
        let mut hi = r.hi();
        // first entry that overlaps or touches r
        let start = self
            .entries
            .partition_point(|e| e.hi() < lo && e.hi().succ() < lo);
        let mut end = start;
        while end < self.entries.len() {
            let e = &self.entries[end];
            if e.lo() > hi && e.lo().pred() > hi {
                break;
            }
            lo = lo.min(e.lo());
            hi = hi.max(e.hi());
            end += 1;
        }
        self.entries
            .splice(start..end, std::iter::once(Range::span(lo, hi)));
    }

    /// Removes every value of `r` from the list, splitting entries that
    /// straddle its bounds.
    pub fn remove(&mut self, r: &Range<T>) {
        let mut idx = self.entries.partition_point(|e| e.hi() < r.lo());
        while idx < self.entries.len() && self.entries[idx].lo() <= r.hi() {
            let (left, right) = self.entries[idx].subtract(r);
            match (left, right) {
                (Some(l), Some(rr)) => {
                    self.entries[idx] = l;
                    self.entries.insert(idx + 1, rr);
                    return;
                }
                (Some(l), None) => {
                    self.entries[idx] = l;
                    idx += 1;
                }
                (None, Some(rr)) => {
                    self.entries[idx] = rr;
                    return;
                }
                (None, None) => {
                    self.entries.remove(idx);
                }
            }
        }
    }
}

impl<T: Domain> FromIterator<Range<T>> for RangeList<T> {
    fn from_iter<I: IntoIterator<Item = Range<T>>>(iter: I) -> Self {
        let mut list = Self::new();
        for r in iter {
            list.add(r);
        }
        list
    }
}

impl<T: Domain> fmt::Display for RangeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn r(lo: i32, hi: i32) -> Range<i32> {
        Range::new(lo, hi).unwrap()
    }

    #[test]
    fn disjoint_entries_stay_separate() {
        let list: RangeList<i32> = [r(0, 3), r(10, 12)].into_iter().collect();
        assert_eq!(list.len(), 2);
        assert!(list.contains(0));
        assert!(list.contains(12));
        assert!(!list.contains(4));
    }

    #[test]
    fn touching_entries_merge() {
        let list: RangeList<i32> = [r(0, 3), r(4, 6)].into_iter().collect();
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(5), Some(&r(0, 6)));
    }

    #[test]
    fn overlapping_entries_merge() {
        let list: RangeList<i32> = [r(0, 5), r(3, 9), r(11, 12), r(8, 10)]
            .into_iter()
            .collect();
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0), Some(&r(0, 12)));
    }

    #[test]
    fn remove_splits_an_entry() {
        let mut list: RangeList<i32> = [r(0, 9)].into_iter().collect();
        list.remove(&r(3, 5));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![r(0, 2), r(6, 9)]);
    }

    #[test]
    fn remove_spanning_several_entries() {
        let mut list: RangeList<i32> = [r(0, 2), r(4, 6), r(8, 10)].into_iter().collect();
        list.remove(&r(1, 9));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![r(0, 0), r(10, 10)]);
    }

    #[test]
    fn remove_whole_entry() {
        let mut list: RangeList<i32> = [r(0, 2), r(4, 6)].into_iter().collect();
        list.remove(&r(4, 6));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![r(0, 2)]);
    }

    proptest! {
        #[test]
        fn invariants_hold_after_arbitrary_mutations(
            ops in prop::collection::vec((any::<bool>(), -200i32..200, 0i32..40), 0..60)
        ) {
            let mut list = RangeList::new();
            for (add, lo, len) in ops {
                let range = r(lo, lo + len);
                if add {
                    list.add(range);
                } else {
                    list.remove(&range);
                }
                // ascending, non-overlapping, non-touching
                for w in list.entries.windows(2) {
                    prop_assert!(w[0].hi().succ() < w[1].lo());
                }
            }
        }
    }
}
