use std::fmt;

use super::range::{Domain, Range};

/// An ordered map from ranges to values.
///
/// Entries are strictly ascending by `lo`, never overlap, and two touching
/// entries never carry equal values (they are merged on the spot). Inserting
/// over existing entries splits them: the portions outside the new range keep
/// their value, the overlapped portion takes the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMap<T, V> {
    entries: Vec<(Range<T>, V)>,
}

impl<T, V> Default for RangeMap<T, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Domain, V: Clone + PartialEq> RangeMap<T, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Range<T>, &V)> {
        self.entries.iter().map(|(r, v)| (r, v))
    }

    /// Returns the entry containing `v`, if any.
    pub fn get(&self, v: T) -> Option<(&Range<T>, &V)> {
        let idx = self.entries.partition_point(|(r, _)| r.hi() < v);
        self.entries
            .get(idx)
            .filter(|(r, _)| r.contains(v))
            .map(|(r, val)| (r, val))
    }

    /// The entries intersecting `range`, in ascending order.
    pub fn overlapping<'a>(
        &'a self,
        range: &'a Range<T>,
    ) -> impl Iterator<Item = (&'a Range<T>, &'a V)> {
        let idx = self.entries.partition_point(|(r, _)| r.hi() < range.lo());
        self.entries[idx..]
            .iter()
            .take_while(move |(r, _)| r.lo() <= range.hi())
            .map(|(r, v)| (r, v))
    }

    /// Maps `range` to `value`, overriding whatever the overlapped portions
    /// mapped to before.
    pub fn insert(&mut self, range: Range<T>, value: V) {
        self.remove(&range);
        let idx = self
            .entries
            .partition_point(|(r, _)| r.lo() < range.lo());
        self.entries.insert(idx, (range, value));
        self.entries = Self::coalesce(std::mem::take(&mut self.entries));
    }

    /// Unmaps every value of `range`, splitting straddling entries.
    pub fn remove(&mut self, range: &Range<T>) {
        let mut idx = self.entries.partition_point(|(r, _)| r.hi() < range.lo());
        while idx < self.entries.len() && self.entries[idx].0.lo() <= range.hi() {
            let (left, right) = self.entries[idx].0.subtract(range);
            match (left, right) {
                (Some(l), Some(r)) => {
                    let value = self.entries[idx].1.clone();
                    self.entries[idx].0 = l;
                    self.entries.insert(idx + 1, (r, value));
                    return;
                }
                (Some(l), None) => {
                    self.entries[idx].0 = l;
                    idx += 1;
                }
                (None, Some(r)) => {
                    self.entries[idx].0 = r;
                    return;
                }
                (None, None) => {
                    self.entries.remove(idx);
                }
            }
        }
    }

    /// Rebuilds a canonical entry list from a stream sorted by ascending
    /// `lo`. Later entries win over the overlapped tail of earlier ones; a
    /// later entry falling strictly inside an earlier one with a different
    /// value splits it. Touching entries with equal values merge.
    ///
    /// Every combination of (`curr.lo` vs `last.hi`, `curr.hi` vs `last.hi`,
    /// value equality) is handled; dropping one silently breaks the ordering
    /// invariant.
    fn coalesce(entries: Vec<(Range<T>, V)>) -> Vec<(Range<T>, V)> {
        let mut out: Vec<(Range<T>, V)> = Vec::with_capacity(entries.len());
        for (curr, value) in entries {
            let Some((last, last_value)) = out.last_mut() else {
                out.push((curr, value));
                continue;
            };
            let eq = *last_value == value;
            if curr.lo() > last.hi() && curr.lo() > last.hi().succ() {
                // disjoint, not touching
                out.push((curr, value));
            } else if curr.lo() > last.hi() {
                // touching
                if eq {
                    *last = Range::span(last.lo(), curr.hi());
                } else {
                    out.push((curr, value));
                }
            } else if curr.hi() < last.hi() {
                // curr strictly inside last
                if !eq {
                    let tail = Range::span(curr.hi().succ(), last.hi());
                    let tail_value = last_value.clone();
                    if curr.lo() > last.lo() {
                        *last = Range::span(last.lo(), curr.lo().pred());
                        out.push((curr, value));
                    } else {
                        *last = curr;
                        *last_value = value;
                    }
                    out.push((tail, tail_value));
                }
                // equal values: curr adds nothing
            } else if curr.hi() == last.hi() {
                if !eq {
                    if curr.lo() > last.lo() {
                        *last = Range::span(last.lo(), curr.lo().pred());
                        out.push((curr, value));
                    } else {
                        *last = curr;
                        *last_value = value;
                    }
                }
            } else {
                // curr extends past last
                if eq {
                    *last = Range::span(last.lo(), curr.hi());
                } else if curr.lo() > last.lo() {
                    *last = Range::span(last.lo(), curr.lo().pred());
                    out.push((curr, value));
                } else {
                    *last = curr;
                    *last_value = value;
                }
            }
        }
        out
    }
}

impl<T: Domain, V: Clone + PartialEq> FromIterator<(Range<T>, V)> for RangeMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (Range<T>, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (r, v) in iter {
            map.insert(r, v);
        }
        map
    }
}

impl<T: Domain, V: fmt::Display> fmt::Display for RangeMap<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (r, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{r}={v}")?;
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

    fn entries(map: &RangeMap<i32, u8>) -> Vec<(Range<i32>, u8)> {
        map.iter().map(|(r, v)| (*r, *v)).collect()
    }

    #[test]
    fn disjoint_inserts() {
        let map: RangeMap<i32, u8> = [(r(0, 3), 1), (r(10, 12), 2)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 3), 1), (r(10, 12), 2)]);
    }

    #[test]
    fn touching_equal_values_merge() {
        let map: RangeMap<i32, u8> = [(r(0, 3), 1), (r(4, 6), 1)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 6), 1)]);
    }

    #[test]
    fn touching_different_values_stay_separate() {
        let map: RangeMap<i32, u8> = [(r(0, 3), 1), (r(4, 6), 2)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 3), 1), (r(4, 6), 2)]);
    }

    #[test]
    fn inner_insert_same_value_is_dropped() {
        let map: RangeMap<i32, u8> = [(r(0, 9), 1), (r(3, 5), 1)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 9), 1)]);
    }

    #[test]
    fn inner_insert_different_value_splits() {
        let map: RangeMap<i32, u8> = [(r(0, 9), 1), (r(3, 5), 2)].into_iter().collect();
        assert_eq!(
            entries(&map),
            vec![(r(0, 2), 1), (r(3, 5), 2), (r(6, 9), 1)]
        );
    }

    #[test]
    fn aligned_tail_insert_different_value_truncates() {
        let map: RangeMap<i32, u8> = [(r(0, 9), 1), (r(5, 9), 2)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 4), 1), (r(5, 9), 2)]);
    }

    #[test]
    fn aligned_tail_insert_same_value_is_dropped() {
        let map: RangeMap<i32, u8> = [(r(0, 9), 1), (r(5, 9), 1)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 9), 1)]);
    }

    #[test]
    fn extending_insert_same_value_extends() {
        let map: RangeMap<i32, u8> = [(r(0, 5), 1), (r(3, 9), 1)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 9), 1)]);
    }

    #[test]
    fn extending_insert_different_value_truncates() {
        let map: RangeMap<i32, u8> = [(r(0, 5), 1), (r(3, 9), 2)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 2), 1), (r(3, 9), 2)]);
    }

    #[test]
    fn insert_overriding_head_of_entry() {
        let map: RangeMap<i32, u8> = [(r(5, 9), 1), (r(0, 7), 2)].into_iter().collect();
        assert_eq!(entries(&map), vec![(r(0, 7), 2), (r(8, 9), 1)]);
    }

    #[test]
    fn insert_spanning_several_entries() {
        let map: RangeMap<i32, u8> = [(r(0, 2), 1), (r(4, 6), 2), (r(8, 10), 3), (r(1, 9), 4)]
            .into_iter()
            .collect();
        assert_eq!(
            entries(&map),
            vec![(r(0, 0), 1), (r(1, 9), 4), (r(10, 10), 3)]
        );
    }

    #[test]
    fn remove_splits_entries() {
        let mut map: RangeMap<i32, u8> = [(r(0, 9), 1)].into_iter().collect();
        map.remove(&r(3, 5));
        assert_eq!(entries(&map), vec![(r(0, 2), 1), (r(6, 9), 1)]);
    }

    #[test]
    fn lookup() {
        let map: RangeMap<i32, u8> = [(r(0, 3), 1), (r(10, 12), 2)].into_iter().collect();
        assert_eq!(map.get(2), Some((&r(0, 3), &1)));
        assert_eq!(map.get(10), Some((&r(10, 12), &2)));
        assert_eq!(map.get(5), None);
    }

    #[test]
    fn overlapping_entries() {
        let map: RangeMap<i32, u8> = [(r(0, 2), 1), (r(4, 6), 2), (r(8, 10), 3)]
            .into_iter()
            .collect();
        let hits: Vec<_> = map.overlapping(&r(5, 9)).map(|(r, v)| (*r, *v)).collect();
        assert_eq!(hits, vec![(r(4, 6), 2), (r(8, 10), 3)]);
    }

    proptest! {
        #[test]
        fn invariants_hold_after_arbitrary_mutations(
            ops in prop::collection::vec(
                (any::<bool>(), -200i32..200, 0i32..40, 0u8..4),
                0..60,
            )
        ) {
            let mut map: RangeMap<i32, u8> = RangeMap::new();
            for (add, lo, len, v) in ops {
                let range = r(lo, lo + len);
                if add {
                    map.insert(range, v);
                } else {
                    map.remove(&range);
                }
                for w in map.entries.windows(2) {
                    let ((a, av), (b, bv)) = (&w[0], &w[1]);
                    prop_assert!(a.hi() < b.lo());
                    // touching neighbours must differ in value
                    if a.hi().succ() == b.lo() {
                        prop_assert_ne!(av, bv);
                    }
                }
            }
        }

        #[test]
        fn get_round_trips_after_insert(
            seed in prop::collection::vec((-200i32..200, 0i32..40, 0u8..4), 0..20),
            lo in -200i32..200,
            len in 0i32..40,
            v in 0u8..4,
        ) {
            let mut map: RangeMap<i32, u8> = seed
                .into_iter()
                .map(|(lo, len, v)| (r(lo, lo + len), v))
                .collect();
            let range = r(lo, lo + len);
            map.insert(range, v);
            for x in [range.lo(), range.hi(), range.lo() + len / 2] {
                let (found, value) = map.get(x).unwrap();
                prop_assert_eq!(*value, v);
                // the found entry covers at least the inserted range around x
                prop_assert!(found.contains(x));
                prop_assert!(found.lo() <= range.lo() && found.hi() >= range.hi());
            }
        }
    }
}
