use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::range::{Domain, Range};
use super::range_map::RangeMap;
use super::sweep;
use super::sym::{ClassId, StateId, Sym};

/// Mutable shell for a non-deterministic automaton. Adding a transition over
/// a range that overlaps earlier ones resolves by union of the target sets
/// on the overlapped portions.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    start: StateId,
    accepting: BTreeSet<StateId>,
    raw: BTreeMap<StateId, RangeMap<Sym, BTreeSet<StateId>>>,
}

impl NfaBuilder {
    pub fn new(start: StateId) -> Self {
        Self {
            start,
            ..Default::default()
        }
    }

    pub fn add_accepting(&mut self, state: StateId) -> &mut Self {
        self.accepting.insert(state);
        self
    }

    pub fn add_transition(&mut self, from: StateId, range: Range<Sym>, to: StateId) -> &mut Self {
        assert!(
            !range.contains(Sym::EPSILON),
            "epsilon must not appear in an alphabet range: {range}"
        );
        let entry = self.raw.entry(from).or_default();

        // split the new range against the existing entries: overlapped
        // portions take the union, gaps take the singleton
        let overlaps: Vec<(Range<Sym>, BTreeSet<StateId>)> = entry
            .overlapping(&range)
            .map(|(r, targets)| (*r, targets.clone()))
            .collect();

        let mut pieces: Vec<(Range<Sym>, BTreeSet<StateId>)> = Vec::new();
        let mut cursor = range.lo();
        for (r, mut targets) in overlaps {
            let overlap = match r.intersect(&range) {
                Some(o) => o,
                None => continue,
            };
            if cursor < overlap.lo() {
                pieces.push((
                    Range::span(cursor, overlap.lo().pred()),
                    BTreeSet::from([to]),
                ));
            }
            targets.insert(to);
            pieces.push((overlap, targets));
            cursor = overlap.hi().succ();
        }
        if cursor <= range.hi() {
            pieces.push((Range::span(cursor, range.hi()), BTreeSet::from([to])));
        }

        for (r, targets) in pieces {
            entry.insert(r, targets);
        }
        self
    }

    /// Maps `range` to exactly `targets`, replacing whatever the overlapped
    /// portions mapped to before. Use [`NfaBuilder::add_transition`] to union
    /// a single target in instead.
    pub fn set_transition(
        &mut self,
        from: StateId,
        range: Range<Sym>,
        targets: BTreeSet<StateId>,
    ) -> &mut Self {
        assert!(
            !range.contains(Sym::EPSILON),
            "epsilon must not appear in an alphabet range: {range}"
        );
        self.raw.entry(from).or_default().insert(range, targets);
        self
    }

    /// Consumes the builder, partitions the alphabet and freezes the
    /// transition table.
    pub fn build(self) -> Nfa {
        let partition = sweep::partition(&self.raw);
        Nfa {
            start: self.start,
            accepting: self.accepting,
            class_of: partition.class_of,
            transitions: partition.transitions,
        }
    }
}

/// An immutable non-deterministic automaton. Identical in shape to
/// [`super::Dfa`] except that a `(state, class)` pair maps to a set of
/// target states.
#[derive(Debug, Clone)]
pub struct Nfa {
    start: StateId,
    accepting: BTreeSet<StateId>,
    class_of: RangeMap<Sym, ClassId>,
    transitions: BTreeMap<StateId, BTreeMap<ClassId, BTreeSet<StateId>>>,
}

impl Nfa {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accepting(&self) -> &BTreeSet<StateId> {
        &self.accepting
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    pub fn class_of(&self) -> &RangeMap<Sym, ClassId> {
        &self.class_of
    }

    pub fn class_of_sym(&self, sym: Sym) -> Option<ClassId> {
        self.class_of.get(sym).map(|(_, &c)| c)
    }

    pub fn transition(&self, state: StateId, class: ClassId) -> Option<&BTreeSet<StateId>> {
        self.transitions.get(&state)?.get(&class)
    }

    pub fn transitions(
        &self,
        state: StateId,
    ) -> impl Iterator<Item = (ClassId, &BTreeSet<StateId>)> + '_ {
        self.transitions
            .get(&state)
            .into_iter()
            .flat_map(|t| t.iter().map(|(&c, s)| (c, s)))
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.keys().copied()
    }
}

/// Same equality approximation as for [`super::Dfa`]: the transition table
/// is not compared.
impl PartialEq for Nfa {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.accepting == other.accepting
            && self.class_of == other.class_of
    }
}

impl Eq for Nfa {}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}, accepting: {:?}", self.start, self.accepting)?;
        writeln!(f, "classes: {}", self.class_of)?;
        for (state, targets) in &self.transitions {
            write!(f, "{state:>5} |")?;
            for (class, target) in targets {
                write!(f, " {class}->{target:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rng(lo: char, hi: char) -> Range<Sym> {
        Range::new(Sym::from(lo), Sym::from(hi)).unwrap()
    }

    fn targets(nfa: &Nfa, c: char) -> BTreeSet<StateId> {
        let class = nfa.class_of_sym(Sym::from(c)).unwrap();
        nfa.transition(0, class).unwrap().clone()
    }

    #[test]
    fn overlapping_adds_union_targets() {
        let mut builder = NfaBuilder::new(0);
        builder
            .add_transition(0, rng('a', 'm'), 1)
            .add_transition(0, rng('h', 'z'), 2);
        let nfa = builder.build();

        assert_eq!(targets(&nfa, 'a'), BTreeSet::from([1]));
        assert_eq!(targets(&nfa, 'h'), BTreeSet::from([1, 2]));
        assert_eq!(targets(&nfa, 'z'), BTreeSet::from([2]));
    }

    #[test]
    fn layered_overlaps_partition_into_slabs() {
        let mut builder = NfaBuilder::new(0);
        builder
            .add_transition(0, rng('a', 'w'), 10)
            .add_transition(0, rng('a', 'w'), 11)
            .add_transition(0, rng('i', 'm'), 12)
            .add_transition(0, rng('i', 'm'), 13)
            .add_transition(0, rng('r', 'w'), 12)
            .add_transition(0, rng('r', 'w'), 13)
            .add_transition(0, rng('v', 'z'), 14)
            .add_transition(0, rng('v', 'z'), 15);
        let nfa = builder.build();

        assert_eq!(targets(&nfa, 'a'), BTreeSet::from([10, 11]));
        assert_eq!(targets(&nfa, 'i'), BTreeSet::from([10, 11, 12, 13]));
        assert_eq!(targets(&nfa, 'n'), BTreeSet::from([10, 11]));
        assert_eq!(targets(&nfa, 'r'), BTreeSet::from([10, 11, 12, 13]));
        assert_eq!(targets(&nfa, 'v'), BTreeSet::from([10, 11, 12, 13, 14, 15]));
        assert_eq!(targets(&nfa, 'x'), BTreeSet::from([14, 15]));
        // [a..h] and [n..q] behave identically and share a class
        assert_eq!(
            nfa.class_of_sym(Sym::from('a')),
            nfa.class_of_sym(Sym::from('n'))
        );
        // [i..m] and [r..u] likewise
        assert_eq!(
            nfa.class_of_sym(Sym::from('i')),
            nfa.class_of_sym(Sym::from('r'))
        );
    }

    #[test]
    fn equality_compares_class_map_and_accepting() {
        let mut a = NfaBuilder::new(0);
        a.add_accepting(1).add_transition(0, rng('a', 'c'), 1);
        let mut b = NfaBuilder::new(0);
        b.add_accepting(1).add_transition(0, rng('a', 'c'), 1);
        assert_eq!(a.build(), b.build());

        let mut c = NfaBuilder::new(0);
        c.add_accepting(2).add_transition(0, rng('a', 'c'), 1);
        let mut d = NfaBuilder::new(0);
        d.add_accepting(1).add_transition(0, rng('a', 'c'), 1);
        assert_ne!(c.build(), d.build());
    }
}
