use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::range::Range;
use super::range_map::RangeMap;
use super::sweep;
use super::sym::{ClassId, StateId, Sym};

/// Mutable shell for a deterministic automaton. Transitions are keyed on
/// `(state, range)`; adding over an overlapping range replaces the old
/// target on the overlapped portion.
#[derive(Debug, Default)]
pub struct DfaBuilder {
    start: StateId,
    accepting: BTreeSet<StateId>,
    raw: BTreeMap<StateId, RangeMap<Sym, StateId>>,
}

impl DfaBuilder {
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
        self.raw.entry(from).or_default().insert(range, to);
        self
    }

    /// Consumes the builder, partitions the alphabet and freezes the
    /// transition table.
    pub fn build(self) -> Dfa {
        let partition = sweep::partition(&self.raw);
        Dfa {
            start: self.start,
            accepting: self.accepting,
            class_of: partition.class_of,
            transitions: partition.transitions,
        }
    }
}

/// An immutable deterministic automaton: start state, accepting set, the
/// range to class-id partition of the alphabet, and a per-state transition
/// table indexed by class id.
#[derive(Debug, Clone)]
pub struct Dfa {
    start: StateId,
    accepting: BTreeSet<StateId>,
    class_of: RangeMap<Sym, ClassId>,
    transitions: BTreeMap<StateId, BTreeMap<ClassId, StateId>>,
}

impl Dfa {
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

    /// The equivalence class of an input symbol, if it belongs to the
    /// alphabet.
    pub fn class_of_sym(&self, sym: Sym) -> Option<ClassId> {
        self.class_of.get(sym).map(|(_, &c)| c)
    }

    pub fn transition(&self, state: StateId, class: ClassId) -> Option<StateId> {
        self.transitions.get(&state)?.get(&class).copied()
    }

    pub fn transitions(&self, state: StateId) -> impl Iterator<Item = (ClassId, StateId)> + '_ {
        self.transitions
            .get(&state)
            .into_iter()
            .flat_map(|t| t.iter().map(|(&c, &s)| (c, s)))
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.keys().copied()
    }
}

/// Equality compares start, accepting set and class map structurally. The
/// transition table is implied by the class map for automata built from the
/// same raw transitions, and is deliberately left out to keep the check
/// cheap.
impl PartialEq for Dfa {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.accepting == other.accepting
            && self.class_of == other.class_of
    }
}

impl Eq for Dfa {}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}, accepting: {:?}", self.start, self.accepting)?;
        writeln!(f, "classes: {}", self.class_of)?;
        for (state, targets) in &self.transitions {
            write!(f, "{state:>5} |")?;
            for (class, target) in targets {
                write!(f, " {class}->{target}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
