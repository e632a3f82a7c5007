//! Finite automata with range-labelled transitions.
//!
//! Builders accept transitions keyed on `(state, range)`; `build` runs the
//! boundary sweep to partition the alphabet into equivalence classes and
//! freezes the result into an immutable automaton whose transition table is
//! indexed by class id.

mod dfa;
mod nfa;
mod range;
mod range_list;
mod range_map;
mod sweep;
mod sym;

pub use dfa::{Dfa, DfaBuilder};
pub use nfa::{Nfa, NfaBuilder};
pub use range::{Domain, Range};
pub use range_list::RangeList;
pub use range_map::RangeMap;
pub use sym::{ClassId, StateFactory, StateId, Sym};
