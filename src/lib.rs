//! Building blocks for lexer and parser construction: finite automata with
//! range-labelled transitions over a compressed alphabet, and context-free
//! grammar canonicalization (ε, unit, unreachable and left-recursion
//! elimination, left-factoring, Chomsky normal form) with FIRST/FOLLOW
//! analysis and LL(1) parsing-table construction.
//!
//! Automata builders accept transitions labelled with inclusive symbol
//! ranges; building partitions the alphabet into equivalence classes so the
//! frozen transition tables are indexed by class id instead of symbol:
//!
//! ```
//! use kleene::automata::{DfaBuilder, Range, Sym};
//!
//! let mut builder = DfaBuilder::new(0);
//! builder
//!     .add_accepting(10)
//!     .add_transition(0, Range::new(Sym::from('0'), Sym::from('9'))?, 0)
//!     .add_transition(0, Range::new(Sym::from('a'), Sym::from('z'))?, 10);
//! let dfa = builder.build();
//!
//! // every letter behaves the same, so the letters share a class
//! assert_eq!(dfa.class_of_sym(Sym::from('b')), dfa.class_of_sym(Sym::from('q')));
//! assert!(dfa.is_accepting(10));
//! # Ok::<_, kleene::error::Error>(())
//! ```
//!
//! Grammars are value-typed: every transformation pass returns a fresh
//! [`grammar::Grammar`] and leaves its input intact.

pub mod automata;
pub mod error;
pub mod grammar;

pub mod prelude {
    pub use crate::automata::{
        ClassId, Dfa, DfaBuilder, Domain, Nfa, NfaBuilder, Range, RangeList, RangeMap,
        StateFactory, StateId, Sym,
    };
    pub use crate::error::{Aggregate, Error};
    pub use crate::grammar::{
        CnfProduction, FirstSet, FirstSets, FollowSets, Grammar, NonTerminal, ParsingTable,
        Production, Productions, Symbol, SymbolString, Terminal,
    };
}
