//! Context-free grammars and the transformation passes that canonicalize
//! them for parser construction.

mod analysis;
pub mod naming;
mod production;
mod string;
mod symbol;
mod transform;

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;

pub use analysis::{FirstSet, FirstSets, FollowSets, ParsingTable};
pub use production::{CnfProduction, Production, Productions};
pub use string::SymbolString;
pub use symbol::{NonTerminal, Symbol, Terminal};

use crate::error::{Aggregate, Error};

/// A context-free grammar `(V, Σ, R, S)`.
///
/// Grammars are value-typed: every transformation returns a fresh grammar
/// and leaves its input intact. Analyses (FIRST/FOLLOW) are computed on
/// demand and cached.
#[derive(Debug)]
pub struct Grammar {
    terminals: BTreeSet<Terminal>,
    non_terminals: BTreeSet<NonTerminal>,
    productions: Productions,
    start: NonTerminal,
    first_sets: OnceCell<FirstSets>,
    follow_sets: OnceCell<FollowSets>,
}

impl Grammar {
    pub fn new(
        terminals: BTreeSet<Terminal>,
        non_terminals: BTreeSet<NonTerminal>,
        productions: Productions,
        start: NonTerminal,
    ) -> Self {
        Self {
            terminals,
            non_terminals,
            productions,
            start,
            first_sets: OnceCell::new(),
            follow_sets: OnceCell::new(),
        }
    }

    pub fn terminals(&self) -> &BTreeSet<Terminal> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn productions(&self) -> &Productions {
        &self.productions
    }

    pub fn start(&self) -> &NonTerminal {
        &self.start
    }

    pub fn is_terminal(&self, t: &Terminal) -> bool {
        self.terminals.contains(t)
    }

    pub fn is_non_terminal(&self, n: &NonTerminal) -> bool {
        self.non_terminals.contains(n)
    }

    /// Checks the grammar invariants, accumulating every violation.
    pub fn verify(&self) -> Result<(), Aggregate> {
        let mut errors = Aggregate::new();
        if !self.non_terminals.contains(&self.start) {
            errors.push(Error::UndeclaredStart(self.start.to_string()));
        }
        if self.productions.for_head(&self.start).is_empty() {
            errors.push(Error::StartWithoutProduction(self.start.to_string()));
        }
        for nt in &self.non_terminals {
            if self.productions.for_head(nt).is_empty() && *nt != self.start {
                errors.push(Error::MissingProductions(nt.to_string()));
            }
        }
        for p in self.productions.iter() {
            if !self.non_terminals.contains(p.head()) {
                errors.push(Error::UndeclaredHead(p.head().to_string()));
            }
            for s in p.body().iter() {
                let declared = match s {
                    Symbol::Terminal(t) => self.terminals.contains(t),
                    Symbol::NonTerminal(n) => self.non_terminals.contains(n),
                };
                if !declared {
                    errors.push(Error::UndeclaredSymbol {
                        head: p.head().to_string(),
                        symbol: s.to_string(),
                    });
                }
            }
        }
        errors.into_result()
    }

    /// Non-terminals in deterministic order: those reachable from the start
    /// symbol in production order, then the rest alphabetically.
    pub fn ordered_non_terminals(&self) -> Vec<NonTerminal> {
        let mut ordered = vec![self.start.clone()];
        let mut idx = 0;
        while idx < ordered.len() {
            let nt = ordered[idx].clone();
            for p in self.productions.for_head(&nt) {
                for n in p.body().non_terminals() {
                    if !ordered.contains(n) {
                        ordered.push(n.clone());
                    }
                }
            }
            idx += 1;
        }
        for nt in &self.non_terminals {
            if !ordered.contains(nt) {
                ordered.push(nt.clone());
            }
        }
        ordered
    }

    /// Terminals in alphabetic order.
    pub fn ordered_terminals(&self) -> Vec<Terminal> {
        self.terminals.iter().cloned().collect()
    }

    /// The FIRST table of this grammar: for every symbol, the terminals that
    /// can begin a string derived from it.
    pub fn first_sets(&self) -> &FirstSets {
        self.first_sets.get_or_init(|| FirstSets::compute(self))
    }

    /// The FOLLOW table of this grammar: for every non-terminal, the
    /// terminals that can appear immediately after it in a sentential form.
    pub fn follow_sets(&self) -> &FollowSets {
        self.follow_sets.get_or_init(|| FollowSets::compute(self))
    }
}

/// Deep copy; analysis caches are not carried over.
impl Clone for Grammar {
    fn clone(&self) -> Self {
        Self::new(
            self.terminals.clone(),
            self.non_terminals.clone(),
            self.productions.clone(),
            self.start.clone(),
        )
    }
}

impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.terminals == other.terminals
            && self.non_terminals == other.non_terminals
            && self.productions == other.productions
    }
}

impl Eq for Grammar {}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for nt in self.ordered_non_terminals() {
            for p in self.productions.for_head(&nt) {
                writeln!(f, "{p}")?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::test_support::grammar;
    use super::*;

    #[test]
    fn verify_accepts_a_well_formed_grammar() {
        let g = grammar(&["S -> a S | b"]);
        assert!(g.verify().is_ok());
    }

    #[test]
    fn verify_accumulates_every_violation() {
        let mut productions = Productions::new();
        productions.add(Production::new(
            NonTerminal::new("A"),
            SymbolString::new([Symbol::terminal("x"), Symbol::non_terminal("B")]),
        ));
        let g = Grammar::new(
            BTreeSet::new(),
            [NonTerminal::new("C")].into_iter().collect(),
            productions,
            NonTerminal::new("S"),
        );
        let errors = g.verify().unwrap_err();
        assert!(errors.is(|e| matches!(e, Error::UndeclaredStart(_))));
        assert!(errors.is(|e| matches!(e, Error::StartWithoutProduction(_))));
        assert!(errors.is(|e| matches!(e, Error::MissingProductions(_))));
        assert!(errors.is(|e| matches!(e, Error::UndeclaredHead(_))));
        assert!(errors.is(|e| matches!(e, Error::UndeclaredSymbol { .. })));
    }

    #[test]
    fn non_terminal_order_is_reachability_then_alphabetic() {
        let g = grammar(&[
            "S -> A b",
            "A -> C d",
            "C -> c",
            "Z -> z", // unreachable, sorts after the reachable ones
            "B -> A",
        ]);
        let names: Vec<String> = g
            .ordered_non_terminals()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, vec!["S", "A", "C", "B", "Z"]);
    }

    #[test]
    fn clone_is_deep_and_equality_structural() {
        let g = grammar(&["S -> a S | b"]);
        let h = g.clone();
        assert_eq!(g, h);
        let other = grammar(&["S -> a S | c"]);
        assert_ne!(g, other);
    }
}
