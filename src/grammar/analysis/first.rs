use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{Grammar, Symbol, SymbolString, Terminal};

/// The set of terminals that can begin a string derived from a symbol, plus
/// possibly ε.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    terminals: BTreeSet<Terminal>,
    epsilon: bool,
}

impl FirstSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, t: Terminal) {
        self.terminals.insert(t);
    }

    pub fn add_epsilon(&mut self) {
        self.epsilon = true;
    }

    pub fn contains(&self, t: &Terminal) -> bool {
        self.terminals.contains(t)
    }

    pub fn contains_epsilon(&self) -> bool {
        self.epsilon
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals.iter()
    }

    /// Number of members, ε included. Fixpoint loops use this to detect
    /// growth.
    pub fn len(&self) -> usize {
        self.terminals.len() + usize::from(self.epsilon)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unions the terminals of `other` in, leaving the ε flag alone.
    fn merge_terminals(&mut self, other: &FirstSet) {
        self.terminals.extend(other.terminals.iter().cloned());
    }
}

/// The per-symbol FIRST table of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    inner: BTreeMap<Symbol, FirstSet>,
}

impl FirstSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let mut inner: BTreeMap<Symbol, FirstSet> = BTreeMap::new();

        for t in grammar.terminals() {
            let mut set = FirstSet::new();
            set.add(t.clone());
            inner.insert(Symbol::Terminal(t.clone()), set);
        }
        for nt in grammar.non_terminals() {
            inner.insert(Symbol::NonTerminal(nt.clone()), FirstSet::new());
        }

        let mut changing = true;
        while changing {
            changing = false;
            for p in grammar.productions().iter() {
                let rhs = first_of_string_in(&inner, p.body());
                let first = inner
                    .get_mut(&Symbol::NonTerminal(p.head().clone()))
                    .expect("first set for undeclared head");
                let len_before = first.len();
                first.merge_terminals(&rhs);
                if rhs.contains_epsilon() {
                    first.add_epsilon();
                }
                changing |= first.len() != len_before;
            }
        }

        Self { inner }
    }

    /// The FIRST set of a single symbol.
    pub fn first(&self, s: &Symbol) -> &FirstSet {
        self.inner.get(s).expect("first set for unknown symbol")
    }

    /// The FIRST set arising from a string of symbols; ε is included only
    /// when every symbol of the string is nullable.
    pub fn first_of_string(&self, ss: &SymbolString) -> FirstSet {
        first_of_string_in(&self.inner, ss)
    }
}

fn first_of_string_in(table: &BTreeMap<Symbol, FirstSet>, ss: &SymbolString) -> FirstSet {
    let mut out = FirstSet::new();
    for s in ss.iter() {
        let Some(f) = table.get(s) else {
            return out;
        };
        out.merge_terminals(f);
        if !f.contains_epsilon() {
            return out;
        }
    }
    out.add_epsilon();
    out
}
