use std::collections::BTreeSet;

use crate::grammar::{Grammar, NonTerminal, Symbol};

impl Grammar {
    /// The non-terminals that derive ε in zero or more steps. Fixpoint over
    /// monotone growth: a production whose body is empty or consists only of
    /// already-nullable non-terminals makes its head nullable.
    pub fn nullable(&self) -> BTreeSet<NonTerminal> {
        let mut nullable: BTreeSet<NonTerminal> = BTreeSet::new();
        let mut changing = true;
        while changing {
            changing = false;
            for p in self.productions().iter() {
                if nullable.contains(p.head()) {
                    continue;
                }
                let body_nullable = p.body().iter().all(|s| match s {
                    Symbol::NonTerminal(n) => nullable.contains(n),
                    Symbol::Terminal(_) => false,
                });
                if body_nullable {
                    nullable.insert(p.head().clone());
                    changing = true;
                }
            }
        }
        nullable
    }
}
