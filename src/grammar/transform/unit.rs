use std::collections::BTreeSet;

use tracing::debug;

use crate::grammar::{Grammar, NonTerminal, Production, Productions};

impl Grammar {
    /// Removes every unit production `A → B` by giving `A` the non-unit
    /// bodies of everything it derives through chains of unit productions.
    pub fn eliminate_unit_productions(&self) -> Grammar {
        debug!(
            productions = self.productions().len(),
            "eliminating unit productions"
        );
        // reflexive-transitive closure of the unit derivation relation
        let mut closure: BTreeSet<(NonTerminal, NonTerminal)> = self
            .non_terminals()
            .iter()
            .map(|n| (n.clone(), n.clone()))
            .collect();
        for p in self.productions().iter() {
            if p.is_single() {
                if let Some(target) = p.body()[0].as_non_terminal() {
                    closure.insert((p.head().clone(), target.clone()));
                }
            }
        }
        let mut changing = true;
        while changing {
            let mut additions = Vec::new();
            for (a, b) in &closure {
                for (b2, c) in &closure {
                    if b == b2 && !closure.contains(&(a.clone(), c.clone())) {
                        additions.push((a.clone(), c.clone()));
                    }
                }
            }
            changing = !additions.is_empty();
            closure.extend(additions);
        }

        let mut productions = Productions::new();
        for (a, b) in &closure {
            for p in self.productions().for_head(b) {
                if !p.is_single() {
                    productions.add(Production::new(a.clone(), p.body().clone()));
                }
            }
        }

        Grammar::new(
            self.terminals().clone(),
            self.non_terminals().clone(),
            productions,
            self.start().clone(),
        )
    }
}
