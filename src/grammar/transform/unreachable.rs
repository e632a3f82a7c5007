use std::collections::BTreeSet;

use tracing::debug;

use crate::grammar::{Grammar, NonTerminal, Productions, Terminal};

impl Grammar {
    /// Keeps only productions whose head is reachable from the start symbol
    /// and rebuilds the terminal set from the surviving bodies.
    pub fn eliminate_unreachable(&self) -> Grammar {
        let mut reachable: BTreeSet<NonTerminal> = BTreeSet::from([self.start().clone()]);
        let mut changing = true;
        while changing {
            changing = false;
            for p in self.productions().iter() {
                if !reachable.contains(p.head()) {
                    continue;
                }
                for n in p.body().non_terminals() {
                    changing |= reachable.insert(n.clone());
                }
            }
        }

        let productions: Productions = self
            .productions()
            .iter()
            .filter(|p| reachable.contains(p.head()))
            .cloned()
            .collect();
        let terminals: BTreeSet<Terminal> = productions
            .iter()
            .flat_map(|p| p.body().terminals().cloned())
            .collect();
        debug!(
            reachable = reachable.len(),
            dropped = self.non_terminals().len().saturating_sub(reachable.len()),
            "eliminated unreachable symbols"
        );

        Grammar::new(terminals, reachable, productions, self.start().clone())
    }
}
