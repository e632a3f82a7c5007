use tracing::debug;

use crate::grammar::naming::{self, Ladder};
use crate::grammar::{Grammar, Production, Symbol, SymbolString};

impl Grammar {
    /// Removes left recursion, immediate and indirect. Cycles (ε and unit
    /// productions) are eliminated first; non-terminals are then processed
    /// in [`Grammar::ordered_non_terminals`] order, substituting earlier
    /// heads out of leading position before removing immediate recursion
    /// with a fresh tail non-terminal.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let g = self.eliminate_cycles();
        let ordered = g.ordered_non_terminals();
        debug!(non_terminals = ordered.len(), "eliminating left recursion");
        let mut productions = g.productions().clone();
        let mut non_terminals = g.non_terminals().clone();

        for i in 0..ordered.len() {
            let head = &ordered[i];
            for prior in &ordered[..i] {
                let leading = Symbol::NonTerminal(prior.clone());
                for p in productions.remove_head(head) {
                    if p.body().first() != Some(&leading) {
                        productions.add(p);
                        continue;
                    }
                    let gamma = p.body().tail(1);
                    let deltas: Vec<SymbolString> = productions
                        .for_head(prior)
                        .iter()
                        .map(|q| q.body().clone())
                        .collect();
                    for delta in deltas {
                        productions.add(Production::new(head.clone(), delta.concat(&gamma)));
                    }
                }
            }

            let (recursive, rest): (Vec<_>, Vec<_>) = productions
                .remove_head(head)
                .into_iter()
                .partition(|p| p.is_left_recursive());
            if recursive.is_empty() {
                for p in rest {
                    productions.add(p);
                }
                continue;
            }

            let fresh = naming::fresh(head.name(), Ladder::Prime, &non_terminals)
                .expect("prime ladder exhausted");
            debug!(%head, %fresh, "introduced recursion tail");
            non_terminals.insert(fresh.clone());
            let tail = Symbol::NonTerminal(fresh.clone());
            for p in rest {
                productions.add(Production::new(head.clone(), p.body().append(tail.clone())));
            }
            for p in recursive {
                productions.add(Production::new(
                    fresh.clone(),
                    p.body().tail(1).append(tail.clone()),
                ));
            }
            productions.add(Production::new(fresh.clone(), SymbolString::epsilon()));
        }

        Grammar::new(g.terminals().clone(), non_terminals, productions, g.start().clone())
    }
}
