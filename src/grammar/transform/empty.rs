use std::collections::BTreeSet;

use tracing::debug;

use crate::grammar::naming::{self, Ladder};
use crate::grammar::{Grammar, NonTerminal, Production, Productions, Symbol, SymbolString};

impl Grammar {
    /// Removes every ε-production. Each body is expanded into all the
    /// variants obtained by omitting nullable non-terminals, and the empty
    /// results are dropped. When the start symbol is nullable a fresh start
    /// `S′` with `S′ → S | ε` keeps ε in the language.
    pub fn eliminate_empty_productions(&self) -> Grammar {
        let nullable = self.nullable();
        debug!(nullable = nullable.len(), "eliminating empty productions");
        let start = self.start();

        // Already in output form: the only ε-production is the start's and
        // the start occurs in no body. Re-running the expansion would stack
        // another fresh start on top.
        let settled = self.productions().all(|p| !p.is_empty() || p.head() == start)
            && !self
                .productions()
                .any(|p| p.body().contains(&Symbol::NonTerminal(start.clone())));
        if settled && nullable.contains(start) {
            return self.clone();
        }

        let mut productions = Productions::new();
        for p in self.productions().iter() {
            if p.is_empty() {
                continue;
            }
            for body in expansions(p.body(), &nullable) {
                if !body.is_empty() {
                    productions.add(Production::new(p.head().clone(), body));
                }
            }
        }

        let mut non_terminals = self.non_terminals().clone();
        let mut start = start.clone();
        if nullable.contains(&start) {
            let fresh = naming::fresh(start.name(), Ladder::Prime, &non_terminals)
                .expect("prime ladder exhausted for start symbol");
            debug!(%fresh, "introduced fresh start symbol");
            non_terminals.insert(fresh.clone());
            productions.add(Production::new(
                fresh.clone(),
                SymbolString::new([Symbol::NonTerminal(start.clone())]),
            ));
            productions.add(Production::new(fresh.clone(), SymbolString::epsilon()));
            start = fresh;
        }

        Grammar::new(self.terminals().clone(), non_terminals, productions, start)
    }
}

/// Every body obtained by optionally omitting nullable non-terminals. Each
/// nullable occurrence doubles the number of variants; other symbols always
/// stay.
fn expansions(body: &SymbolString, nullable: &BTreeSet<NonTerminal>) -> Vec<SymbolString> {
    let mut out = vec![SymbolString::epsilon()];
    for s in body.iter() {
        let optional = matches!(s, Symbol::NonTerminal(n) if nullable.contains(n));
        let mut next = Vec::with_capacity(out.len() * 2);
        for prefix in &out {
            next.push(prefix.append(s.clone()));
            if optional {
                next.push(prefix.clone());
            }
        }
        out = next;
    }
    out
}
