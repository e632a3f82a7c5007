use std::collections::BTreeMap;

use tracing::debug;

use crate::grammar::naming::{self, Ladder};
use crate::grammar::{
    Grammar, NonTerminal, Production, Productions, Symbol, SymbolString, Terminal,
};

impl Grammar {
    /// Converts to Chomsky normal form. The pipeline order is mandatory:
    /// start isolation, terminal promotion and body splitting first, then
    /// the cycle-elimination passes. Other orderings either re-introduce
    /// work or blow up the ε-expansion.
    pub fn chomsky_normal_form(&self) -> Grammar {
        debug!(
            productions = self.productions().len(),
            "converting to Chomsky normal form"
        );
        self.isolate_start()
            .promote_terminals()
            .split_long_bodies()
            .eliminate_cycles()
    }

    /// Guarantees the start symbol occurs in no production body, cloning it
    /// behind a fresh start when it does.
    fn isolate_start(&self) -> Grammar {
        let start = Symbol::NonTerminal(self.start().clone());
        if !self.productions().any(|p| p.body().contains(&start)) {
            return self.clone();
        }
        let mut non_terminals = self.non_terminals().clone();
        let fresh = naming::fresh(self.start().name(), Ladder::Prime, &non_terminals)
            .expect("prime ladder exhausted for start symbol");
        debug!(%fresh, "isolated start symbol");
        non_terminals.insert(fresh.clone());
        let mut productions = self.productions().clone();
        productions.add(Production::new(fresh.clone(), SymbolString::new([start])));
        Grammar::new(self.terminals().clone(), non_terminals, productions, fresh)
    }

    /// Replaces every terminal occurring beside other symbols with an
    /// auxiliary non-terminal deriving exactly that terminal.
    fn promote_terminals(&self) -> Grammar {
        let mut non_terminals = self.non_terminals().clone();
        let mut aliases: BTreeMap<Terminal, NonTerminal> = BTreeMap::new();
        let mut productions = Productions::new();
        for p in self.productions().iter() {
            if p.body().len() < 2 {
                productions.add(p.clone());
                continue;
            }
            let body: SymbolString = p
                .body()
                .iter()
                .map(|s| match s {
                    Symbol::Terminal(t) => {
                        let alias = aliases.entry(t.clone()).or_insert_with(|| {
                            let fresh = naming::fresh(t.name(), Ladder::Letter, &non_terminals)
                                .expect("letter ladder exhausted");
                            debug!(terminal = %t, %fresh, "promoted terminal");
                            non_terminals.insert(fresh.clone());
                            fresh
                        });
                        Symbol::NonTerminal(alias.clone())
                    }
                    other => other.clone(),
                })
                .collect();
            productions.add(Production::new(p.head().clone(), body));
        }
        for (t, alias) in &aliases {
            productions.add(Production::new(
                alias.clone(),
                SymbolString::new([Symbol::Terminal(t.clone())]),
            ));
        }
        Grammar::new(
            self.terminals().clone(),
            non_terminals,
            productions,
            self.start().clone(),
        )
    }

    /// Breaks bodies longer than two into a chain of fresh intermediates:
    /// `A → X₁A₁`, `A₁ → X₂A₂`, .. ending with the final pair of symbols.
    fn split_long_bodies(&self) -> Grammar {
        let mut non_terminals = self.non_terminals().clone();
        let mut productions = Productions::new();
        for p in self.productions().iter() {
            let symbols = p.body().symbols();
            if symbols.len() <= 2 {
                productions.add(p.clone());
                continue;
            }
            let mut head = p.head().clone();
            for s in &symbols[..symbols.len() - 2] {
                let fresh = naming::fresh(p.head().name(), Ladder::Numeric, &non_terminals)
                    .expect("numeric ladder exhausted");
                debug!(head = %p.head(), %fresh, "introduced chaining intermediate");
                non_terminals.insert(fresh.clone());
                productions.add(Production::new(
                    head,
                    SymbolString::new([s.clone(), Symbol::NonTerminal(fresh.clone())]),
                ));
                head = fresh;
            }
            productions.add(Production::new(
                head,
                SymbolString::new(symbols[symbols.len() - 2..].iter().cloned()),
            ));
        }
        Grammar::new(
            self.terminals().clone(),
            non_terminals,
            productions,
            self.start().clone(),
        )
    }
}
