use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{Grammar, NonTerminal, Symbol, Terminal};

/// The per-non-terminal FOLLOW table of a grammar: the terminals that can
/// appear immediately to the right of a non-terminal in a sentential form.
/// The end-of-input marker `$` is represented as [`Terminal::end_marker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    inner: BTreeMap<NonTerminal, BTreeSet<Terminal>>,
}

impl FollowSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let first_sets = grammar.first_sets();
        let mut inner: BTreeMap<NonTerminal, BTreeSet<Terminal>> = grammar
            .non_terminals()
            .iter()
            .map(|nt| (nt.clone(), BTreeSet::new()))
            .collect();
        inner
            .entry(grammar.start().clone())
            .or_default()
            .insert(Terminal::end_marker());

        let mut changing = true;
        while changing {
            changing = false;
            for p in grammar.productions().iter() {
                let mut trailer = inner[p.head()].clone();
                for s in p.body().symbols().iter().rev() {
                    match s {
                        Symbol::NonTerminal(n) => {
                            let follow = inner.get_mut(n).expect("follow set for undeclared symbol");
                            let len_before = follow.len();
                            follow.extend(trailer.iter().cloned());
                            changing |= follow.len() != len_before;

                            let first = first_sets.first(s);
                            if first.contains_epsilon() {
                                trailer.extend(first.terminals().cloned());
                            } else {
                                trailer = first.terminals().cloned().collect();
                            }
                        }
                        Symbol::Terminal(t) => {
                            trailer = BTreeSet::from([t.clone()]);
                        }
                    }
                }
            }
        }

        Self { inner }
    }

    /// The FOLLOW set for the passed non-terminal.
    pub fn follow(&self, n: &NonTerminal) -> &BTreeSet<Terminal> {
        self.inner.get(n).expect("follow set for unknown symbol")
    }
}

#[cfg(test)]
mod test {
    use crate::grammar::test_support::grammar;

    use super::*;

    fn follow_names(g: &Grammar, nt: &str) -> Vec<String> {
        g.follow_sets()
            .follow(&NonTerminal::new(nt))
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn expression_grammar_follow_sets() {
        let g = grammar(&[
            "E -> T E2",
            "E2 -> plus T E2 | minus T E2 | ε",
            "T -> F T2",
            "T2 -> star F T2 | slash F T2 | ε",
            "F -> lparen E rparen | id",
        ]);

        assert_eq!(follow_names(&g, "E"), vec!["$", "rparen"]);
        assert_eq!(follow_names(&g, "E2"), vec!["$", "rparen"]);
        assert_eq!(follow_names(&g, "T"), vec!["$", "minus", "plus", "rparen"]);
        assert_eq!(follow_names(&g, "T2"), vec!["$", "minus", "plus", "rparen"]);
        assert_eq!(
            follow_names(&g, "F"),
            vec!["$", "minus", "plus", "rparen", "slash", "star"]
        );
    }

    #[test]
    fn start_symbol_follows_with_end_marker() {
        let g = grammar(&["S -> a"]);
        assert_eq!(follow_names(&g, "S"), vec!["$"]);
    }
}
