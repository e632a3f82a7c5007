use tracing::debug;

use crate::grammar::naming::{self, Ladder};
use crate::grammar::{Grammar, NonTerminal, Production, Symbol, SymbolString};

impl Grammar {
    /// Pulls common prefixes out of alternatives for the same head,
    /// repeating until no head has two productions sharing a non-empty
    /// prefix. Grouping is heuristic and factors one leading symbol per
    /// round; full prefixes are peeled over successive rounds.
    pub fn left_factor(&self) -> Grammar {
        debug!(productions = self.productions().len(), "left factoring");
        let mut productions = self.productions().clone();
        let mut non_terminals = self.non_terminals().clone();

        let mut changing = true;
        while changing {
            changing = false;
            let heads: Vec<NonTerminal> = productions.heads().cloned().collect();
            for head in heads {
                let groups = group_by_common_prefix(productions.for_head(&head));
                if groups.iter().all(|(_, suffixes)| suffixes.len() < 2) {
                    continue;
                }
                productions.remove_head(&head);
                for (prefix, suffixes) in groups {
                    if let [suffix] = suffixes.as_slice() {
                        productions.add(Production::new(head.clone(), prefix.concat(suffix)));
                        continue;
                    }
                    let fresh = naming::fresh(head.name(), Ladder::Prime, &non_terminals)
                        .expect("prime ladder exhausted");
                    debug!(%head, %fresh, "introduced factoring tail");
                    non_terminals.insert(fresh.clone());
                    productions.add(Production::new(
                        head.clone(),
                        prefix.append(Symbol::NonTerminal(fresh.clone())),
                    ));
                    for suffix in suffixes {
                        productions.add(Production::new(fresh.clone(), suffix));
                    }
                }
                changing = true;
            }
        }

        Grammar::new(
            self.terminals().clone(),
            non_terminals,
            productions,
            self.start().clone(),
        )
    }
}

/// Groups production bodies by shared prefix. Each body joins the first
/// group whose key shares a non-empty prefix with it, shortening that key
/// to the shared part and re-anchoring the recorded suffixes; otherwise it
/// opens a new group keyed by its first symbol (ε for an empty body).
/// Groups keep insertion order, making the first-match tie-break
/// deterministic.
fn group_by_common_prefix(ps: &[Production]) -> Vec<(SymbolString, Vec<SymbolString>)> {
    let mut groups: Vec<(SymbolString, Vec<SymbolString>)> = Vec::new();
    'bodies: for p in ps {
        let body = p.body();
        for (key, suffixes) in groups.iter_mut() {
            let shared = SymbolString::longest_common_prefix([&*key, body]);
            if shared.is_empty() {
                continue;
            }
            if shared.len() < key.len() {
                let dropped = key.tail(shared.len());
                for s in suffixes.iter_mut() {
                    *s = dropped.concat(s);
                }
                *key = shared;
            }
            suffixes.push(body.tail(key.len()));
            continue 'bodies;
        }
        let key = body.head(1);
        groups.push((key.clone(), vec![body.tail(key.len())]));
    }
    groups
}

#[cfg(test)]
mod test {
    use crate::grammar::test_support::{bodies_of, grammar};

    use super::*;

    fn shares_prefix(g: &Grammar) -> bool {
        g.non_terminals().iter().any(|nt| {
            let ps = g.productions().for_head(nt);
            ps.iter().enumerate().any(|(i, a)| {
                ps[i + 1..].iter().any(|b| {
                    !SymbolString::longest_common_prefix([a.body(), b.body()]).is_empty()
                })
            })
        })
    }

    #[test]
    fn common_prefix_moves_into_a_fresh_tail() {
        let g = grammar(&["A -> a b | a c | d"]);
        let g = g.left_factor();

        assert_eq!(bodies_of(&g, "A"), vec!["'a' A′", "'d'"]);
        assert_eq!(bodies_of(&g, "A′"), vec!["'b'", "'c'"]);
        assert!(!shares_prefix(&g));
        assert!(g.verify().is_ok());
    }

    #[test]
    fn long_prefixes_are_peeled_over_several_rounds() {
        // dangling else: the shared "i E t S" prefix takes multiple rounds
        let g = grammar(&["S -> i E t S e S | i E t S | a", "E -> b"]);
        let g = g.left_factor();

        assert!(!shares_prefix(&g));
        assert!(g.verify().is_ok());
        // every original sentential form is still derivable via the chain
        assert!(bodies_of(&g, "S").contains(&"'i' S′".to_string()));
    }

    #[test]
    fn factoring_is_a_fixpoint() {
        let g = grammar(&["A -> a b | a c | d"]).left_factor();
        assert_eq!(g.left_factor(), g);
    }

    #[test]
    fn grouping_collects_suffixes_under_the_first_symbol() {
        let g = grammar(&["A -> a b c | a b d | a x"]);
        let groups = group_by_common_prefix(g.productions().for_head(&NonTerminal::new("A")));

        assert_eq!(groups.len(), 1);
        let (key, suffixes) = &groups[0];
        assert_eq!(key.to_string(), "'a'");
        let suffixes: Vec<String> = suffixes.iter().map(|s| s.to_string()).collect();
        assert_eq!(suffixes, vec!["'b' 'c'", "'b' 'd'", "'x'"]);
    }

    #[test]
    fn disjoint_bodies_form_separate_groups() {
        let g = grammar(&["A -> a b | c d | ε"]);
        let groups = group_by_common_prefix(g.productions().for_head(&NonTerminal::new("A")));
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|(_, suffixes)| suffixes.len() == 1));
    }
}
