use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Error;

use super::string::SymbolString;
use super::symbol::{NonTerminal, Symbol, Terminal};

/// A single grammar rule `head → body`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    head: NonTerminal,
    body: SymbolString,
}

/// The shape of a production admissible in Chomsky normal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnfProduction {
    /// `A → BC`
    Binary(NonTerminal, NonTerminal),
    /// `A → a`
    Terminal(Terminal),
    /// `S → ε`
    Empty,
}

impl Production {
    pub fn new(head: NonTerminal, body: SymbolString) -> Self {
        Self { head, body }
    }

    pub fn head(&self) -> &NonTerminal {
        &self.head
    }

    pub fn body(&self) -> &SymbolString {
        &self.body
    }

    /// Whether the body is ε.
    pub fn is_empty(&self) -> bool {
        self.body.is_epsilon()
    }

    /// Whether the body is a single non-terminal (a unit production).
    pub fn is_single(&self) -> bool {
        self.body.len() == 1 && self.body[0].is_non_terminal()
    }

    /// Whether the body starts with the head itself.
    pub fn is_left_recursive(&self) -> bool {
        self.body
            .first()
            .and_then(Symbol::as_non_terminal)
            .is_some_and(|n| *n == self.head)
    }

    /// Whether the body is exactly two non-terminals.
    pub fn is_cnf_binary(&self) -> bool {
        self.body.len() == 2 && self.body.iter().all(Symbol::is_non_terminal)
    }

    /// Whether the body is exactly one terminal.
    pub fn is_cnf_terminal(&self) -> bool {
        self.body.len() == 1 && self.body[0].is_terminal()
    }

    /// Classifies the production as one of the CNF shapes.
    pub fn as_cnf(&self) -> Result<CnfProduction, Error> {
        if self.is_cnf_binary() {
            let mut nts = self.body.non_terminals().cloned();
            let b = nts.next().and_then(|b| nts.next().map(|c| (b, c)));
            let (b, c) = b.ok_or_else(|| Error::CnfViolation(self.to_string()))?;
            Ok(CnfProduction::Binary(b, c))
        } else if self.is_cnf_terminal() {
            let t = self
                .body
                .terminals()
                .next()
                .ok_or_else(|| Error::CnfViolation(self.to_string()))?;
            Ok(CnfProduction::Terminal(t.clone()))
        } else if self.is_empty() {
            Ok(CnfProduction::Empty)
        } else {
            Err(Error::CnfViolation(self.to_string()))
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.head, self.body)
    }
}

/// The deterministic order of productions sharing a head: more non-terminals
/// in the body first, ties broken by more terminals, then alphabetic by
/// body.
fn body_order(a: &Production, b: &Production) -> Ordering {
    let nts = |p: &Production| p.body.non_terminals().count();
    let ts = |p: &Production| p.body.terminals().count();
    nts(b)
        .cmp(&nts(a))
        .then_with(|| ts(b).cmp(&ts(a)))
        .then_with(|| a.body.cmp(&b.body))
}

/// The rule set of a grammar, indexed by head. Productions with the same
/// head are kept in the deterministic order of [`body_order`]; duplicates
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Productions {
    by_head: BTreeMap<NonTerminal, Vec<Production>>,
}

impl Productions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_head.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_head.values().all(Vec::is_empty)
    }

    pub fn contains(&self, p: &Production) -> bool {
        self.by_head
            .get(&p.head)
            .is_some_and(|ps| ps.contains(p))
    }

    pub fn add(&mut self, p: Production) {
        let ps = self.by_head.entry(p.head.clone()).or_default();
        if ps.contains(&p) {
            return;
        }
        let idx = ps.partition_point(|q| body_order(q, &p) != Ordering::Greater);
        ps.insert(idx, p);
    }

    pub fn remove(&mut self, p: &Production) -> bool {
        let Some(ps) = self.by_head.get_mut(&p.head) else {
            return false;
        };
        let Some(idx) = ps.iter().position(|q| q == p) else {
            return false;
        };
        ps.remove(idx);
        if ps.is_empty() {
            self.by_head.remove(&p.head);
        }
        true
    }

    /// Removes and returns every production with the given head.
    pub fn remove_head(&mut self, head: &NonTerminal) -> Vec<Production> {
        self.by_head.remove(head).unwrap_or_default()
    }

    /// The productions with the given head, in deterministic order.
    pub fn for_head(&self, head: &NonTerminal) -> &[Production] {
        self.by_head.get(head).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn heads(&self) -> impl Iterator<Item = &NonTerminal> {
        self.by_head.keys()
    }

    /// All productions, grouped by head, each group in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &Production> {
        self.by_head.values().flatten()
    }

    pub fn any(&self, f: impl Fn(&Production) -> bool) -> bool {
        self.iter().any(|p| f(p))
    }

    pub fn all(&self, f: impl Fn(&Production) -> bool) -> bool {
        self.iter().all(|p| f(p))
    }
}

impl FromIterator<Production> for Productions {
    fn from_iter<I: IntoIterator<Item = Production>>(iter: I) -> Self {
        let mut out = Self::new();
        for p in iter {
            out.add(p);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Productions {
    type Item = &'a Production;
    type IntoIter = Box<dyn Iterator<Item = &'a Production> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for Productions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn nt(n: &str) -> NonTerminal {
        NonTerminal::new(n)
    }

    fn prod(head: &str, body: &str) -> Production {
        let body = body
            .split_whitespace()
            .map(|w| {
                if w.chars().next().is_some_and(|c| c.is_uppercase()) {
                    Symbol::non_terminal(w)
                } else {
                    Symbol::terminal(w)
                }
            })
            .collect();
        Production::new(nt(head), body)
    }

    #[test]
    fn predicates() {
        assert!(prod("A", "").is_empty());
        assert!(prod("A", "B").is_single());
        assert!(!prod("A", "b").is_single());
        assert!(prod("A", "A b").is_left_recursive());
        assert!(!prod("A", "B A").is_left_recursive());
        assert!(prod("A", "B C").is_cnf_binary());
        assert!(!prod("A", "B c").is_cnf_binary());
        assert!(prod("A", "c").is_cnf_terminal());
    }

    #[test]
    fn cnf_classification() {
        assert_eq!(
            prod("A", "B C").as_cnf(),
            Ok(CnfProduction::Binary(nt("B"), nt("C")))
        );
        assert_eq!(
            prod("A", "a").as_cnf(),
            Ok(CnfProduction::Terminal(Terminal::new("a")))
        );
        assert_eq!(prod("S", "").as_cnf(), Ok(CnfProduction::Empty));
        assert!(matches!(
            prod("A", "a B").as_cnf(),
            Err(Error::CnfViolation(_))
        ));
    }

    #[test]
    fn per_head_order() {
        let mut ps = Productions::new();
        ps.add(prod("A", "b"));
        ps.add(prod("A", "B C"));
        ps.add(prod("A", "B c"));
        ps.add(prod("A", "a"));
        let bodies: Vec<String> = ps
            .for_head(&nt("A"))
            .iter()
            .map(|p| p.body().to_string())
            .collect();
        // more non-terminals first, then more terminals, then alphabetic
        assert_eq!(bodies, vec!["B C", "B 'c'", "'a'", "'b'"]);
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut ps = Productions::new();
        ps.add(prod("A", "a"));
        ps.add(prod("A", "a"));
        assert_eq!(ps.len(), 1);
    }

    #[test]
    fn remove_and_remove_head() {
        let mut ps = Productions::new();
        ps.add(prod("A", "a"));
        ps.add(prod("A", "b"));
        ps.add(prod("B", "c"));
        assert!(ps.remove(&prod("A", "a")));
        assert!(!ps.remove(&prod("A", "a")));
        assert_eq!(ps.remove_head(&nt("A")), vec![prod("A", "b")]);
        assert_eq!(ps.len(), 1);
        assert!(ps.any(|p| *p.head() == nt("B")));
    }
}
