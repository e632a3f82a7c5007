use std::fmt;

use itertools::Itertools;

use super::symbol::{NonTerminal, Symbol, Terminal};

/// An ordered sequence of grammar symbols. The empty sequence denotes the
/// empty string ε.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolString(Vec<Symbol>);

impl SymbolString {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self(symbols.into_iter().collect())
    }

    pub fn epsilon() -> Self {
        Self::default()
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }

    /// The terminals of the string, in order.
    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.0.iter().filter_map(Symbol::as_terminal)
    }

    /// The non-terminals of the string, in order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.0.iter().filter_map(Symbol::as_non_terminal)
    }

    pub fn contains(&self, s: &Symbol) -> bool {
        self.0.contains(s)
    }

    pub fn has_prefix(&self, p: &SymbolString) -> bool {
        self.0.starts_with(&p.0)
    }

    pub fn has_suffix(&self, p: &SymbolString) -> bool {
        self.0.ends_with(&p.0)
    }

    /// Returns a new string with `s` appended.
    pub fn append(&self, s: Symbol) -> Self {
        let mut out = self.0.clone();
        out.push(s);
        Self(out)
    }

    /// Returns the concatenation of the two strings.
    pub fn concat(&self, other: &SymbolString) -> Self {
        Self(self.0.iter().chain(&other.0).cloned().collect())
    }

    /// The sub-string starting at `from`.
    pub fn tail(&self, from: usize) -> Self {
        Self(self.0[from.min(self.0.len())..].to_vec())
    }

    /// The prefix of length `len`.
    pub fn head(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// The longest string that is a prefix of every input; ε when the input
    /// is empty or the strings share nothing.
    pub fn longest_common_prefix<'a>(
        strings: impl IntoIterator<Item = &'a SymbolString>,
    ) -> SymbolString {
        let mut strings = strings.into_iter();
        let Some(first) = strings.next() else {
            return SymbolString::epsilon();
        };
        let mut lcp = first.clone();
        for s in strings {
            while !s.has_prefix(&lcp) {
                lcp.0.pop();
                if lcp.is_empty() {
                    return SymbolString::epsilon();
                }
            }
        }
        lcp
    }
}

impl FromIterator<Symbol> for SymbolString {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::ops::Index<usize> for SymbolString {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            f.write_str("ε")
        } else {
            write!(f, "{}", self.0.iter().join(" "))
        }
    }
}
