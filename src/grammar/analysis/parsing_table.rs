use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::error::{Aggregate, Error};
use crate::grammar::{Grammar, NonTerminal, Production, Terminal};

/// The LL(1) parsing table: a matrix from `(non-terminal, terminal)` to a
/// set of productions. A cell with two or more productions is an LL(1)
/// conflict; [`ParsingTable::check_errors`] reports them all.
///
/// Columns range over the grammar's terminals plus the end-of-input marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsingTable {
    cells: BTreeMap<(NonTerminal, Terminal), Vec<Production>>,
}

impl ParsingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the table from the grammar's FIRST and FOLLOW sets: a
    /// production `A → α` lands in `M[A, a]` for every `a ∈ FIRST(α)`, and
    /// in `M[A, b]` for every `b ∈ FOLLOW(A)` when α is nullable.
    pub fn compute(grammar: &Grammar) -> Self {
        let first_sets = grammar.first_sets();
        let follow_sets = grammar.follow_sets();
        let mut table = Self::new();
        for p in grammar.productions().iter() {
            let first = first_sets.first_of_string(p.body());
            for t in first.terminals() {
                table.add(p.head().clone(), t.clone(), p.clone());
            }
            if first.contains_epsilon() {
                for t in follow_sets.follow(p.head()) {
                    table.add(p.head().clone(), t.clone(), p.clone());
                }
            }
        }
        table
    }

    pub fn add(&mut self, nt: NonTerminal, t: Terminal, p: Production) {
        let cell = self.cells.entry((nt, t)).or_default();
        if !cell.contains(&p) {
            cell.push(p);
        }
    }

    pub fn get(&self, nt: &NonTerminal, t: &Terminal) -> &[Production] {
        self.cells
            .get(&(nt.clone(), t.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reports one error per cell holding two or more productions; Ok when
    /// every cell is a singleton or empty, i.e. the grammar is LL(1).
    pub fn check_errors(&self) -> Result<(), Aggregate> {
        let mut errors = Aggregate::new();
        for ((nt, t), ps) in &self.cells {
            if ps.len() >= 2 {
                errors.push(Error::Ll1Conflict {
                    non_terminal: nt.to_string(),
                    terminal: t.to_string(),
                    productions: ps.iter().join("; "),
                });
            }
        }
        errors.into_result()
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ((nt, t), ps) in &self.cells {
            writeln!(f, "[{nt}, {t}] {}", ps.iter().join(" ; "))?;
        }
        Ok(())
    }
}
