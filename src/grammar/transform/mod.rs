//! Grammar canonicalization passes.
//!
//! Every pass produces a new grammar and leaves its input intact. Pass order
//! is load-bearing: `eliminate_cycles` and `chomsky_normal_form` compose the
//! individual passes in the only order that neither re-introduces work nor
//! blows up.

mod cnf;
mod empty;
mod left_factor;
mod left_recursion;
mod nullable;
mod unit;
mod unreachable;

use super::Grammar;

impl Grammar {
    /// Removes ε-productions, unit productions and unreachable symbols, in
    /// that order.
    pub fn eliminate_cycles(&self) -> Grammar {
        self.eliminate_empty_productions()
            .eliminate_unit_productions()
            .eliminate_unreachable()
    }
}
