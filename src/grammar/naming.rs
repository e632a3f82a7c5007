use std::collections::BTreeSet;

use crate::error::Error;

use super::symbol::NonTerminal;

/// A suffix ladder for fresh non-terminal names. Given a base name, the
/// suffixes are tried in order and the first unused composition wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ladder {
    /// `′`, `″`, `‴`, `⁗` — generic auxiliaries (start cloning,
    /// left-recursion and left-factoring helpers).
    Prime,
    /// `ₙ`, `ⁿ`, `ᴺ` — per-terminal auxiliaries in CNF conversion.
    Letter,
    /// `₁` through `₉₉` — long-body splitting in CNF conversion.
    Numeric,
}

const PRIMES: [&str; 4] = ["′", "″", "‴", "⁗"];
const LETTERS: [&str; 3] = ["ₙ", "ⁿ", "ᴺ"];
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

fn subscript(n: usize) -> String {
    n.to_string()
        .chars()
        .map(|c| SUBSCRIPT_DIGITS[c as usize - '0' as usize])
        .collect()
}

impl Ladder {
    fn name(&self) -> &'static str {
        match self {
            Ladder::Prime => "prime",
            Ladder::Letter => "letter",
            Ladder::Numeric => "numeric",
        }
    }

    fn suffixes(&self) -> Box<dyn Iterator<Item = String>> {
        match self {
            Ladder::Prime => Box::new(PRIMES.iter().map(|s| s.to_string())),
            Ladder::Letter => Box::new(LETTERS.iter().map(|s| s.to_string())),
            Ladder::Numeric => Box::new((1..=99).map(subscript)),
        }
    }

    /// Strips one suffix of this ladder from the end of `name`, if present.
    fn strip<'a>(&self, name: &'a str) -> &'a str {
        match self {
            Ladder::Prime => PRIMES
                .iter()
                .find_map(|s| name.strip_suffix(s))
                .unwrap_or(name),
            Ladder::Letter => LETTERS
                .iter()
                .find_map(|s| name.strip_suffix(s))
                .unwrap_or(name),
            Ladder::Numeric => {
                name.trim_end_matches(|c| SUBSCRIPT_DIGITS.contains(&c))
            }
        }
    }
}

/// Returns the first `base + suffix` name not already taken, after stripping
/// any existing ladder suffix from the base. The output is a function of the
/// inputs alone; there is no global counter.
pub fn fresh(
    base: &str,
    ladder: Ladder,
    taken: &BTreeSet<NonTerminal>,
) -> Result<NonTerminal, Error> {
    let base = ladder.strip(base);
    for suffix in ladder.suffixes() {
        let candidate = NonTerminal::new(format!("{base}{suffix}"));
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(Error::FreshSymbolExhausted {
        base: base.to_string(),
        ladder: ladder.name(),
    })
}
