use std::fmt;

use thiserror::Error;

/// The error taxonomy of the crate.
///
/// The two programmer-error kinds ([`Error::InvalidRange`] and
/// [`Error::FreshSymbolExhausted`]) are raised at the call site and never
/// recovered from. The remaining kinds are reported through an [`Aggregate`]
/// so that callers see every violation at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid range: lo {lo} is greater than hi {hi}")]
    InvalidRange { lo: String, hi: String },
    #[error("start symbol {0} is not a non-terminal of the grammar")]
    UndeclaredStart(String),
    #[error("start symbol {0} has no production")]
    StartWithoutProduction(String),
    #[error("non-terminal {0} has no production")]
    MissingProductions(String),
    #[error("production head {0} is not a non-terminal of the grammar")]
    UndeclaredHead(String),
    #[error("symbol {symbol} in a body of {head} is neither a terminal nor a non-terminal of the grammar")]
    UndeclaredSymbol { head: String, symbol: String },
    #[error("production {0} is not in Chomsky normal form")]
    CnfViolation(String),
    #[error("LL(1) conflict at [{non_terminal}, {terminal}]: {productions}")]
    Ll1Conflict {
        non_terminal: String,
        terminal: String,
        productions: String,
    },
    #[error("no fresh name left for base {base:?} on the {ladder} ladder")]
    FreshSymbolExhausted { base: String, ladder: &'static str },
}

/// Collects several [`Error`]s into a single reportable value.
///
/// Rendering lists every contained error on its own line; an alternative
/// bullet format can be selected per instance with [`Aggregate::bulleted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    errors: Vec<Error>,
    bullet: Option<&'static str>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch rendering to one bullet-prefixed line per error.
    pub fn bulleted(mut self, bullet: &'static str) -> Self {
        self.bullet = Some(bullet);
        self
    }

    pub fn push(&mut self, e: Error) {
        self.errors.push(e);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }

    /// Returns whether some contained error matches the predicate.
    pub fn is(&self, f: impl Fn(&Error) -> bool) -> bool {
        self.errors.iter().any(f)
    }

    /// Extracts the contained errors matching the predicate.
    pub fn find(&self, f: impl Fn(&Error) -> bool) -> impl Iterator<Item = &Error> {
        self.errors.iter().filter(move |e| f(e))
    }

    /// Ok when nothing was collected, otherwise the aggregate itself.
    pub fn into_result(self) -> Result<(), Aggregate> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Error> for Aggregate {
    fn from(e: Error) -> Self {
        Self {
            errors: vec![e],
            bullet: None,
        }
    }
}

impl Extend<Error> for Aggregate {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.errors.extend(iter)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match self.bullet {
                Some(b) => write!(f, "{b} {e}")?,
                None => write!(f, "{e}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for Aggregate {}
