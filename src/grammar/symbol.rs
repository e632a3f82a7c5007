use std::fmt;

/// A terminal symbol. Its textual form is its quoted name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(String);

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The end-of-input marker `$`. It appears in FOLLOW sets and parsing
    /// table columns, never in a grammar's declared terminal set.
    pub fn end_marker() -> Self {
        Self("$".into())
    }

    pub fn is_end_marker(&self) -> bool {
        self.0 == "$"
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_marker() {
            f.write_str("$")
        } else {
            write!(f, "'{}'", self.0)
        }
    }
}

/// A non-terminal symbol. Its textual form is its bare name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(String);

impl NonTerminal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A grammar symbol: either kind, tagged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Self::Terminal(Terminal::new(name))
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Self::NonTerminal(NonTerminal::new(name))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Self::NonTerminal(_))
    }

    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal(t) => Some(t),
            Self::NonTerminal(_) => None,
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Self::Terminal(_) => None,
            Self::NonTerminal(n) => Some(n),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(t) => t.name(),
            Self::NonTerminal(n) => n.name(),
        }
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Self::Terminal(t)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(n: NonTerminal) -> Self {
        Self::NonTerminal(n)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(t) => t.fmt(f),
            Self::NonTerminal(n) => n.fmt(f),
        }
    }
}
