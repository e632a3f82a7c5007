use std::collections::HashMap;
use std::fmt;

use super::range::Domain;

/// Identifies an automaton state. Two states are equal iff their identifiers
/// are equal.
pub type StateId = usize;

/// Names an equivalence class of input symbols with respect to one
/// automaton's transition function.
pub type ClassId = usize;

/// An input symbol: any Unicode scalar fits. The value 0 is reserved for the
/// empty string and never appears inside an alphabet range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Sym(i32);

impl Sym {
    pub const EPSILON: Sym = Sym(0);

    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    pub const fn is_epsilon(&self) -> bool {
        self.0 == 0
    }
}

impl From<char> for Sym {
    fn from(c: char) -> Self {
        Self(c as i32)
    }
}

impl From<i32> for Sym {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl Domain for Sym {
    fn succ(self) -> Self {
        Self(self.0 + 1)
    }

    fn pred(self) -> Self {
        Self(self.0 - 1)
    }
}

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u32::try_from(self.0).ok().and_then(char::from_u32) {
            Some(c) if !c.is_control() => write!(f, "{c}"),
            _ => write!(f, "#{}", self.0),
        }
    }
}

/// Issues fresh state identifiers when merging states from several automata.
///
/// Repeated requests for the same `(automaton, state)` pair return the same
/// translation.
#[derive(Debug, Default)]
pub struct StateFactory {
    next: StateId,
    translations: HashMap<(usize, StateId), StateId>,
}

impl StateFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a state id never handed out before.
    pub fn fresh(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Translates a state of the identified automaton into the merged id
    /// space.
    pub fn translate(&mut self, automaton: usize, state: StateId) -> StateId {
        match self.translations.get(&(automaton, state)) {
            Some(&id) => id,
            None => {
                let id = self.fresh();
                self.translations.insert((automaton, state), id);
                id
            }
        }
    }
}
