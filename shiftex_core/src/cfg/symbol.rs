use std::fmt;

/// Rendered name of the empty-string marker
pub const EPSILON: &str = "ε";
/// Rendered name of the end-of-input marker
pub const EOF: &str = "$";

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Terminal {
    Named(String),
    Epsilon,
    Eof,
}

/// Nonterminals are identified by name only
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Nonterminal(String);

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Terminal::Named(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Terminal::Named(name) => name,
            Terminal::Epsilon => EPSILON,
            Terminal::Eof => EOF,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Terminal::Named(_))
    }
}

impl Nonterminal {
    pub fn new(name: impl Into<String>) -> Self {
        Nonterminal(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(Terminal::new(name))
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(Nonterminal::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(t) => t.name(),
            Symbol::Nonterminal(n) => n.name(),
        }
    }
}

impl From<Terminal> for Symbol {
    fn from(terminal: Terminal) -> Self {
        Symbol::Terminal(terminal)
    }
}

impl From<Nonterminal> for Symbol {
    fn from(nonterminal: Nonterminal) -> Self {
        Symbol::Nonterminal(nonterminal)
    }
}

impl From<&Terminal> for Symbol {
    fn from(terminal: &Terminal) -> Self {
        Symbol::Terminal(terminal.clone())
    }
}

impl From<&Nonterminal> for Symbol {
    fn from(nonterminal: &Nonterminal) -> Self {
        Symbol::Nonterminal(nonterminal.clone())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt<'a>(&self, f: &mut fmt::Formatter<'a>) -> Result<(), fmt::Error> {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::Nonterminal(n) => write!(f, "{}", n),
        }
    }
}
