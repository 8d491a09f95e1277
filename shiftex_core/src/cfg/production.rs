use std::fmt;

use crate::{Nonterminal, Symbol};

/// A single production `lhs → rhs`
///
/// An empty `rhs` is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    lhs: Nonterminal,
    rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Nonterminal, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> &Nonterminal {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} →", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " {}", crate::EPSILON);
        }
        for symbol in self.rhs.iter() {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Declarative production construction
///
/// ```
/// use shiftex_core::{production, Nonterminal, Terminal};
///
/// let e = Nonterminal::new("E");
/// let t = Nonterminal::new("T");
/// let shl = Terminal::new("<<");
///
/// let p = production![e => e, shl, t];
/// assert_eq!(p.to_string(), "E → E << T");
///
/// let empty = production![e => ];
/// assert!(empty.is_epsilon());
/// ```
#[macro_export]
macro_rules! production {
    ($lhs:expr => $($rhs:expr),* $(,)?) => {
        $crate::Production::new(
            ::std::clone::Clone::clone(&$lhs),
            vec![$($crate::Symbol::from(&$rhs)),*],
        )
    };
}
