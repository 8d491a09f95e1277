use thiserror::Error;

use crate::{Nonterminal, Production, Symbol, Terminal};

/// Reasons a grammar is rejected at construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Start symbol {0} is not one of the nonterminals")]
    UnknownStartSymbol(Nonterminal),
    #[error("Production `{production}` has an undeclared left-hand side")]
    UndeclaredLhs { production: Production },
    #[error("Production `{production}` uses undeclared symbol {symbol}")]
    UndeclaredSymbol {
        production: Production,
        symbol: Symbol,
    },
    #[error("Production `{production}` uses reserved terminal {terminal}")]
    ReservedInProduction {
        production: Production,
        terminal: Terminal,
    },
    #[error("Terminal {0} is reserved and cannot be declared")]
    ReservedTerminal(Terminal),
    #[error("{0} is declared both as a terminal and as a nonterminal")]
    AmbiguousName(String),
}
