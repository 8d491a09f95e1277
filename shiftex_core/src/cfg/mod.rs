mod first_follow;
pub use self::first_follow::{DisplaySet, FirstFollow, Passes, Phase, SetMap, TerminalSet};

mod grammar;
pub use self::grammar::Grammar;

pub(crate) mod left_recursion;
pub use self::left_recursion::{eliminate_left_recursion, left_recursive_nonterminals};

mod production;
pub use self::production::Production;

mod symbol;
pub use self::symbol::{Nonterminal, Symbol, Terminal, EOF, EPSILON};
