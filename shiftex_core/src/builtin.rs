//! The shift-expression grammar the front end parses
//!
//! ```text
//! E → E << T | E >> T | T
//! T → T + F | T - F | F
//! F → ( E ) | id
//! ```

use crate::{production, Grammar, Nonterminal, Terminal};

pub fn shift_expression_grammar() -> Grammar {
    let e = Nonterminal::new("E");
    let t = Nonterminal::new("T");
    let f = Nonterminal::new("F");

    let shl = Terminal::new("<<");
    let shr = Terminal::new(">>");
    let plus = Terminal::new("+");
    let minus = Terminal::new("-");
    let open = Terminal::new("(");
    let close = Terminal::new(")");
    let id = Terminal::new("id");

    let productions = vec![
        production![e => e, shl, t],
        production![e => e, shr, t],
        production![e => t],
        production![t => t, plus, f],
        production![t => t, minus, f],
        production![t => f],
        production![f => open, e, close],
        production![f => id],
    ];

    let nonterminals = vec![e.clone(), t, f];
    let terminals = vec![shl, shr, plus, minus, open, close, id];

    // Every symbol above is declared, so validation cannot fail
    match Grammar::new(nonterminals, terminals, productions, e) {
        Ok(grammar) => grammar,
        Err(err) => unreachable!("built-in grammar is invalid: {}", err),
    }
}
