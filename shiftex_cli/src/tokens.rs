use prettytable as pt;
use prettytable::row;

use shiftex::{tokenize, Token};

pub fn print_tokens(source: &str) {
    println!("{}", generate_pretty_table(&tokenize(source)));
}

fn generate_pretty_table(tokens: &[Token]) -> pt::Table {
    let mut table = pt::Table::new();
    table.add_row(row!["#", "Kind", "Lexeme", "Line", "Column"]);
    for (i, token) in tokens.iter().enumerate() {
        table.add_row(row![i, token.kind, token.lexeme, token.line(), token.column()]);
    }
    table
}
