use std::error::Error;
use std::fs::File;

use prettytable as pt;
use prettytable::{cell, row};
use tracing::debug;

use shiftex::grammar::{
    builtin, eliminate_left_recursion, DisplaySet, FirstFollow, Grammar,
};

fn load_grammar(eliminated: bool) -> Result<Grammar, Box<dyn Error>> {
    let grammar = builtin::shift_expression_grammar();
    if eliminated {
        Ok(eliminate_left_recursion(&grammar)?)
    } else {
        Ok(grammar)
    }
}

pub fn print_sets(eliminated: bool) -> Result<(), Box<dyn Error>> {
    let grammar = load_grammar(eliminated)?;
    let sets = FirstFollow::compute(&grammar);
    println!("{}", grammar);
    println!("{}", generate_pretty_table(&sets));
    Ok(())
}

pub fn write_sets_csv(eliminated: bool, csv_filename: &str) -> Result<(), Box<dyn Error>> {
    let grammar = load_grammar(eliminated)?;
    let sets = FirstFollow::compute(&grammar);
    let pretty_table = generate_pretty_table(&sets);
    let csv_file = File::create(csv_filename)?;
    pretty_table.to_csv(csv_file)?;
    debug!(file = csv_filename, "wrote FIRST/FOLLOW table");
    Ok(())
}

fn generate_pretty_table(sets: &FirstFollow) -> pt::Table {
    let mut table = pt::Table::new();
    table.add_row(row!["Nonterminal", "FIRST", "FOLLOW", "Nullable"]);

    for nonterminal in sets.nonterminals() {
        let first = sets
            .first(nonterminal)
            .map_or("".to_owned(), |set| DisplaySet(&set).to_string());
        let follow = sets
            .follow(nonterminal)
            .map_or("".to_owned(), |set| DisplaySet(set).to_string());
        let nullable = if sets.is_nullable(nonterminal) { "yes" } else { "" };
        table.add_row(row![nonterminal, first, follow, nullable]);
    }

    table
}
