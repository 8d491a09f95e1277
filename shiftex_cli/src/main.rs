use std::error::Error;
use std::process;

use clap::{App, AppSettings, Arg, SubCommand};
use tracing::Level;

mod analyze;
mod graphviz;
mod input;
mod sets;
mod tokens;

fn main() {
    if let Err(err) = cli() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn input_args<'a, 'b>() -> [Arg<'a, 'b>; 2] {
    [
        Arg::with_name("input")
            .help("Expression to process, or a path when --file is given")
            .required(true),
        Arg::with_name("file")
            .long("--file")
            .help("Treat <input> as a path to a file containing the expression"),
    ]
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cli() -> Result<(), Box<dyn Error>> {
    let matches = App::new("shiftex_cli")
        .about("Tool for inspecting the shift expression grammar and analyzing expressions")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("verbose")
                .long("--verbose")
                .short("-v")
                .multiple(true)
                .global(true)
                .help("Log to stderr, repeat for more detail"),
        ).subcommand(
            SubCommand::with_name("sets")
                .arg(
                    Arg::with_name("eliminated")
                        .long("--eliminated")
                        .help("Use the grammar with left recursion eliminated"),
                ).arg(
                    Arg::with_name("csv")
                        .long("--csv")
                        .takes_value(true)
                        .help("Write the FIRST/FOLLOW table to a specified CSV file"),
                ).about("Prints the grammar and its FIRST and FOLLOW sets"),
        ).subcommand(
            SubCommand::with_name("analyze")
                .args(&input_args())
                .arg(
                    Arg::with_name("declare")
                        .long("--declare")
                        .short("-d")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Declare an identifier before analysis, as name:type"),
                ).about("Parses and type checks an expression"),
        ).subcommand(
            SubCommand::with_name("tokens")
                .args(&input_args())
                .about("Prints the tokens of an expression"),
        ).subcommand(
            SubCommand::with_name("graph")
                .args(&input_args())
                .arg(
                    Arg::with_name("output")
                        .long("--output")
                        .short("-o")
                        .takes_value(true)
                        .help("Write the generated graphviz graph to a file (*.dot)"),
                ).about("Outputs a graphviz graph of the syntax tree of an expression"),
        ).setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    let subcommand_verbosity = matches
        .subcommand()
        .1
        .map_or(0, |sub| sub.occurrences_of("verbose"));
    init_logging(matches.occurrences_of("verbose").max(subcommand_verbosity));

    if let Some(sets_opts) = matches.subcommand_matches("sets") {
        let eliminated = sets_opts.is_present("eliminated");
        if let Some(csv_filename) = sets_opts.value_of("csv") {
            sets::write_sets_csv(eliminated, csv_filename)?;
        } else {
            sets::print_sets(eliminated)?;
        }
    }

    if let Some(analyze_opts) = matches.subcommand_matches("analyze") {
        let source = input::read_input(analyze_opts)?;
        let declarations: Vec<&str> = analyze_opts
            .values_of("declare")
            .map(Iterator::collect)
            .unwrap_or_default();
        analyze::print_analysis(&source, &declarations)?;
    }

    if let Some(tokens_opts) = matches.subcommand_matches("tokens") {
        let source = input::read_input(tokens_opts)?;
        tokens::print_tokens(&source);
    }

    if let Some(graph_opts) = matches.subcommand_matches("graph") {
        let source = input::read_input(graph_opts)?;
        if let Some(output_filename) = graph_opts.value_of("output") {
            graphviz::write_graphviz_graph(&source, output_filename)?;
        } else {
            graphviz::show_graphviz_graph(&source)?;
        }
    }

    Ok(())
}
