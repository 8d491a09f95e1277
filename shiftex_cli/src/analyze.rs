use std::error::Error;

use shiftex::semantic::Type;
use shiftex::{analyze, AnalysisOptions};

/// Parses a `name:type` pair given to `--declare`
pub fn parse_declaration(declaration: &str) -> Result<(String, Type), Box<dyn Error>> {
    let mut parts = declaration.splitn(2, ':');
    let name = parts.next().map(str::trim).unwrap_or("");
    let ty = parts
        .next()
        .ok_or_else(|| format!("declaration '{}' is not of the form name:type", declaration))?;
    if name.is_empty() {
        return Err(format!("declaration '{}' has no name", declaration).into());
    }
    Ok((name.to_owned(), ty.trim().parse()?))
}

pub fn print_analysis(source: &str, declarations: &[&str]) -> Result<(), Box<dyn Error>> {
    let mut options = AnalysisOptions::new();
    for declaration in declarations {
        let (name, ty) = parse_declaration(declaration)?;
        options = options.declare(name, ty);
    }

    let analysis = analyze(source, &options);

    if let Some(tree) = analysis.tree_text() {
        println!("AST:\n{}", tree);
    }
    let diagnostics = analysis.diagnostics();
    if !diagnostics.is_empty() {
        println!("{}", diagnostics);
    }
    if let Some(table) = analysis.symbol_table_text() {
        println!("{}", table);
    }

    if analysis.success {
        Ok(())
    } else {
        Err("analysis reported errors".into())
    }
}
