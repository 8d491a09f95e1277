use std::error::Error;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

use shiftex::ast::{Expr, ExprKind};
use shiftex::{analyze, AnalysisOptions};

/// Parses and analyzes `source` so the graph carries resolved types
fn analyzed_tree(source: &str) -> Result<Expr, Box<dyn Error>> {
    let analysis = analyze(source, &AnalysisOptions::new());
    match (analysis.ast, analysis.syntax_error) {
        (Some(ast), _) => Ok(ast),
        (None, Some(err)) => Err(err.report().into()),
        (None, None) => Err("no syntax tree was produced".into()),
    }
}

pub fn write_graphviz_graph(source: &str, output_filename: &str) -> Result<(), Box<dyn Error>> {
    let graphviz_string = render_graphviz_graph(&analyzed_tree(source)?);
    fs::write(output_filename, graphviz_string)?;
    Ok(())
}

pub fn show_graphviz_graph(source: &str) -> Result<(), Box<dyn Error>> {
    let graphviz_string = render_graphviz_graph(&analyzed_tree(source)?);
    // The viewer picks the application by extension
    let mut temp_file = NamedTempFile::new()?;
    let path = temp_file.path().with_extension("dot");
    write!(temp_file, "{}", graphviz_string)?;
    temp_file.persist(&path)?;
    open::that(&path)?;
    Ok(())
}

fn render_graphviz_graph(expr: &Expr) -> String {
    let mut lines = Vec::new();
    lines.push("digraph ast {".to_owned());
    lines.push("  node [shape=box];".to_owned());

    // (node, parent id and edge label); ids are handed out in pre-order
    let mut pending: Vec<(&Expr, Option<(usize, &str)>)> = vec![(expr, None)];
    let mut next_id = 0;
    while let Some((expr, parent)) = pending.pop() {
        let id = next_id;
        next_id += 1;

        let label = match &expr.kind {
            ExprKind::Identifier(identifier) => with_type(format!("ID({})", identifier.name), expr),
            ExprKind::Binary(operation) => with_type(format!("BinaryOp({})", operation.operator), expr),
            ExprKind::Parenthesized(_) => "Parenthesized".to_owned(),
        };
        lines.push(format!(r#"  Node{} [label="{}"];"#, id, label));
        if let Some((parent_id, name)) = parent {
            lines.push(format!(
                r#"  Node{} -> Node{} [label="{}"];"#,
                parent_id, id, name
            ));
        }

        match &expr.kind {
            ExprKind::Identifier(_) => {}
            ExprKind::Binary(operation) => {
                pending.push((&operation.right, Some((id, "right"))));
                pending.push((&operation.left, Some((id, "left"))));
            }
            ExprKind::Parenthesized(inner) => pending.push((&**inner, Some((id, "inner")))),
        }
    }

    lines.push("}".to_owned());
    lines.join("\n")
}

fn with_type(label: String, expr: &Expr) -> String {
    match expr.resolved_type {
        Some(ty) => format!("{}\\n{}", label, ty),
        None => label,
    }
}
