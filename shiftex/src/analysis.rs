use tracing::debug;

use crate::ast::Expr;
use crate::error::ParseError;
use crate::parser::parse;
use crate::semantic::{Analyzer, SemanticError, SymbolTable, Type};

/// Settings for a single `analyze` run
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Identifiers declared with a type before analysis, in declaration order
    pub declarations: Vec<(String, Type)>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.declarations.push((name.into(), ty));
        self
    }
}

/// Result of running the whole pipeline over one input
#[derive(Debug, Clone)]
pub struct Analysis {
    pub success: bool,
    pub ast: Option<Expr>,
    pub syntax_error: Option<ParseError>,
    pub semantic_errors: Vec<SemanticError>,
    /// `None` when parsing failed
    pub symbol_table: Option<SymbolTable>,
}

impl Analysis {
    pub fn tree_text(&self) -> Option<String> {
        self.ast.as_ref().map(Expr::to_tree_string)
    }

    pub fn symbol_table_text(&self) -> Option<String> {
        self.symbol_table.as_ref().map(ToString::to_string)
    }

    /// Syntax and semantic errors in sections, empty when there are none
    pub fn diagnostics(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.syntax_error {
            out.push_str("Parser Errors:\n");
            out.push_str(&format!("{}\n", error.report()));
        }
        if !self.semantic_errors.is_empty() {
            out.push_str("Semantic Errors:\n");
            for error in self.semantic_errors.iter() {
                out.push_str(&format!("{}\n", error));
            }
        }
        out
    }
}

/// Scans, parses and analyzes `source`
///
/// A syntax error stops the pipeline before semantic analysis. Semantic errors never do.
pub fn analyze(source: &str, options: &AnalysisOptions) -> Analysis {
    let mut expr = match parse(source) {
        Ok(expr) => expr,
        Err(error) => {
            debug!(error = %error, "parse failed");
            return Analysis {
                success: false,
                ast: None,
                syntax_error: Some(error),
                semantic_errors: Vec::new(),
                symbol_table: None,
            };
        }
    };

    let mut analyzer = Analyzer::new();
    for (name, ty) in options.declarations.iter() {
        analyzer.declare(name, *ty);
    }
    let ty = analyzer.analyze(&mut expr);
    let (table, errors) = analyzer.finish();
    debug!(ty = %ty, errors = errors.len(), symbols = table.iter().count(), "analysis finished");

    Analysis {
        success: errors.is_empty(),
        ast: Some(expr),
        syntax_error: None,
        semantic_errors: errors,
        symbol_table: Some(table),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_successful_analysis() {
        let analysis = analyze("a << b", &AnalysisOptions::new());
        assert!(analysis.success);
        assert_eq!(analysis.diagnostics(), "");
        assert_eq!(
            analysis.tree_text().unwrap(),
            "BinaryOp(<<) [type: int]\n  \
             ├─ ID(a) [type: int] (sym: a)\n  \
             └─ ID(b) [type: int] (sym: b)\n"
        );
        assert_eq!(
            analysis.symbol_table_text().unwrap(),
            "SymbolTable:\n  \
             a:\n    \
             Symbol{name='a', type='int', scope='global', line=1, column=1}\n  \
             b:\n    \
             Symbol{name='b', type='int', scope='global', line=1, column=6}\n"
        );
    }

    #[test]
    fn test_syntax_error_stops_pipeline() {
        let analysis = analyze("a +", &AnalysisOptions::new());
        assert!(!analysis.success);
        assert!(analysis.ast.is_none());
        assert!(analysis.symbol_table.is_none());
        assert_matches!(analysis.syntax_error, Some(ParseError::Unexpected { .. }));
        assert_eq!(
            analysis.diagnostics(),
            "Parser Errors:\n\
             Error at line 1, column 4: Expected '(' or identifier, found: \n"
        );
    }

    #[test]
    fn test_semantic_errors_keep_tree() {
        let options = AnalysisOptions::new().declare("f", Type::Float);
        let analysis = analyze("f >> 1x", &options);
        // `1` is an invalid token
        assert!(analysis.ast.is_none());

        let analysis = analyze("f >> x", &options);
        assert!(!analysis.success);
        assert!(analysis.ast.is_some());
        assert_eq!(
            analysis.diagnostics(),
            "Semantic Errors:\n\
             Semantic Error (line 1, col 3): Type mismatch for operator '>>'. \
             Expected two integers, but got float and int.\n"
        );
        assert_eq!(
            analysis.symbol_table_text().unwrap(),
            "SymbolTable:\n  \
             f:\n    \
             Symbol{name='f', type='float', scope='global', line=-, column=-}\n  \
             x:\n    \
             Symbol{name='x', type='int', scope='global', line=1, column=6}\n"
        );
    }

    #[test]
    fn test_every_semantic_error_is_listed() {
        let options = AnalysisOptions::new()
            .declare("f", Type::Float)
            .declare("flag", Type::Bool);
        let analysis = analyze("(f << a) - (a + flag)", &options);
        assert_eq!(
            analysis.diagnostics(),
            "Semantic Errors:\n\
             Semantic Error (line 1, col 4): Type mismatch for operator '<<'. \
             Expected two integers, but got float and int.\n\
             Semantic Error (line 1, col 15): Type mismatch for operator '+'. \
             Expected numeric operands, but got int and bool.\n"
        );
    }

    #[test]
    fn test_long_flat_expression() {
        let source = format!("a{}", " + a".repeat(100_000));
        let analysis = analyze(&source, &AnalysisOptions::new());
        assert!(analysis.success);
        assert_eq!(analysis.ast.as_ref().and_then(|ast| ast.resolved_type), Some(Type::Int));
        assert_eq!(analysis.diagnostics(), "");
        assert_eq!(analysis.symbol_table.map(|table| table.iter().count()), Some(1));
    }

    #[test]
    fn test_deterministic() {
        let options = AnalysisOptions::new().declare("u", Type::Unknown);
        let first = analyze("(u + a) - b << c", &options);
        let second = analyze("(u + a) - b << c", &options);
        assert_eq!(first.tree_text(), second.tree_text());
        assert_eq!(first.diagnostics(), second.diagnostics());
        assert_eq!(first.semantic_errors.len(), 1);
    }
}
