use std::fmt;

use tracing::{debug, trace};

use crate::ast::{BinaryOperation, BinaryOperator, Expr, ExprKind, Identifier};
use crate::semantic::{SymbolRef, SymbolTable, Type};
use crate::token::Position;

/// A type error found during analysis, positioned at the offending operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "Semantic Error (line {}, col {}): {}",
            self.position.line, self.position.column, self.message
        )
    }
}

/// Pending work of `Analyzer::analyze`
enum Step<'e> {
    Visit(&'e mut Expr),
    /// Both operand types are on the result stack
    Combine {
        slot: &'e mut Option<Type>,
        operator: BinaryOperator,
        position: Position,
    },
    PassThrough {
        slot: &'e mut Option<Type>,
    },
}

/// Annotates expressions with types and fills a symbol table
///
/// Analysis never fails. Problems are collected as `SemanticError`s and the affected nodes
/// resolve to `Type::Error`, which silences further errors on enclosing nodes.
#[derive(Debug, Default)]
pub struct Analyzer {
    table: SymbolTable,
    errors: Vec<SemanticError>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with `ty` before any expression is analyzed
    pub fn declare(&mut self, name: &str, ty: Type) -> SymbolRef {
        debug!(name, ty = %ty, "pre-declared identifier");
        self.table.declare(name, ty, None)
    }

    /// Resolves the type of `expr` and all its children
    ///
    /// The tree is walked with an explicit stack, so operator chains of any length are fine.
    pub fn analyze(&mut self, expr: &mut Expr) -> Type {
        let mut steps = vec![Step::Visit(expr)];
        let mut resolved: Vec<Type> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(expr) => {
                    let Expr {
                        kind,
                        resolved_type,
                    } = expr;
                    match kind {
                        ExprKind::Identifier(identifier) => {
                            let ty = self.resolve_identifier(identifier);
                            *resolved_type = Some(ty);
                            resolved.push(ty);
                        }
                        ExprKind::Binary(operation) => {
                            let BinaryOperation {
                                left,
                                operator,
                                operator_token,
                                right,
                            } = &mut **operation;
                            steps.push(Step::Combine {
                                slot: resolved_type,
                                operator: *operator,
                                position: operator_token.position,
                            });
                            steps.push(Step::Visit(right));
                            steps.push(Step::Visit(left));
                        }
                        ExprKind::Parenthesized(inner) => {
                            steps.push(Step::PassThrough {
                                slot: resolved_type,
                            });
                            steps.push(Step::Visit(&mut **inner));
                        }
                    }
                }
                Step::Combine {
                    slot,
                    operator,
                    position,
                } => {
                    let right = resolved.pop().unwrap_or(Type::Error);
                    let left = resolved.pop().unwrap_or(Type::Error);
                    let ty = self.check_binary(operator, position, left, right);
                    trace!(
                        operator = %operator,
                        position = %position,
                        left = %left,
                        right = %right,
                        result = %ty,
                        "resolved binary operation"
                    );
                    *slot = Some(ty);
                    resolved.push(ty);
                }
                Step::PassThrough { slot } => {
                    let ty = resolved.pop().unwrap_or(Type::Error);
                    *slot = Some(ty);
                    resolved.push(ty);
                }
            }
        }

        resolved.pop().unwrap_or(Type::Error)
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Symbol table access for entering and leaving scopes
    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn finish(self) -> (SymbolTable, Vec<SemanticError>) {
        (self.table, self.errors)
    }

    fn resolve_identifier(&mut self, identifier: &mut Identifier) -> Type {
        let existing = self
            .table
            .lookup(&identifier.name)
            .and_then(|symbol| self.table.get(&symbol).map(|entry| (symbol, entry.ty)));

        let (symbol, ty) = match existing {
            Some((symbol, ty)) => {
                trace!(name = %identifier.name, ty = %ty, "found identifier");
                (symbol, ty)
            }
            None => {
                let position = identifier.token.position;
                debug!(
                    name = %identifier.name,
                    ty = %Type::IMPLICIT,
                    scope = self.table.current_scope(),
                    position = %position,
                    "implicitly declared identifier"
                );
                let symbol = self
                    .table
                    .declare(identifier.name.clone(), Type::IMPLICIT, Some(position));
                (symbol, Type::IMPLICIT)
            }
        };

        identifier.symbol = Some(symbol);
        ty
    }

    fn check_binary(
        &mut self,
        operator: BinaryOperator,
        position: Position,
        left: Type,
        right: Type,
    ) -> Type {
        if left == Type::Error || right == Type::Error {
            return Type::Error;
        }

        if left == Type::Unknown || right == Type::Unknown {
            self.report(
                position,
                format!(
                    "Cannot perform operation '{}' on operands with unknown types ('{}', '{}').",
                    operator, left, right
                ),
            );
            return Type::Error;
        }

        if operator.is_shift() {
            if left == Type::Int && right == Type::Int {
                return Type::Int;
            }
            self.report(
                position,
                format!(
                    "Type mismatch for operator '{}'. Expected two integers, but got {} and {}.",
                    operator, left, right
                ),
            );
            return Type::Error;
        }

        match (left, right) {
            (Type::Int, Type::Int) => Type::Int,
            (l, r) if l.is_numeric() && r.is_numeric() => Type::Float,
            _ => {
                self.report(
                    position,
                    format!(
                        "Type mismatch for operator '{}'. Expected numeric operands, but got {} and {}.",
                        operator, left, right
                    ),
                );
                Type::Error
            }
        }
    }

    fn report(&mut self, position: Position, message: String) {
        debug!(position = %position, message = %message, "semantic error");
        self.errors.push(SemanticError { message, position });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn analyze_with(source: &str, declarations: &[(&str, Type)]) -> (Expr, Analyzer) {
        let mut expr = parse(source).unwrap();
        let mut analyzer = Analyzer::new();
        for (name, ty) in declarations {
            analyzer.declare(name, *ty);
        }
        analyzer.analyze(&mut expr);
        (expr, analyzer)
    }

    fn messages(analyzer: &Analyzer) -> Vec<String> {
        analyzer.errors().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_implicit_declarations() {
        let (expr, analyzer) = analyze_with("a + b << a", &[]);
        assert_eq!(expr.resolved_type, Some(Type::Int));
        assert!(analyzer.errors().is_empty());

        let table = analyzer.table();
        assert_eq!(table.iter().count(), 2);
        let a = &table.entries("a")[0];
        assert_eq!(a.ty, Type::Int);
        assert_eq!(a.position, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_every_node_is_annotated() {
        let (expr, _) = analyze_with("(a - b) >> c", &[]);
        assert_eq!(
            expr.to_tree_string(),
            "BinaryOp(>>) [type: int]\n\
             \x20 ├─ Parenthesized\n\
             \x20 ├─   └─ BinaryOp(-) [type: int]\n\
             \x20 ├─   └─   ├─ ID(a) [type: int] (sym: a)\n\
             \x20 ├─   └─   └─ ID(b) [type: int] (sym: b)\n\
             \x20 └─ ID(c) [type: int] (sym: c)\n"
        );
    }

    #[test]
    fn test_additive_widening() {
        let (expr, analyzer) = analyze_with("a + x", &[("x", Type::Float)]);
        assert_eq!(expr.resolved_type, Some(Type::Float));
        assert!(analyzer.errors().is_empty());

        let (expr, _) = analyze_with("x - y", &[("x", Type::Float), ("y", Type::Float)]);
        assert_eq!(expr.resolved_type, Some(Type::Float));
    }

    #[test]
    fn test_shift_requires_integers() {
        let (expr, analyzer) = analyze_with("x << a", &[("x", Type::Float)]);
        assert_eq!(expr.resolved_type, Some(Type::Error));
        assert_eq!(
            messages(&analyzer),
            vec![
                "Semantic Error (line 1, col 3): Type mismatch for operator '<<'. \
                 Expected two integers, but got float and int."
            ]
        );
    }

    #[test]
    fn test_additive_rejects_bool() {
        let (_, analyzer) = analyze_with("a + flag", &[("flag", Type::Bool)]);
        assert_eq!(
            messages(&analyzer),
            vec![
                "Semantic Error (line 1, col 3): Type mismatch for operator '+'. \
                 Expected numeric operands, but got int and bool."
            ]
        );
    }

    #[test]
    fn test_unknown_operands() {
        let (expr, analyzer) = analyze_with("a >> u", &[("u", Type::Unknown)]);
        assert_eq!(expr.resolved_type, Some(Type::Error));
        assert_eq!(
            messages(&analyzer),
            vec![
                "Semantic Error (line 1, col 3): Cannot perform operation '>>' \
                 on operands with unknown types ('int', 'unknown')."
            ]
        );
    }

    #[test]
    fn test_errors_do_not_cascade() {
        let (expr, analyzer) = analyze_with("(x << a) + b - c", &[("x", Type::Float)]);
        assert_eq!(expr.resolved_type, Some(Type::Error));
        assert_eq!(analyzer.errors().len(), 1);
    }

    #[test]
    fn test_long_operator_chain() {
        let source = format!("x{}", " << a".repeat(150_000));
        let (expr, analyzer) = analyze_with(&source, &[("x", Type::Float)]);
        assert_eq!(expr.resolved_type, Some(Type::Error));
        assert_eq!(
            messages(&analyzer),
            vec![
                "Semantic Error (line 1, col 3): Type mismatch for operator '<<'. \
                 Expected two integers, but got float and int."
            ]
        );

        let source = format!("a{}", " - b".repeat(150_000));
        let (expr, analyzer) = analyze_with(&source, &[]);
        assert_eq!(expr.resolved_type, Some(Type::Int));
        match &expr.kind {
            ExprKind::Binary(operation) => {
                assert_eq!(operation.left.resolved_type, Some(Type::Int));
                assert_eq!(operation.right.resolved_type, Some(Type::Int));
            }
            other => panic!("expected a binary operation, got {:?}", other),
        }
        assert!(analyzer.errors().is_empty());
    }

    #[test]
    fn test_lookup_uses_current_scope_first() {
        let mut analyzer = Analyzer::new();
        analyzer.declare("a", Type::Float);
        analyzer.table_mut().enter_scope("inner");
        analyzer.declare("a", Type::Int);

        let mut expr = parse("a + a").unwrap();
        assert_eq!(analyzer.analyze(&mut expr), Type::Int);

        analyzer.table_mut().exit_scope();
        let mut expr = parse("a + a").unwrap();
        assert_eq!(analyzer.analyze(&mut expr), Type::Float);
    }
}
