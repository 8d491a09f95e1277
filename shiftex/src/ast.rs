use std::fmt;
use std::mem;

use crate::semantic::{SymbolRef, Type};
use crate::token::{Position, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::ShiftLeft => Some(BinaryOperator::ShiftLeft),
            TokenKind::ShiftRight => Some(BinaryOperator::ShiftRight),
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Subtract),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
        }
    }

    pub fn is_shift(self) -> bool {
        match self {
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => true,
            BinaryOperator::Add | BinaryOperator::Subtract => false,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub token: Token,
    /// Filled in by semantic analysis
    pub symbol: Option<SymbolRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Expr,
    pub operator: BinaryOperator,
    pub operator_token: Token,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(Identifier),
    Binary(Box<BinaryOperation>),
    Parenthesized(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub resolved_type: Option<Type>,
}

impl Expr {
    pub fn identifier(token: Token) -> Self {
        Self::from_kind(ExprKind::Identifier(Identifier {
            name: token.lexeme.clone(),
            token,
            symbol: None,
        }))
    }

    pub fn binary(left: Expr, operator: BinaryOperator, operator_token: Token, right: Expr) -> Self {
        Self::from_kind(ExprKind::Binary(Box::new(BinaryOperation {
            left,
            operator,
            operator_token,
            right,
        })))
    }

    pub fn parenthesized(inner: Expr) -> Self {
        Self::from_kind(ExprKind::Parenthesized(Box::new(inner)))
    }

    fn from_kind(kind: ExprKind) -> Self {
        Self {
            kind,
            resolved_type: None,
        }
    }

    /// Renders the node and its children, one line per node
    ///
    /// A parenthesized group shows no type since it always carries its inner expression's.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![(self, String::new())];

        while let Some((expr, indent)) = pending.pop() {
            out.push_str(&indent);
            match &expr.kind {
                ExprKind::Identifier(identifier) => {
                    out.push_str(&format!("ID({})", identifier.name));
                    expr.write_type(&mut out);
                    if let Some(symbol) = &identifier.symbol {
                        out.push_str(&format!(" (sym: {})", symbol.name()));
                    }
                    out.push('\n');
                }
                ExprKind::Binary(operation) => {
                    out.push_str(&format!("BinaryOp({})", operation.operator));
                    expr.write_type(&mut out);
                    out.push('\n');
                    pending.push((&operation.right, format!("{}  └─ ", indent)));
                    pending.push((&operation.left, format!("{}  ├─ ", indent)));
                }
                ExprKind::Parenthesized(inner) => {
                    out.push_str("Parenthesized\n");
                    pending.push((&**inner, format!("{}  └─ ", indent)));
                }
            }
        }
        out
    }

    fn write_type(&self, out: &mut String) {
        if let Some(ty) = self.resolved_type {
            out.push_str(&format!(" [type: {}]", ty));
        }
    }

    /// Placeholder left behind when a child is moved out during drop
    fn vacant() -> Self {
        Self::identifier(Token::end(Position::default()))
    }

    fn take_children(&mut self, into: &mut Vec<Expr>) {
        match &mut self.kind {
            ExprKind::Identifier(_) => {}
            ExprKind::Binary(operation) => {
                into.push(mem::replace(&mut operation.left, Expr::vacant()));
                into.push(mem::replace(&mut operation.right, Expr::vacant()));
            }
            ExprKind::Parenthesized(inner) => into.push(mem::replace(&mut **inner, Expr::vacant())),
        }
    }
}

impl Drop for Expr {
    // Long operator chains would overflow the stack with the default recursive drop
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

enum Piece<'a> {
    Node(&'a Expr),
    Operator(BinaryOperator),
    Text(&'static str),
}

impl fmt::Display for Expr {
    /// Infix form with every binary operation wrapped in brackets
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Node(expr) => match &expr.kind {
                    ExprKind::Identifier(identifier) => write!(f, "{}", identifier.name)?,
                    ExprKind::Binary(operation) => {
                        write!(f, "[")?;
                        pending.push(Piece::Text("]"));
                        pending.push(Piece::Node(&operation.right));
                        pending.push(Piece::Operator(operation.operator));
                        pending.push(Piece::Node(&operation.left));
                    }
                    ExprKind::Parenthesized(inner) => {
                        write!(f, "(")?;
                        pending.push(Piece::Text(")"));
                        pending.push(Piece::Node(&**inner));
                    }
                },
                Piece::Operator(operator) => write!(f, " {} ", operator)?,
                Piece::Text(text) => write!(f, "{}", text)?,
            }
        }
        Ok(())
    }
}
