use tracing::trace;

use crate::ast::{BinaryOperator, Expr};
use crate::error::{Expected, ParseError};
use crate::lexer::Scanner;
use crate::token::{Token, TokenKind};
use crate::traits::Lexer;

/// Recursive descent parser for the shift expression grammar
///
/// Parses the left-recursion free form
///
/// ```text
/// E  → T E'
/// E' → << T E' | >> T E' | ε
/// T  → F T'
/// T' → + F T' | - F T' | ε
/// F  → ( E ) | id
/// ```
///
/// with the `E'` and `T'` tails folded into left-associative loops. The first unmet expectation
/// aborts the parse.
pub struct Parser<L: Lexer> {
    lexer: L,
}

impl<L: Lexer> Parser<L> {
    pub fn new(lexer: L) -> Self {
        Self { lexer }
    }

    /// Parses a complete expression followed by the end of input
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_e()?;
        let current = self.current();
        if !current.is_end() {
            return Err(ParseError::TrailingInput {
                found: current.clone(),
            });
        }
        Ok(expr)
    }

    fn current(&self) -> &Token {
        self.lexer.token()
    }

    /// Returns the current token and moves past it
    fn bump(&mut self) -> Token {
        let token = self.lexer.token().clone();
        self.lexer.advance();
        token
    }

    fn parse_e(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_t()?;
        while let TokenKind::ShiftLeft | TokenKind::ShiftRight = self.current().kind {
            left = self.fold(left, Self::parse_t)?;
        }
        Ok(left)
    }

    fn parse_t(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_f()?;
        while let TokenKind::Plus | TokenKind::Minus = self.current().kind {
            left = self.fold(left, Self::parse_f)?;
        }
        Ok(left)
    }

    /// Consumes the current operator and its right operand into a node with `left`
    fn fold(
        &mut self,
        left: Expr,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let operator_token = self.bump();
        let operator = match BinaryOperator::from_token_kind(operator_token.kind) {
            Some(operator) => operator,
            None => {
                return Err(ParseError::Unexpected {
                    expected: Expected::Operand,
                    found: operator_token,
                })
            }
        };
        trace!(operator = %operator, position = %operator_token.position, "binary operation");
        let right = operand(self)?;
        Ok(Expr::binary(left, operator, operator_token, right))
    }

    fn parse_f(&mut self) -> Result<Expr, ParseError> {
        match self.current().kind {
            TokenKind::LeftParen => {
                self.bump();
                let inner = self.parse_e()?;
                if self.current().kind != TokenKind::RightParen {
                    return Err(ParseError::Unexpected {
                        expected: Expected::RightParen,
                        found: self.current().clone(),
                    });
                }
                self.bump();
                Ok(Expr::parenthesized(inner))
            }
            TokenKind::Identifier => Ok(Expr::identifier(self.bump())),
            TokenKind::Error => Err(ParseError::InvalidToken {
                found: self.current().clone(),
            }),
            _ => Err(ParseError::Unexpected {
                expected: Expected::Operand,
                found: self.current().clone(),
            }),
        }
    }
}

/// Scans and parses `source`
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Scanner::new(source)).parse()
}
