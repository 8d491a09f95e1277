use std::fmt;

use thiserror::Error;

use crate::token::{Position, Token};

/// What the parser was looking for when it gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    RightParen,
    Operand,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Expected::RightParen => write!(f, "')'"),
            Expected::Operand => write!(f, "'(' or identifier"),
        }
    }
}

/// The single syntax error that aborts a parse
///
/// Messages end with the offending lexeme, which is empty for the end-of-file token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found: {}", .found.lexeme)]
    Unexpected { expected: Expected, found: Token },
    #[error("Invalid token: {}", .found.lexeme)]
    InvalidToken { found: Token },
    #[error("Expected end of input, but found: {}", .found.lexeme)]
    TrailingInput { found: Token },
}

impl ParseError {
    /// The token the parser stopped at
    pub fn found(&self) -> &Token {
        match self {
            ParseError::Unexpected { found, .. }
            | ParseError::InvalidToken { found }
            | ParseError::TrailingInput { found } => found,
        }
    }

    pub fn position(&self) -> Position {
        self.found().position
    }

    /// `Error at line <L>, column <C>: <message>`
    pub fn report(&self) -> String {
        let position = self.position();
        format!(
            "Error at line {}, column {}: {}",
            position.line, position.column, self
        )
    }
}
