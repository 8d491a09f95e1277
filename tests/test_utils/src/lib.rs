use shiftex::{Lexer, Position, Token, TokenKind};

/// Lexer over a pre-built token slice
///
/// Once the slice is exhausted, or an end-of-file token is reached, the end-of-file token stays
/// current.
pub struct SliceLexer<'source> {
    input: &'source [Token],
    pos: usize,
    end: Token,
}

impl<'source> SliceLexer<'source> {
    pub fn new(input: &'source [Token]) -> Self {
        let end_position = input
            .last()
            .map(|token| Position::new(token.line(), token.column() + token.lexeme.chars().count()))
            .unwrap_or_default();
        Self {
            input,
            pos: 0,
            end: Token::end(end_position),
        }
    }
}

impl<'source> Lexer for SliceLexer<'source> {
    fn advance(&mut self) {
        if self.pos < self.input.len() && !self.input[self.pos].is_end() {
            self.pos += 1;
        }
    }

    fn token(&self) -> &Token {
        self.input.get(self.pos).unwrap_or(&self.end)
    }
}

/// Lays `tokens` out on one line, separated by single spaces, and appends an end-of-file token
pub fn line(tokens: &[(TokenKind, &str)]) -> Vec<Token> {
    let mut column = 1;
    let mut result = Vec::with_capacity(tokens.len() + 1);
    for (kind, lexeme) in tokens {
        result.push(Token::new(*kind, *lexeme, Position::new(1, column)));
        column += lexeme.chars().count() + 1;
    }
    result.push(Token::end(Position::new(1, column)));
    result
}

pub fn id(name: &str) -> (TokenKind, &str) {
    (TokenKind::Identifier, name)
}

pub const PLUS: (TokenKind, &str) = (TokenKind::Plus, "+");
pub const MINUS: (TokenKind, &str) = (TokenKind::Minus, "-");
pub const SHL: (TokenKind, &str) = (TokenKind::ShiftLeft, "<<");
pub const SHR: (TokenKind, &str) = (TokenKind::ShiftRight, ">>");
pub const LPAREN: (TokenKind, &str) = (TokenKind::LeftParen, "(");
pub const RPAREN: (TokenKind, &str) = (TokenKind::RightParen, ")");
