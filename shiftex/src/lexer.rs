use logos::Logos;

use crate::token::{Position, Token, TokenKind};
use crate::traits::Lexer;

/// Tokens as recognized by logos, before positions are attached
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum RawToken {
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[regex(r"\p{Alphabetic}[\p{Alphabetic}\p{N}_]*", priority = 3)]
    Identifier,
    #[token("\n")]
    Newline,
    // Any single character no other token starts with, a lone `<` or `>` included
    #[regex(r"[^ \t\n]", priority = 1)]
    Unrecognized,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::ShiftLeft => TokenKind::ShiftLeft,
            RawToken::ShiftRight => TokenKind::ShiftRight,
            RawToken::Identifier => TokenKind::Identifier,
            RawToken::Newline | RawToken::Unrecognized => TokenKind::Error,
        }
    }
}

/// Cursor over a logos lexer that attaches line and column positions
///
/// Spaces and tabs are skipped, a newline starts a new line at column 1. Characters that do
/// not start a token, including a `<` or `>` without its pair, become single-character
/// `TokenKind::Error` tokens and scanning continues after them.
pub struct Scanner<'source> {
    inner: logos::Lexer<'source, RawToken>,
    /// Byte offset up to which `line` and `column` are known
    offset: usize,
    line: usize,
    column: usize,
    token: Token,
}

impl<'source> Scanner<'source> {
    pub fn new(source: &'source str) -> Self {
        let mut scanner = Self {
            inner: RawToken::lexer(source),
            offset: 0,
            line: 1,
            column: 1,
            token: Token::end(Position::default()),
        };
        scanner.token = scanner.scan();
        scanner
    }

    /// Moves the known position forward to byte offset `to` on the current line
    fn position_at(&mut self, to: usize) -> Position {
        let skipped = &self.inner.source()[self.offset..to];
        self.column += skipped.chars().count();
        self.offset = to;
        Position::new(self.line, self.column)
    }

    fn scan(&mut self) -> Token {
        loop {
            let raw = match self.inner.next() {
                Some(raw) => raw,
                None => {
                    let end = self.inner.source().len();
                    return Token::end(self.position_at(end));
                }
            };
            let span = self.inner.span();
            let start = self.position_at(span.start);

            match raw {
                Ok(RawToken::Newline) => {
                    self.offset = span.end;
                    self.line += 1;
                    self.column = 1;
                }
                Ok(raw) => {
                    self.position_at(span.end);
                    return Token::new(raw.kind(), self.inner.slice(), start);
                }
                // Every character matches some token, so logos only errors on input it
                // cannot decode
                Err(()) => {
                    self.position_at(span.end);
                    return Token::new(TokenKind::Error, self.inner.slice(), start);
                }
            }
        }
    }
}

impl<'source> Lexer for Scanner<'source> {
    fn advance(&mut self) {
        if !self.token.is_end() {
            self.token = self.scan();
        }
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

/// Scans `source` into tokens terminated by exactly one end-of-file token
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).tokenize()
}
