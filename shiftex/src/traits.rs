use crate::token::Token;

/// A cursor over a token stream
///
/// This trait should be implemented for lexers that can be plugged into the `Parser`. A lexer
/// always has a current token. Once the end of input is reached, `advance` keeps the
/// end-of-file token current.
pub trait Lexer {
    fn advance(&mut self);
    fn token(&self) -> &Token;

    /// Materializes the remaining tokens, including exactly one end-of-file token
    fn tokenize(mut self) -> Vec<Token>
    where
        Self: Sized,
    {
        let mut tokens = Vec::new();
        loop {
            let token = self.token().clone();
            let end = token.is_end();
            tokens.push(token);
            if end {
                break;
            }
            self.advance();
        }
        tokens
    }
}
