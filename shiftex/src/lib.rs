pub mod analysis;
pub mod ast;
mod error;
mod lexer;
mod parser;
pub mod semantic;
mod token;
mod traits;

pub use crate::analysis::{analyze, Analysis, AnalysisOptions};
pub use crate::error::{Expected, ParseError};
pub use crate::lexer::{tokenize, Scanner};
pub use crate::parser::{parse, Parser};
pub use crate::token::{Position, Token, TokenKind};
pub use crate::traits::Lexer;

#[cfg(feature = "grammar")]
pub use shiftex_core as grammar;
