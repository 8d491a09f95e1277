pub mod builtin;
mod cfg;
mod error;

pub use crate::cfg::*;
pub use crate::error::GrammarError;
