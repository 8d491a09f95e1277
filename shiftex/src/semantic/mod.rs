mod analyzer;
mod symbol_table;
mod types;

pub use analyzer::{Analyzer, SemanticError};
pub use symbol_table::{SymbolEntry, SymbolRef, SymbolTable, GLOBAL_SCOPE};
pub use types::{Type, UnknownTypeName};
