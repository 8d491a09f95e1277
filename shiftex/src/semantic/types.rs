use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Resolved type of an expression or symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    Unknown,
    /// Marks an expression whose error has already been reported
    Error,
}

impl Type {
    /// Type given to identifiers that are used without a declaration
    pub const IMPLICIT: Type = Type::Int;

    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Unknown => "unknown",
            Type::Error => "error_type",
        }
    }

    pub fn is_numeric(self) -> bool {
        match self {
            Type::Int | Type::Float => true,
            Type::Bool | Type::Unknown | Type::Error => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type name '{0}', expected one of int, float, bool, unknown")]
pub struct UnknownTypeName(pub String);

impl FromStr for Type {
    type Err = UnknownTypeName;

    /// Parses a declarable type name, `error_type` is not one
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            "bool" => Ok(Type::Bool),
            "unknown" => Ok(Type::Unknown),
            _ => Err(UnknownTypeName(s.to_owned())),
        }
    }
}
