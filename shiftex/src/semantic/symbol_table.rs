use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::semantic::Type;
use crate::token::Position;

pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub ty: Type,
    pub scope: String,
    /// `None` for symbols declared before analysis
    pub position: Option<Position>,
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "Symbol{{name='{}', type='{}', scope='{}', ",
            self.name, self.ty, self.scope
        )?;
        match self.position {
            Some(position) => write!(f, "line={}, column={}}}", position.line, position.column),
            None => write!(f, "line=-, column=-}}"),
        }
    }
}

/// Key of an entry in a `SymbolTable`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    name: String,
    index: usize,
}

impl SymbolRef {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Symbols by name, with a stack of scopes
///
/// A name maps to one entry per scope it was declared in, names keep their first declaration
/// order.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: IndexMap<String, Vec<SymbolEntry>>,
    scopes: Vec<String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: IndexMap::new(),
            scopes: vec![GLOBAL_SCOPE.to_owned()],
        }
    }

    pub fn current_scope(&self) -> &str {
        self.scopes.last().map(String::as_str).unwrap_or(GLOBAL_SCOPE)
    }

    pub fn enter_scope(&mut self, name: impl Into<String>) {
        self.scopes.push(name.into());
    }

    /// Returns to the enclosing scope, the global scope is never left
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `name` in the current scope
    ///
    /// Declaring a name again in the same scope replaces the type and position of the existing
    /// entry.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        position: Option<Position>,
    ) -> SymbolRef {
        let name = name.into();
        let scope = self.current_scope().to_owned();
        let entries = self.symbols.entry(name.clone()).or_default();

        let index = match entries.iter().position(|entry| entry.scope == scope) {
            Some(index) => {
                entries[index].ty = ty;
                entries[index].position = position;
                index
            }
            None => {
                entries.push(SymbolEntry {
                    name: name.clone(),
                    ty,
                    scope,
                    position,
                });
                entries.len() - 1
            }
        };
        trace!(name = %name, ty = %ty, index, "declared symbol");

        SymbolRef { name, index }
    }

    /// Looks `name` up in `scope`, falling back to the global scope
    pub fn lookup_in(&self, name: &str, scope: &str) -> Option<SymbolRef> {
        let entries = self.symbols.get(name)?;
        let index = entries
            .iter()
            .position(|entry| entry.scope == scope)
            .or_else(|| entries.iter().position(|entry| entry.scope == GLOBAL_SCOPE))?;
        Some(SymbolRef {
            name: name.to_owned(),
            index,
        })
    }

    /// Looks `name` up in the current scope, falling back to the global scope
    pub fn lookup(&self, name: &str) -> Option<SymbolRef> {
        self.lookup_in(name, self.current_scope())
    }

    pub fn is_declared(&self, name: &str, scope: &str) -> bool {
        self.lookup_in(name, scope).is_some()
    }

    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        let scope = self.current_scope();
        self.entries(name).iter().any(|entry| entry.scope == scope)
    }

    pub fn get(&self, symbol: &SymbolRef) -> Option<&SymbolEntry> {
        self.symbols.get(&symbol.name)?.get(symbol.index)
    }

    pub fn entries(&self, name: &str) -> &[SymbolEntry] {
        self.symbols.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All entries, grouped by name in first declaration order
    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.symbols.values().flatten()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "SymbolTable:")?;
        for (name, entries) in self.symbols.iter() {
            writeln!(f, "  {}:", name)?;
            for entry in entries {
                writeln!(f, "    {}", entry)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declare_and_lookup() {
        let mut table = SymbolTable::new();
        let a = table.declare("a", Type::Int, Some(Position::new(1, 1)));
        assert_eq!(table.lookup("a"), Some(a.clone()));
        assert_eq!(table.get(&a).map(|entry| entry.ty), Some(Type::Int));
        assert_eq!(table.lookup("b"), None);
        assert!(table.is_declared("a", GLOBAL_SCOPE));
        assert!(table.is_declared_in_current_scope("a"));
    }

    #[test]
    fn test_scopes_shadow_and_fall_back() {
        let mut table = SymbolTable::new();
        table.declare("x", Type::Int, None);
        table.declare("y", Type::Bool, None);

        table.enter_scope("block");
        assert_eq!(table.current_scope(), "block");
        let inner = table.declare("x", Type::Float, Some(Position::new(2, 3)));
        assert_eq!(table.get(&inner).map(|entry| entry.ty), Some(Type::Float));
        assert!(!table.is_declared_in_current_scope("y"));
        // y is still visible through the global scope
        assert_eq!(
            table.lookup("y").and_then(|y| table.get(&y)).map(|entry| entry.ty),
            Some(Type::Bool)
        );

        table.exit_scope();
        let outer = table.lookup("x").unwrap();
        assert_eq!(table.get(&outer).map(|entry| entry.ty), Some(Type::Int));
        assert_eq!(table.entries("x").len(), 2);
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_global_scope_is_never_exited() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.current_scope(), GLOBAL_SCOPE);
    }

    #[test]
    fn test_redeclaration_replaces_entry() {
        let mut table = SymbolTable::new();
        let first = table.declare("a", Type::Int, None);
        let second = table.declare("a", Type::Float, None);
        assert_eq!(first, second);
        assert_eq!(table.entries("a").len(), 1);
        assert_eq!(table.get(&first).map(|entry| entry.ty), Some(Type::Float));
    }

    #[test]
    fn test_display() {
        let mut table = SymbolTable::new();
        table.declare("b", Type::Int, Some(Position::new(1, 5)));
        table.declare("a", Type::Float, None);
        assert_eq!(
            table.to_string(),
            "SymbolTable:\n  \
             b:\n    \
             Symbol{name='b', type='int', scope='global', line=1, column=5}\n  \
             a:\n    \
             Symbol{name='a', type='float', scope='global', line=-, column=-}\n"
        );
    }
}
