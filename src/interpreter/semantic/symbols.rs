use std::{collections::HashMap, fmt};

use crate::interpreter::{grammar::TokenKind, value::Value};

/// The static type of an expression or symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Bool,
    String,
    /// Not known statically, or the result of an ill-typed expression.
    Undefined,
}

impl DataType {
    /// The type of a literal token.
    #[must_use]
    pub const fn of_literal(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Int => Self::Int,
            TokenKind::Float => Self::Float,
            TokenKind::Bool => Self::Bool,
            TokenKind::String => Self::String,
            _ => Self::Undefined,
        }
    }

    /// The type a runtime value has.
    #[must_use]
    pub const fn of_value(value: &Value) -> Self {
        match value {
            Value::Int(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::Bool(_) => Self::Bool,
            Value::Str(_) => Self::String,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

/// A declared variable as seen by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name:      String,
    pub data_type: DataType,
    /// Nesting depth of the block that declared it.
    pub depth:     usize,
}

impl Symbol {
    pub fn new(name: impl Into<String>, data_type: DataType, depth: usize) -> Self {
        Self { name: name.into(),
               data_type,
               depth }
    }
}

/// A stack of lexical scopes mapping names to symbols.
///
/// The bottom scope is never popped. Depths count from `base_depth`, which
/// lets a nested program number its scopes like the program running it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes:     Vec<HashMap<String, Symbol>>,
    base_depth: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_depth(0)
    }

    /// A table whose bottom scope sits at `base_depth`.
    #[must_use]
    pub fn with_base_depth(base_depth: usize) -> Self {
        Self { scopes: vec![HashMap::new()],
               base_depth }
    }

    /// Depth of the innermost scope.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.base_depth + self.scopes.len() - 1
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Drops the innermost scope and every symbol declared in it.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Finds the innermost symbol called `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Declares `name` in the innermost scope, replacing any previous
    /// declaration there.
    pub fn declare(&mut self, name: &str, data_type: DataType) -> Symbol {
        let symbol = Symbol::new(name, data_type, self.depth());
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), symbol.clone());
        }
        symbol
    }

    /// Changes the type of the innermost symbol called `name`.
    ///
    /// Returns the updated symbol, or `None` when no scope declares it.
    pub fn update(&mut self, name: &str, data_type: DataType) -> Option<Symbol> {
        let symbol = self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))?;
        symbol.data_type = data_type;
        Some(symbol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scopes_shadow_and_vanish() {
        let mut table = SymbolTable::new();
        table.declare("x", DataType::Int);

        table.enter_scope();
        assert_eq!(table.depth(), 1);
        table.declare("y", DataType::Float);
        assert_eq!(table.resolve("x").map(|s| s.depth), Some(0));
        assert_eq!(table.resolve("y").map(|s| s.data_type), Some(DataType::Float));

        table.exit_scope();
        assert!(table.resolve("y").is_none());
        table.exit_scope();
        assert!(table.resolve("x").is_some());
    }

    #[test]
    fn updates_change_the_innermost_declaration() {
        let mut table = SymbolTable::with_base_depth(3);
        table.declare("s", DataType::Int);
        table.enter_scope();

        let updated = table.update("s", DataType::String);
        assert_eq!(updated.map(|s| (s.depth, s.data_type)), Some((3, DataType::String)));
        assert!(table.update("missing", DataType::Int).is_none());
    }
}
