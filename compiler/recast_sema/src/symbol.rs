//! Symbol and scope identifiers.

use recast_ir::{Name, NodeId};

use crate::Ty;

/// Identity of a named entity.
///
/// Two references denote the same entity iff they resolve to the same
/// `Symbol`; equal spelling is not enough.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub(crate) fn new(id: u32) -> Self {
        Symbol(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Local,
    Parameter,
    LambdaParameter,
    IterationVariable,
}

/// What the model knows about one symbol.
#[derive(Clone, Debug)]
pub struct SymbolData {
    pub name: Name,
    pub kind: SymbolKind,
    pub ty: Ty,
    /// Declarator, parameter or `foreach` node that introduced the symbol.
    pub decl: NodeId,
}

/// Scope in the model's scope tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub(crate) fn new(id: u32) -> Self {
        ScopeId(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new(7).to_string(), "sym#7");
        assert_eq!(Symbol::new(7), Symbol::new(7));
        assert_ne!(Symbol::new(7), Symbol::new(8));
    }
}
