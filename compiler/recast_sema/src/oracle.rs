//! The queries a refactoring may ask about a tree.

use recast_ir::{Name, NodeId};

use crate::{CollectionShape, Symbol, Ty};

/// Semantic queries over one base tree.
///
/// Answers are keyed by node ids of that tree. Nodes created later by a
/// rewrite are unknown to the oracle: `symbol_of` and `declared_symbol`
/// return `None` and `type_of` returns [`Ty::Unknown`] for them.
pub trait SymbolOracle {
    /// Entity a reference (identifier) denotes.
    fn symbol_of(&self, node: NodeId) -> Option<Symbol>;

    /// Entity introduced by a declarator, parameter or `foreach` node.
    fn declared_symbol(&self, node: NodeId) -> Option<Symbol>;

    fn symbol_name(&self, symbol: Symbol) -> Name;

    fn symbol_type(&self, symbol: Symbol) -> Ty;

    fn type_of(&self, node: NodeId) -> Ty;

    /// What `name` would bind to if written at `position`.
    fn lookup_at(&self, position: NodeId, name: Name) -> Option<Symbol>;

    /// Length member and element type, for types with a length and an indexer.
    fn collection_shape(&self, ty: &Ty) -> Option<CollectionShape>;

    /// Element type of any enumerable type, `Unknown` otherwise.
    fn element_type(&self, ty: &Ty) -> Ty;

    fn is_integral(&self, ty: &Ty) -> bool;
}
