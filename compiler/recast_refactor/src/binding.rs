//! What a lambda parameter reference is, for matching purposes.

use recast_ir::{NodeId, NodeKind, SyntaxTree};
use recast_sema::{Symbol, SymbolOracle};

/// The entity a payload's parameter denotes.
///
/// Parameters written in source have a symbol. The parameter of a lambda
/// synthesized from a method group is unknown to the oracle; its only
/// reference is the node the engine created.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    Symbol(Symbol),
    Synthesized(NodeId),
}

impl Binding {
    pub(crate) fn is_synthesized(self) -> bool {
        matches!(self, Binding::Synthesized(_))
    }

    /// `true` if `node` is a reference to this binding.
    pub(crate) fn matches(self, tree: &SyntaxTree, oracle: &dyn SymbolOracle, node: NodeId) -> bool {
        match self {
            Binding::Symbol(symbol) => {
                matches!(tree.kind(node), NodeKind::Ident(_)) && oracle.symbol_of(node) == Some(symbol)
            }
            Binding::Synthesized(reference) => node == reference,
        }
    }

    /// References to this binding under `root`.
    pub(crate) fn references(self, tree: &SyntaxTree, oracle: &dyn SymbolOracle, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&n| self.matches(tree, oracle, n))
            .collect()
    }

    pub(crate) fn is_referenced(self, tree: &SyntaxTree, oracle: &dyn SymbolOracle, root: NodeId) -> bool {
        tree.descendants(root)
            .into_iter()
            .any(|n| self.matches(tree, oracle, n))
    }
}
