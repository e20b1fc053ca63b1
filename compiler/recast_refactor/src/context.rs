//! Everything an orchestrator reads.

use recast_ir::{Name, NodeId, SyntaxTree};
use recast_sema::{Symbol, SymbolOracle};

use crate::EngineConfig;

/// Base tree, an oracle bound to that tree, and configuration.
///
/// The oracle must have been built for `tree`; its answers are keyed by
/// `tree`'s node ids.
#[derive(Clone, Copy)]
pub struct RefactorContext<'a> {
    pub tree: &'a SyntaxTree,
    pub oracle: &'a dyn SymbolOracle,
    pub config: &'a EngineConfig,
}

impl<'a> RefactorContext<'a> {
    pub fn new(tree: &'a SyntaxTree, oracle: &'a dyn SymbolOracle, config: &'a EngineConfig) -> Self {
        RefactorContext {
            tree,
            oracle,
            config,
        }
    }

    #[inline]
    pub fn name(&self, text: &str) -> Name {
        self.tree.intern(text)
    }

    #[inline]
    pub fn text(&self, name: Name) -> &'static str {
        self.tree.text(name)
    }

    /// Symbol introduced by a declarator, parameter or `foreach` node.
    pub fn declared(&self, node: NodeId) -> Option<Symbol> {
        self.oracle.declared_symbol(node)
    }

    /// `true` if `node` is an identifier bound to `symbol`.
    pub fn refers_to(&self, node: NodeId, symbol: Symbol) -> bool {
        self.oracle.symbol_of(node) == Some(symbol)
    }
}

impl std::fmt::Debug for RefactorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefactorContext")
            .field("tree", self.tree)
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
