//! Scope-based semantic model.
//!
//! Built once per parsed tree. Locals are visible throughout the block that
//! declares them (not only after the declaration), which over-approximates
//! what is in scope; the refactorings only use visibility to avoid name
//! clashes, where over-approximation is safe.

mod resolve;

use recast_ir::{Name, NodeId, SharedInterner, SyntaxTree};
use rustc_hash::FxHashMap;

use crate::ty::KnownNames;
use crate::{CollectionShape, ScopeId, Symbol, SymbolData, SymbolOracle, Ty};

#[derive(Clone, Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, Symbol>,
}

pub struct SemanticModel {
    interner: SharedInterner,
    known: KnownNames,
    symbols: Vec<SymbolData>,
    scopes: Vec<Scope>,
    /// Identifier -> the symbol it denotes.
    references: FxHashMap<NodeId, Symbol>,
    /// Declaring node -> the symbol it introduces.
    declarations: FxHashMap<NodeId, Symbol>,
    types: FxHashMap<NodeId, Ty>,
    /// Innermost scope active at each visited node.
    enclosing: FxHashMap<NodeId, ScopeId>,
}

impl SemanticModel {
    /// Resolve every identifier in `tree`.
    pub fn build(tree: &SyntaxTree) -> Self {
        let interner = tree.interner().clone();
        let known = KnownNames::new(&interner);
        let model = SemanticModel {
            interner,
            known,
            symbols: Vec::new(),
            scopes: vec![Scope::default()],
            references: FxHashMap::default(),
            declarations: FxHashMap::default(),
            types: FxHashMap::default(),
            enclosing: FxHashMap::default(),
        };
        let model = resolve::Resolver::run(tree, model);
        tracing::debug!(
            symbols = model.symbols.len(),
            references = model.references.len(),
            scopes = model.scopes.len(),
            "built semantic model"
        );
        model
    }

    pub fn symbol_data(&self, symbol: Symbol) -> Option<&SymbolData> {
        self.symbols.get(symbol.index())
    }

    /// Number of symbols declared anywhere in the tree.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    fn lookup_in(&self, mut scope: ScopeId, name: Name) -> Option<Symbol> {
        loop {
            let data = self.scopes.get(scope.index())?;
            if let Some(&symbol) = data.bindings.get(&name) {
                return Some(symbol);
            }
            scope = data.parent?;
        }
    }
}

impl SymbolOracle for SemanticModel {
    fn symbol_of(&self, node: NodeId) -> Option<Symbol> {
        self.references.get(&node).copied()
    }

    fn declared_symbol(&self, node: NodeId) -> Option<Symbol> {
        self.declarations.get(&node).copied()
    }

    fn symbol_name(&self, symbol: Symbol) -> Name {
        self.symbol_data(symbol).map_or(Name::EMPTY, |d| d.name)
    }

    fn symbol_type(&self, symbol: Symbol) -> Ty {
        self.symbol_data(symbol)
            .map_or(Ty::Unknown, |d| d.ty.clone())
    }

    fn type_of(&self, node: NodeId) -> Ty {
        self.types.get(&node).cloned().unwrap_or_default()
    }

    fn lookup_at(&self, position: NodeId, name: Name) -> Option<Symbol> {
        let scope = *self.enclosing.get(&position)?;
        self.lookup_in(scope, name)
    }

    fn collection_shape(&self, ty: &Ty) -> Option<CollectionShape> {
        self.known.collection_shape(ty)
    }

    fn element_type(&self, ty: &Ty) -> Ty {
        self.known.element_type(ty)
    }

    fn is_integral(&self, ty: &Ty) -> bool {
        self.known.is_integral(ty)
    }
}

impl std::fmt::Debug for SemanticModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticModel")
            .field("symbols", &self.symbols.len())
            .field("scopes", &self.scopes.len())
            .field("references", &self.references.len())
            .finish_non_exhaustive()
    }
}
