//! Recast Semantic Model
//!
//! Binds identifiers to symbols and infers the handful of types the
//! refactorings care about. Everything is computed once for a parsed tree
//! and queried through [`SymbolOracle`].

mod model;
mod oracle;
mod symbol;
mod ty;

pub use model::SemanticModel;
pub use oracle::SymbolOracle;
pub use symbol::{ScopeId, Symbol, SymbolData, SymbolKind};
pub use ty::{CollectionShape, Ty};
