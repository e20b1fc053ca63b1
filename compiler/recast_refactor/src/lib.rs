//! Recast Refactoring Engine
//!
//! Symbol-aware rewrites over [`recast_ir::SyntaxTree`]: merging and
//! splitting `Where`/`Select` chains, `All`/`Any` inversion, loop
//! conversion, and call-chain flattening.
//!
//! Every refactoring is an orchestrator implementing [`Refactoring`]. Given a
//! [`RefactorContext`] and a node, it either declines (`Ok(None)`) or returns
//! a [`RefactorAction`] holding the rewritten tree. The base tree is never
//! modified; rewrites run on a cheap persistent clone.

mod action;
mod binding;
mod chain;
mod compose;
mod config;
mod context;
mod error;
mod flow;
mod names;
mod refactorings;
mod registry;
mod rewrite;
mod syntax;

#[cfg(test)]
mod test_helpers;

pub use action::RefactorAction;
pub use config::{EngineConfig, NameLadder};
pub use context::RefactorContext;
pub use error::{RefactorError, RefactorResult};
pub use registry::{actions_at, Refactoring, RefactoringKind};
