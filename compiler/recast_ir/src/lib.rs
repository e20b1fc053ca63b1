//! Recast IR - syntax tree types for the refactoring engine
//!
//! This crate contains the data structures every other recast crate works
//! on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `NodeKind` for the supported language subset
//! - `SyntaxTree`, a persistent arena with parent links
//! - `Fold` for rebuilding subtrees with sharing
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId(u32)`
//! - **Never Mutate a Version**: rewrites work on an O(1) clone of the tree

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod fold;
mod interner;
mod kind;
mod name;
mod node_id;
mod ops;
mod span;
mod stack;
mod tree;

pub use fold::{walk_node, Fold};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use kind::{Node, NodeKind, Slot, Slots};
pub use name::Name;
pub use node_id::{NodeId, NodeRange};
pub use ops::{ArgModifier, AssignOp, BinaryOp, UnaryOp};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
pub use tree::{NodeList, SyntaxTree};
