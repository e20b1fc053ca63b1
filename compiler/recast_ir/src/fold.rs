//! Bottom-up tree folding.
//!
//! A [`Fold`] maps a subtree to a (possibly) new subtree inside the same
//! [`SyntaxTree`]. The default [`Fold::fold_node`] calls [`walk_node`], which
//! folds every child and re-allocates the node only if some child changed.
//! Unchanged subtrees keep their ids, so a fold that touches nothing returns
//! its input.
//!
//! Override `fold_node` to intercept specific kinds and call `walk_node` for
//! the rest:
//!
//! ```text
//! struct ZeroInts;
//!
//! impl Fold for ZeroInts {
//!     fn fold_node(&mut self, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
//!         match tree.kind(id) {
//!             NodeKind::Int(_) => tree.alloc(NodeKind::Int(0), tree.span(id)),
//!             _ => walk_node(self, tree, id),
//!         }
//!     }
//! }
//! ```
//!
//! Folding never attaches its result; the caller swaps it in with
//! [`SyntaxTree::replace`] or uses it to build a larger node.

use crate::{ensure_sufficient_stack, Node, NodeId, NodeList, Slot, SyntaxTree};

pub trait Fold {
    fn fold_node(&mut self, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
        walk_node(self, tree, id)
    }
}

/// Fold the children of `id` and rebuild it if any of them changed.
pub fn walk_node<F: Fold + ?Sized>(folder: &mut F, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
    ensure_sufficient_stack(|| {
        let Node { kind, span } = tree.node(id);
        let mut slots = kind.slots();
        let mut changed = false;
        for slot in &mut slots {
            match slot {
                Slot::One(child) => {
                    if child.is_valid() {
                        let folded = folder.fold_node(tree, *child);
                        changed |= folded != *child;
                        *child = folded;
                    }
                }
                Slot::Many(range) => {
                    let items = tree.list(*range);
                    let folded: NodeList = items.iter().map(|&c| folder.fold_node(tree, c)).collect();
                    if folded != items {
                        changed = true;
                        *range = tree.alloc_list(folded);
                    }
                }
            }
        }
        if changed {
            tree.alloc(kind.with_slots(&slots), span)
        } else {
            id
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOp, NodeKind, SharedInterner, Span};

    struct ZeroInts;

    impl Fold for ZeroInts {
        fn fold_node(&mut self, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
            match tree.kind(id) {
                NodeKind::Int(n) if n != 0 => tree.alloc(NodeKind::Int(0), tree.span(id)),
                _ => walk_node(self, tree, id),
            }
        }
    }

    fn sum(tree: &mut SyntaxTree, l: i64, r: i64) -> NodeId {
        let left = tree.alloc(NodeKind::Int(l), Span::DUMMY);
        let right = tree.alloc(NodeKind::Int(r), Span::DUMMY);
        tree.alloc(
            NodeKind::Binary {
                op: BinaryOp::Add,
                left,
                right,
            },
            Span::DUMMY,
        )
    }

    #[test]
    fn test_fold_rebuilds_changed_path() {
        let mut tree = SyntaxTree::new(SharedInterner::new());
        let add = sum(&mut tree, 1, 0);
        let folded = ZeroInts.fold_node(&mut tree, add);
        assert_ne!(folded, add);
        let NodeKind::Binary { left, right, .. } = tree.kind(folded) else {
            panic!("expected binary");
        };
        assert_eq!(tree.kind(left), NodeKind::Int(0));
        // The untouched operand is shared, not copied.
        assert_eq!(tree.children(add)[1], right);
    }

    #[test]
    fn test_fold_without_change_returns_input() {
        let mut tree = SyntaxTree::new(SharedInterner::new());
        let add = sum(&mut tree, 0, 0);
        let before = tree.len();
        assert_eq!(ZeroInts.fold_node(&mut tree, add), add);
        assert_eq!(tree.len(), before);
    }
}
