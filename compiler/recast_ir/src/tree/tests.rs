use pretty_assertions::assert_eq;

use super::*;
use crate::{BinaryOp, NodeKind, SharedInterner, Span};

/// Builds `{ a + b; }` and returns (tree, block, stmt, binary, a, b).
fn small_tree() -> (SyntaxTree, [NodeId; 5]) {
    let mut tree = SyntaxTree::new(SharedInterner::new());
    let a_name = tree.intern("a");
    let b_name = tree.intern("b");
    let a = tree.alloc(NodeKind::Ident(a_name), Span::new(2, 3));
    let b = tree.alloc(NodeKind::Ident(b_name), Span::new(6, 7));
    let add = tree.alloc(
        NodeKind::Binary {
            op: BinaryOp::Add,
            left: a,
            right: b,
        },
        Span::new(2, 7),
    );
    let stmt = tree.alloc(NodeKind::ExprStmt { expr: add }, Span::new(2, 8));
    let stmts = tree.alloc_list([stmt]);
    let block = tree.alloc(NodeKind::Block { stmts }, Span::new(0, 10));
    tree.set_root(block);
    (tree, [block, stmt, add, a, b])
}

#[test]
fn test_alloc_sets_parents() {
    let (tree, [block, stmt, add, a, b]) = small_tree();
    assert_eq!(tree.parent(a), Some(add));
    assert_eq!(tree.parent(b), Some(add));
    assert_eq!(tree.parent(stmt), Some(block));
    assert_eq!(tree.parent(block), None);
    assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![add, stmt, block]);
}

#[test]
fn test_descendants_preorder() {
    let (tree, [block, stmt, add, a, b]) = small_tree();
    assert_eq!(tree.descendants(block), vec![block, stmt, add, a, b]);
}

#[test]
fn test_replace_leaves_base_untouched() {
    let (base, [_, _, add, a, _]) = small_tree();
    let mut next = base.clone();
    assert!(next.same_version(&base));

    let c_name = next.intern("c");
    let c = next.alloc(NodeKind::Ident(c_name), Span::DUMMY);
    assert!(next.replace(a, c));

    assert!(!next.same_version(&base));
    assert_eq!(
        base.kind(add),
        NodeKind::Binary {
            op: BinaryOp::Add,
            left: a,
            right: NodeId::new(1),
        }
    );
    let NodeKind::Binary { left, .. } = next.kind(add) else {
        panic!("expected binary");
    };
    assert_eq!(left, c);
    assert_eq!(next.parent(c), Some(add));
    assert_eq!(next.parent(a), None);
    assert_eq!(base.parent(a), Some(add));
}

#[test]
fn test_replace_child_with_wrapper() {
    let (mut tree, [_, _, add, a, _]) = small_tree();
    let paren = tree.alloc(NodeKind::Paren { inner: a }, Span::DUMMY);
    // `a` already points at the wrapper, so name the old parent explicitly.
    assert_eq!(tree.parent(a), Some(paren));
    assert!(tree.replace_child(add, a, paren));
    assert_eq!(tree.parent(paren), Some(add));
    assert_eq!(tree.parent(a), Some(paren));
}

#[test]
fn test_splice_inserts_before() {
    let (mut tree, [block, stmt, _, _, _]) = small_tree();
    let zero = tree.alloc(NodeKind::Int(0), Span::DUMMY);
    let first = tree.alloc(NodeKind::ExprStmt { expr: zero }, Span::DUMMY);
    assert!(tree.splice_child(block, stmt, &[first, stmt]));
    assert_eq!(tree.children(block).to_vec(), vec![first, stmt]);
    assert_eq!(tree.parent(stmt), Some(block));
}

#[test]
fn test_duplicate_is_deep() {
    let (mut tree, [_, _, add, a, _]) = small_tree();
    let copy = tree.duplicate(add);
    assert_ne!(copy, add);
    let NodeKind::Binary { left, .. } = tree.kind(copy) else {
        panic!("expected binary");
    };
    assert_ne!(left, a);
    assert_eq!(tree.kind(left), tree.kind(a));
    assert_eq!(tree.parent(a), Some(add));
    assert_eq!(tree.parent(left), Some(copy));
}

#[test]
fn test_covering_node() {
    let (tree, [block, _, add, a, _]) = small_tree();
    assert_eq!(tree.covering_node(Span::new(2, 3)), Some(a));
    assert_eq!(tree.covering_node(Span::new(3, 6)), Some(add));
    assert_eq!(tree.covering_node(Span::new(8, 9)), Some(block));
    assert_eq!(tree.covering_node(Span::new(8, 40)), None);
}

#[test]
fn test_long_child_list() {
    let mut tree = SyntaxTree::new(SharedInterner::new());
    let ids: Vec<NodeId> = (0..70_000)
        .map(|i| tree.alloc(NodeKind::Int(i), Span::DUMMY))
        .collect();
    let range = tree.alloc_list(ids.iter().copied());
    assert_eq!(range.len(), 70_000);
    let list = tree.list(range);
    assert_eq!(list.first(), ids.first());
    assert_eq!(list.last(), ids.last());
}
