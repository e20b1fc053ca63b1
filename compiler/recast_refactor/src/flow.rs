//! Data-flow safety checks for loop conversion.
//!
//! A counted loop may become an element loop only if the body reads the
//! current element and nothing else through the counter. An element loop
//! may become a counted loop only if the body never writes the element
//! variable, never captures it in a lambda, and never reassigns the
//! collection.

use recast_ir::{NodeId, NodeKind, SyntaxTree};
use recast_sema::{Symbol, SymbolOracle};

use crate::syntax;

/// Why a loop body fails the counted-loop check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Hazard {
    /// The counter is used other than as the sole index into the collection.
    CounterEscapes,
    /// An element is assigned, incremented or passed by `ref`/`out`.
    ElementWritten,
    /// The collection (or a name it is reached through) is reassigned.
    CollectionWritten,
    /// A lambda captures the loop variable, whose lifetime would change.
    Captured,
}

impl Hazard {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Hazard::CounterEscapes => "counter used outside an element access",
            Hazard::ElementWritten => "element written through the counter",
            Hazard::CollectionWritten => "collection reassigned in the loop",
            Hazard::Captured => "loop variable captured by a lambda",
        }
    }
}

/// Prove that `body` only reads `collection[counter]`.
pub(crate) fn check_indexed_reads(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    body: NodeId,
    counter: Symbol,
    collection: NodeId,
) -> Result<(), Hazard> {
    for node in tree.descendants(body) {
        if oracle.symbol_of(node) == Some(counter) {
            if is_captured(tree, node, body) {
                return Err(Hazard::CounterEscapes);
            }
            let access = counter_access(tree, oracle, node, collection).ok_or(Hazard::CounterEscapes)?;
            if is_element_written(tree, access) {
                return Err(Hazard::ElementWritten);
            }
        }
    }
    check_collection_kept(tree, oracle, body, collection)
}

/// Fail if anything under `body` reassigns `collection` or a name it is
/// reached through.
fn check_collection_kept(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    body: NodeId,
    collection: NodeId,
) -> Result<(), Hazard> {
    let collection_root = syntax::path_root(tree, collection);
    let reassigned = tree.descendants(body).into_iter().any(|node| {
        syntax::is_written(tree, node)
            && syntax::is_stable_path(tree, node)
            && syntax::same_path(tree, oracle, syntax::path_root(tree, node), collection_root)
    });
    if reassigned {
        Err(Hazard::CollectionWritten)
    } else {
        Ok(())
    }
}

/// `true` if `node` sits in a lambda nested in `body`.
fn is_captured(tree: &SyntaxTree, node: NodeId, body: NodeId) -> bool {
    tree.ancestors(node)
        .take_while(|&a| a != body)
        .any(|a| matches!(tree.kind(a), NodeKind::Lambda { .. }))
}

/// The element access `collection[counter]` that `reference` is the whole
/// index of.
fn counter_access(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    reference: NodeId,
    collection: NodeId,
) -> Option<NodeId> {
    let access = tree.parent(reference)?;
    let NodeKind::Index { receiver, args } = tree.kind(access) else {
        return None;
    };
    let single_index = tree.list(args).as_slice() == [reference];
    (single_index && syntax::same_path(tree, oracle, receiver, collection)).then_some(access)
}

/// `coll[i]`, `coll[i].A` or `coll[i].A.B` written where it stands.
fn is_element_written(tree: &SyntaxTree, access: NodeId) -> bool {
    let mut current = access;
    loop {
        if syntax::is_written(tree, current) {
            return true;
        }
        match tree.parent(current) {
            Some(member)
                if matches!(tree.kind(member), NodeKind::Member { receiver, .. } if receiver == current) =>
            {
                current = member;
            }
            _ => return false,
        }
    }
}

/// Prove that `body` only reads the iteration variable `element` and leaves
/// `collection` alone.
pub(crate) fn check_element_reads(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    body: NodeId,
    element: Symbol,
    collection: NodeId,
) -> Result<(), Hazard> {
    for node in tree.descendants(body) {
        if oracle.symbol_of(node) != Some(element) {
            continue;
        }
        if syntax::is_written(tree, node) {
            return Err(Hazard::ElementWritten);
        }
        if is_captured(tree, node, body) {
            return Err(Hazard::Captured);
        }
    }
    if syntax::is_stable_path(tree, collection) {
        check_collection_kept(tree, oracle, body, collection)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use recast_ir::SharedInterner;
    use recast_sema::SemanticModel;

    use super::*;

    fn check(body: &str) -> Result<(), Hazard> {
        let source = format!("void M(int[] args, int x) {{ for (int i = 0; i < args.Length; i++) {body} }}");
        let tree = recast_parse::parse(&source, SharedInterner::new())
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        let model = SemanticModel::build(&tree);
        let for_loop = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| matches!(tree.kind(n), NodeKind::For { .. }))
            .unwrap_or_else(|| panic!("no loop"));
        let NodeKind::For {
            decl, cond, body, ..
        } = tree.kind(for_loop)
        else {
            panic!("not a loop");
        };
        let declarator = tree.children(decl)[1];
        let counter = model
            .declared_symbol(declarator)
            .unwrap_or_else(|| panic!("no counter"));
        let NodeKind::Binary { right, .. } = tree.kind(cond) else {
            panic!("no bound");
        };
        let NodeKind::Member { receiver, .. } = tree.kind(right) else {
            panic!("no collection");
        };
        check_indexed_reads(&tree, &model, body, counter, receiver)
    }

    #[test]
    fn test_reads_are_safe() {
        assert_eq!(check("{ var s = args[i] + args[i]; F(args[i], args[0]); }"), Ok(()));
        assert_eq!(check("{ F(in args[i]); args[i].Show(); }"), Ok(()));
    }

    #[test]
    fn test_counter_escapes() {
        assert_eq!(check("{ F(i); }"), Err(Hazard::CounterEscapes));
        assert_eq!(check("{ F(args[i + 1]); }"), Err(Hazard::CounterEscapes));
        assert_eq!(check("{ F(other[i]); }"), Err(Hazard::CounterEscapes));
        assert_eq!(check("{ i = i + 1; }"), Err(Hazard::CounterEscapes));
        assert_eq!(check("{ Run(() => F(args[i])); }"), Err(Hazard::CounterEscapes));
    }

    #[test]
    fn test_element_writes() {
        assert_eq!(check("{ args[i] = x; }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ args[i]++; }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ F(ref args[i]); }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ F(out args[i]); }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ args[i].Count = 1; }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ args[i].Inner.Count = 1; }"), Err(Hazard::ElementWritten));
        assert_eq!(check("{ args[i].Inner.Count++; }"), Err(Hazard::ElementWritten));
    }

    #[test]
    fn test_collection_reassigned() {
        assert_eq!(check("{ F(args[i]); args = null; }"), Err(Hazard::CollectionWritten));
    }
}
