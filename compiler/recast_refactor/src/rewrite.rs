//! Tree rewriters.
//!
//! One fold, [`Rewriter`], parameterized by a closure that either replaces a
//! node or declines; declined nodes are walked structurally. The closure sees
//! nodes of the input subtree before any of their children are rebuilt, so
//! oracle queries on the ids it receives are answered for the base tree.

use recast_ir::{walk_node, Fold, Name, NodeId, NodeKind, SyntaxTree};
use recast_sema::{Symbol, SymbolOracle};

use crate::binding::Binding;
use crate::syntax;

pub(crate) struct Rewriter<F> {
    rewrite: F,
    replaced: usize,
}

impl<F> Rewriter<F>
where
    F: FnMut(&mut SyntaxTree, NodeId) -> Option<NodeId>,
{
    pub(crate) fn new(rewrite: F) -> Self {
        Rewriter { rewrite, replaced: 0 }
    }

    /// Number of nodes replaced so far.
    pub(crate) fn replaced(&self) -> usize {
        self.replaced
    }
}

impl<F> Fold for Rewriter<F>
where
    F: FnMut(&mut SyntaxTree, NodeId) -> Option<NodeId>,
{
    fn fold_node(&mut self, tree: &mut SyntaxTree, id: NodeId) -> NodeId {
        match (self.rewrite)(tree, id) {
            Some(replacement) => {
                self.replaced += 1;
                replacement
            }
            None => walk_node(self, tree, id),
        }
    }
}

/// Rebuild `root` with every node `rewrite` accepts replaced.
pub(crate) fn replace_where(
    tree: &mut SyntaxTree,
    root: NodeId,
    rewrite: impl FnMut(&mut SyntaxTree, NodeId) -> Option<NodeId>,
) -> (NodeId, usize) {
    let mut rewriter = Rewriter::new(rewrite);
    let folded = rewriter.fold_node(tree, root);
    (folded, rewriter.replaced())
}

/// Rename every reference to `binding` under `root` to `to`.
pub(crate) fn rename_binding(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    root: NodeId,
    binding: Binding,
    to: Name,
) -> NodeId {
    replace_where(tree, root, |tree, id| {
        binding
            .matches(tree, oracle, id)
            .then(|| syntax::ident(tree, to))
    })
    .0
}

/// Substitute `replacement` for every reference to `binding` under `root`.
///
/// The first occurrence takes `replacement` itself, later ones a copy.
/// Substitutes that are not primary expressions are parenthesized unless
/// they fill an argument slot or the whole of `root`.
pub(crate) fn substitute_binding(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    root: NodeId,
    binding: Binding,
    replacement: NodeId,
) -> NodeId {
    let mut used = false;
    replace_where(tree, root, |tree, id| {
        if !binding.matches(tree, oracle, id) {
            return None;
        }
        let value = if used {
            tree.duplicate(replacement)
        } else {
            used = true;
            replacement
        };
        let in_argument = tree
            .parent(id)
            .is_some_and(|p| matches!(tree.kind(p), NodeKind::Argument { .. }));
        if id == root || in_argument || syntax::is_primary(tree, value) {
            Some(value)
        } else {
            Some(syntax::paren(tree, value))
        }
    })
    .0
}

/// Replace `collection[counter]` under `root` with the identifier `element`.
pub(crate) fn index_to_ident(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    root: NodeId,
    counter: Symbol,
    collection: NodeId,
    element: Name,
) -> (NodeId, usize) {
    replace_where(tree, root, |tree, id| {
        let NodeKind::Index { receiver, args } = tree.kind(id) else {
            return None;
        };
        let args = tree.list(args);
        let [arg] = args.as_slice() else {
            return None;
        };
        let indexed_by_counter = oracle.symbol_of(*arg) == Some(counter);
        (indexed_by_counter && syntax::same_path(tree, oracle, receiver, collection))
            .then(|| syntax::ident(tree, element))
    })
}

/// Replace every reference to `element` under `root` with
/// `collection[counter]`, copying `collection` for each occurrence.
pub(crate) fn ident_to_index(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    root: NodeId,
    element: Symbol,
    collection: NodeId,
    counter: Name,
) -> NodeId {
    replace_where(tree, root, |tree, id| {
        if !matches!(tree.kind(id), NodeKind::Ident(_)) || oracle.symbol_of(id) != Some(element) {
            return None;
        }
        let receiver = tree.duplicate(collection);
        let counter = syntax::ident(tree, counter);
        Some(syntax::index(tree, receiver, counter))
    })
    .0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recast_ir::SharedInterner;
    use recast_sema::SemanticModel;

    use super::*;

    fn setup(source: &str) -> (SyntaxTree, SemanticModel) {
        let tree = recast_parse::parse(source, SharedInterner::new())
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        let model = SemanticModel::build(&tree);
        (tree, model)
    }

    fn lambda_of(tree: &SyntaxTree) -> (NodeId, NodeId) {
        let lambda = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| matches!(tree.kind(n), NodeKind::Lambda { .. }))
            .unwrap_or_else(|| panic!("no lambda"));
        let (param, _, body) = syntax::simple_lambda(tree, lambda).unwrap_or_else(|| panic!("not simple"));
        (param, body)
    }

    #[test]
    fn test_rename_respects_shadowing() {
        let (tree, model) = setup("int y = 0; var q = xs.Where(x => x > y && ys.Any(x => x == 1));");
        let (param, body) = lambda_of(&tree);
        let symbol = model.declared_symbol(param).unwrap_or_else(|| panic!("no symbol"));
        let mut scratch = tree.clone();
        let v = scratch.intern("v");
        let renamed = rename_binding(&mut scratch, &model, body, Binding::Symbol(symbol), v);
        assert_eq!(
            recast_fmt::print_node(&scratch, renamed),
            "v > y && ys.Any(x => x == 1)"
        );
    }

    #[test]
    fn test_substitute_parenthesizes_operands() {
        let (tree, model) = setup("var q = xs.Select(x => F(x) * x);");
        let (param, body) = lambda_of(&tree);
        let symbol = model.declared_symbol(param).unwrap_or_else(|| panic!("no symbol"));
        let mut scratch = tree.clone();
        let (a, b) = (scratch.intern("a"), scratch.intern("b"));
        let a = syntax::ident(&mut scratch, a);
        let b = syntax::ident(&mut scratch, b);
        let sum = syntax::binary(&mut scratch, recast_ir::BinaryOp::Add, a, b);
        let result = substitute_binding(&mut scratch, &model, body, Binding::Symbol(symbol), sum);
        assert_eq!(recast_fmt::print_node(&scratch, result), "F(a + b) * (a + b)");
    }

    #[test]
    fn test_untouched_subtree_keeps_its_id() {
        let (tree, model) = setup("var q = xs.Where(x => y > 0);");
        let (param, body) = lambda_of(&tree);
        let symbol = model.declared_symbol(param).unwrap_or_else(|| panic!("no symbol"));
        let mut scratch = tree.clone();
        let v = scratch.intern("v");
        let renamed = rename_binding(&mut scratch, &model, body, Binding::Symbol(symbol), v);
        assert_eq!(renamed, body);
    }
}
