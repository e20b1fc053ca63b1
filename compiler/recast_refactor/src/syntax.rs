//! Node builders and structural queries shared by the refactorings.
//!
//! Builders allocate synthesized nodes with [`Span::DUMMY`]. Queries never
//! consult the oracle unless they take one.

use recast_ir::{ArgModifier, BinaryOp, Name, NodeId, NodeKind, Span, SyntaxTree, UnaryOp};
use recast_sema::SymbolOracle;

use crate::{RefactorError, RefactorResult};

// Builders

pub(crate) fn ident(tree: &mut SyntaxTree, name: Name) -> NodeId {
    tree.alloc(NodeKind::Ident(name), Span::DUMMY)
}

pub(crate) fn member(tree: &mut SyntaxTree, receiver: NodeId, name: Name, conditional: bool) -> NodeId {
    tree.alloc(
        NodeKind::Member {
            receiver,
            name,
            conditional,
        },
        Span::DUMMY,
    )
}

/// `callee(args)` with plain arguments.
pub(crate) fn invoke(tree: &mut SyntaxTree, callee: NodeId, args: &[NodeId]) -> NodeId {
    let args: Vec<_> = args.iter().map(|&value| argument(tree, value)).collect();
    let args = tree.alloc_list(args);
    tree.alloc(NodeKind::Invoke { callee, args }, Span::DUMMY)
}

pub(crate) fn argument(tree: &mut SyntaxTree, value: NodeId) -> NodeId {
    tree.alloc(
        NodeKind::Argument {
            modifier: ArgModifier::None,
            value,
        },
        Span::DUMMY,
    )
}

pub(crate) fn param(tree: &mut SyntaxTree, name: Name) -> NodeId {
    tree.alloc(
        NodeKind::Param {
            ty: NodeId::INVALID,
            name,
        },
        Span::DUMMY,
    )
}

/// Single-parameter lambda around `param`.
pub(crate) fn lambda(tree: &mut SyntaxTree, param: NodeId, body: NodeId, parenthesized: bool) -> NodeId {
    let params = tree.alloc_list([param]);
    tree.alloc(
        NodeKind::Lambda {
            params,
            body,
            parenthesized,
        },
        Span::DUMMY,
    )
}

pub(crate) fn paren(tree: &mut SyntaxTree, inner: NodeId) -> NodeId {
    tree.alloc(NodeKind::Paren { inner }, Span::DUMMY)
}

pub(crate) fn binary(tree: &mut SyntaxTree, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
    tree.alloc(NodeKind::Binary { op, left, right }, Span::DUMMY)
}

pub(crate) fn unary(tree: &mut SyntaxTree, op: UnaryOp, operand: NodeId) -> NodeId {
    tree.alloc(NodeKind::Unary { op, operand }, Span::DUMMY)
}

pub(crate) fn index(tree: &mut SyntaxTree, receiver: NodeId, arg: NodeId) -> NodeId {
    let args = tree.alloc_list([arg]);
    tree.alloc(NodeKind::Index { receiver, args }, Span::DUMMY)
}

pub(crate) fn int(tree: &mut SyntaxTree, value: i64) -> NodeId {
    tree.alloc(NodeKind::Int(value), Span::DUMMY)
}

pub(crate) fn type_ref(tree: &mut SyntaxTree, name: &str) -> NodeId {
    let name = tree.intern(name);
    tree.alloc(
        NodeKind::TypeRef {
            name,
            args: recast_ir::NodeRange::EMPTY,
            rank: 0,
        },
        Span::DUMMY,
    )
}

/// `ty name = init;`
pub(crate) fn local_decl(tree: &mut SyntaxTree, ty: &str, name: Name, init: NodeId) -> NodeId {
    let ty = type_ref(tree, ty);
    let declarator = tree.alloc(NodeKind::Declarator { name, init }, Span::DUMMY);
    let declarators = tree.alloc_list([declarator]);
    tree.alloc(NodeKind::LocalDecl { ty, declarators }, Span::DUMMY)
}

pub(crate) fn block(tree: &mut SyntaxTree, stmts: &[NodeId]) -> NodeId {
    let stmts = tree.alloc_list(stmts.iter().copied());
    tree.alloc(NodeKind::Block { stmts }, Span::DUMMY)
}

/// Put `replacement` where `target` is under `parent` (or at the root).
///
/// `parent` must be looked up before `replacement` is built, since building
/// may re-parent `target`.
pub(crate) fn replace_in(
    tree: &mut SyntaxTree,
    parent: Option<NodeId>,
    target: NodeId,
    replacement: NodeId,
) -> RefactorResult<()> {
    let replaced = match parent {
        Some(parent) => tree.replace_child(parent, target, replacement),
        None => {
            tree.set_root(replacement);
            true
        }
    };
    if replaced {
        Ok(())
    } else {
        Err(RefactorError::invariant(format!(
            "{target:?} is not a child of {parent:?}"
        )))
    }
}

/// Insert `before` ahead of statement `stmt`, wrapping in a block when `stmt`
/// is not directly in a statement list.
pub(crate) fn insert_before(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    before: &[NodeId],
) -> RefactorResult<()> {
    let parent = tree.parent(stmt);
    let mut stmts = before.to_vec();
    stmts.push(stmt);
    match parent {
        Some(list)
            if matches!(
                tree.kind(list),
                NodeKind::Block { .. } | NodeKind::CompilationUnit { .. }
            ) =>
        {
            if tree.splice_child(list, stmt, &stmts) {
                Ok(())
            } else {
                Err(RefactorError::invariant("statement missing from its list"))
            }
        }
        _ => {
            let wrapped = block(tree, &stmts);
            replace_in(tree, parent, stmt, wrapped)
        }
    }
}

// Queries

/// Innermost expression under any number of parentheses.
pub(crate) fn strip_parens(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while let NodeKind::Paren { inner } = tree.kind(id) {
        id = inner;
    }
    id
}

/// Forms that need no parentheses as an `&&` operand.
pub(crate) fn is_atomic(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.kind(id) {
        NodeKind::Ident(_)
        | NodeKind::Member { .. }
        | NodeKind::Invoke { .. }
        | NodeKind::Index { .. }
        | NodeKind::Paren { .. } => true,
        NodeKind::Unary { op, .. } => op == UnaryOp::Not,
        NodeKind::Binary { op, .. } => op.is_comparison(),
        kind => kind.is_literal(),
    }
}

/// Forms that bind tighter than any operator.
pub(crate) fn is_primary(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.kind(id) {
        NodeKind::Ident(_)
        | NodeKind::Member { .. }
        | NodeKind::Invoke { .. }
        | NodeKind::Index { .. }
        | NodeKind::Paren { .. } => true,
        kind => kind.is_literal(),
    }
}

/// The single plain argument of an invocation: `(argument node, value)`.
pub(crate) fn single_argument(tree: &SyntaxTree, invoke: NodeId) -> Option<(NodeId, NodeId)> {
    let NodeKind::Invoke { args, .. } = tree.kind(invoke) else {
        return None;
    };
    match tree.list(args).as_slice() {
        [arg] => match tree.kind(*arg) {
            NodeKind::Argument {
                modifier: ArgModifier::None,
                value,
            } => Some((*arg, value)),
            _ => None,
        },
        _ => None,
    }
}

/// Member access called by `invoke`: `(member, receiver, name, conditional)`.
pub(crate) fn invoked_member(tree: &SyntaxTree, invoke: NodeId) -> Option<(NodeId, NodeId, Name, bool)> {
    let NodeKind::Invoke { callee, .. } = tree.kind(invoke) else {
        return None;
    };
    match tree.kind(callee) {
        NodeKind::Member {
            receiver,
            name,
            conditional,
        } => Some((callee, receiver, name, conditional)),
        _ => None,
    }
}

/// Parts of an expression-bodied lambda with one parameter:
/// `(param node, param name, body)`.
pub(crate) fn simple_lambda(tree: &SyntaxTree, lambda: NodeId) -> Option<(NodeId, Name, NodeId)> {
    let NodeKind::Lambda { params, body, .. } = tree.kind(lambda) else {
        return None;
    };
    let params = tree.list(params);
    let [param] = params.as_slice() else {
        return None;
    };
    let NodeKind::Param { name, .. } = tree.kind(*param) else {
        return None;
    };
    if matches!(tree.kind(body), NodeKind::Block { .. }) {
        return None;
    }
    Some((*param, name, body))
}

/// Identifiers joined by non-conditional member access.
pub(crate) fn is_stable_path(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.kind(id) {
        NodeKind::Ident(_) => true,
        NodeKind::Member {
            receiver,
            conditional: false,
            ..
        } => is_stable_path(tree, receiver),
        _ => false,
    }
}

/// Leftmost identifier of a name path.
pub(crate) fn path_root(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while let NodeKind::Member { receiver, .. } = tree.kind(id) {
        id = receiver;
    }
    id
}

/// Last name of a name path.
pub(crate) fn path_last_name(tree: &SyntaxTree, id: NodeId) -> Option<Name> {
    match tree.kind(id) {
        NodeKind::Ident(name) | NodeKind::Member { name, .. } => Some(name),
        _ => None,
    }
}

/// Two name paths denote the same storage: identifiers bound to the same
/// symbol (or, unresolved, spelled the same) and equal member names.
pub(crate) fn same_path(tree: &SyntaxTree, oracle: &dyn SymbolOracle, a: NodeId, b: NodeId) -> bool {
    match (tree.kind(a), tree.kind(b)) {
        (NodeKind::Ident(x), NodeKind::Ident(y)) => {
            match (oracle.symbol_of(a), oracle.symbol_of(b)) {
                (Some(sa), Some(sb)) => sa == sb,
                (None, None) => x == y,
                _ => false,
            }
        }
        (
            NodeKind::Member {
                receiver: ra,
                name: na,
                conditional: false,
            },
            NodeKind::Member {
                receiver: rb,
                name: nb,
                conditional: false,
            },
        ) => na == nb && same_path(tree, oracle, ra, rb),
        _ => false,
    }
}

/// Nearest statement containing `id`, or `id` itself.
pub(crate) fn statement_of(tree: &SyntaxTree, id: NodeId) -> NodeId {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .find(|&n| tree.kind(n).is_statement())
        .unwrap_or(id)
}

/// `true` if evaluating the subtree may have an observable effect.
pub(crate) fn has_side_effects(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.descendants(id).into_iter().any(|n| match tree.kind(n) {
        NodeKind::Invoke { .. } | NodeKind::Assign { .. } => true,
        NodeKind::Unary { op, .. } => op.writes_operand(),
        _ => false,
    })
}

/// `true` if `expr` is written where it stands: assigned, incremented or
/// passed by `ref`/`out`.
pub(crate) fn is_written(tree: &SyntaxTree, expr: NodeId) -> bool {
    let Some(parent) = tree.parent(expr) else {
        return false;
    };
    match tree.kind(parent) {
        NodeKind::Assign { target, .. } => target == expr,
        NodeKind::Unary { op, .. } => op.writes_operand(),
        NodeKind::Argument { modifier, .. } => modifier.is_writable(),
        _ => false,
    }
}

/// Names declared or referenced anywhere under `root`.
pub(crate) fn names_in(tree: &SyntaxTree, root: NodeId) -> rustc_hash::FxHashSet<Name> {
    tree.descendants(root)
        .into_iter()
        .filter_map(|n| match tree.kind(n) {
            NodeKind::Ident(name)
            | NodeKind::Param { name, .. }
            | NodeKind::Declarator { name, .. }
            | NodeKind::ForEach { name, .. } => Some(name),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use recast_ir::SharedInterner;

    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        recast_parse::parse(source, SharedInterner::new())
            .unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn expr_of(tree: &SyntaxTree) -> NodeId {
        let stmt = tree.children(tree.root())[0];
        tree.children(stmt)[0]
    }

    #[test]
    fn test_atomic_forms() {
        let cases = [
            ("a;", true),
            ("!a;", true),
            ("a < b;", true),
            ("a.B(c);", true),
            ("(a || b);", true),
            ("a || b;", false),
            ("a && b;", false),
            ("a + b;", false),
            ("-a;", false),
        ];
        for (source, atomic) in cases {
            let tree = parse(source);
            assert_eq!(is_atomic(&tree, expr_of(&tree)), atomic, "{source}");
        }
    }

    #[test]
    fn test_stable_paths() {
        for (source, stable) in [("a.b.c;", true), ("a?.b;", false), ("a().b;", false), ("a[0];", false)] {
            let tree = parse(source);
            assert_eq!(is_stable_path(&tree, expr_of(&tree)), stable, "{source}");
        }
    }

    #[test]
    fn test_insert_before_wraps_embedded_statement() {
        let mut tree = parse("if (c) F();");
        let stmt = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| matches!(tree.kind(n), NodeKind::ExprStmt { .. }))
            .unwrap_or_else(|| panic!("no statement"));
        let name = tree.intern("t");
        let zero = int(&mut tree, 0);
        let decl = local_decl(&mut tree, "var", name, zero);
        assert_eq!(insert_before(&mut tree, stmt, &[decl]), Ok(()));
        assert_eq!(
            recast_fmt::print_tree(&tree),
            "if (c) {\n    var t = 0;\n    F();\n}\n"
        );
    }
}
