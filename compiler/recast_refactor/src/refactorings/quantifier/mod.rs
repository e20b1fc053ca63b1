//! `All` and `Any` are duals: `xs.All(p)` is `!xs.Any(x => !p(x))`.

use recast_ir::{Name, NodeId, NodeKind, SyntaxTree, UnaryOp};

use crate::syntax;
use crate::{RefactorAction, RefactorContext, RefactorError, RefactorResult, Refactoring, RefactoringKind};

/// Swap `All` and `Any`, negating the predicate and the call.
pub(crate) struct InvertQuantifier;

impl Refactoring for InvertQuantifier {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::InvertQuantifier
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let container = syntax::statement_of(ctx.tree, node);
        let (all, any) = (ctx.name("All"), ctx.name("Any"));
        let Some((call, quantifier)) = ctx
            .tree
            .descendants(container)
            .into_iter()
            .find_map(|id| invertible_call(ctx.tree, id, all, any))
        else {
            tracing::trace!("no invertible All/Any call");
            return Ok(None);
        };
        let dual = if quantifier == all { any } else { all };

        let mut tree = ctx.tree.clone();
        let Some((member, receiver, _, conditional)) = syntax::invoked_member(&tree, call) else {
            return Err(RefactorError::invariant("quantifier call lost its member"));
        };
        let Some((_, lambda)) = syntax::single_argument(&tree, call) else {
            return Err(RefactorError::invariant("quantifier call lost its predicate"));
        };
        let NodeKind::Lambda {
            params,
            body,
            parenthesized,
        } = tree.kind(lambda)
        else {
            return Err(RefactorError::invariant("quantifier predicate is not a lambda"));
        };

        let body = negate_predicate(&mut tree, body)?;
        tree.set_kind(
            lambda,
            NodeKind::Lambda {
                params,
                body,
                parenthesized,
            },
        );
        tree.set_kind(
            member,
            NodeKind::Member {
                receiver,
                name: dual,
                conditional,
            },
        );
        negate_call(&mut tree, call)?;

        Ok(Some(RefactorAction::new(
            self.kind(),
            format!("Replace {} with {}", ctx.text(quantifier), ctx.text(dual)),
            ctx.tree,
            tree,
        )))
    }
}

/// `(call, quantifier name)` if `id` is `All` or `Any` over a lambda whose
/// body can be negated without growing.
fn invertible_call(tree: &SyntaxTree, id: NodeId, all: Name, any: Name) -> Option<(NodeId, Name)> {
    let (_, _, name, _) = syntax::invoked_member(tree, id)?;
    if name != all && name != any {
        return None;
    }
    let (_, lambda) = syntax::single_argument(tree, id)?;
    let (_, _, body) = syntax::simple_lambda(tree, lambda)?;
    let negatable = match tree.kind(body) {
        NodeKind::Unary { op, .. } => op == UnaryOp::Not,
        NodeKind::Binary { op, .. } => op.is_comparison(),
        NodeKind::Ident(_) | NodeKind::Member { .. } | NodeKind::Invoke { .. } => true,
        _ => false,
    };
    negatable.then_some((id, name))
}

/// `!e` to `e` (dropping one layer of parentheses), `a < b` to `a >= b`,
/// and any other accepted form `e` to `!e`.
fn negate_predicate(tree: &mut SyntaxTree, body: NodeId) -> RefactorResult<NodeId> {
    match tree.kind(body) {
        NodeKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => Ok(match tree.kind(operand) {
            NodeKind::Paren { inner } => inner,
            _ => operand,
        }),
        NodeKind::Binary { op, left, right } => {
            let negated = op.negated().ok_or_else(|| {
                RefactorError::invariant(format!("`{}` has no negation", op.as_symbol()))
            })?;
            let span = tree.span(body);
            Ok(tree.alloc(
                NodeKind::Binary {
                    op: negated,
                    left,
                    right,
                },
                span,
            ))
        }
        NodeKind::Ident(_) | NodeKind::Member { .. } | NodeKind::Invoke { .. } => {
            Ok(syntax::unary(tree, UnaryOp::Not, body))
        }
        kind => Err(RefactorError::invariant(format!(
            "cannot negate predicate {kind:?}"
        ))),
    }
}

/// Negate the value of `call` where it stands: remove an existing `!`
/// (looking through parentheses), otherwise add one.
fn negate_call(tree: &mut SyntaxTree, call: NodeId) -> RefactorResult<()> {
    let mut outer = call;
    while let Some(parent) = tree.parent(outer) {
        if !matches!(tree.kind(parent), NodeKind::Paren { .. }) {
            break;
        }
        outer = parent;
    }

    let parent = tree.parent(outer);
    if let Some(not) = parent.filter(|&p| {
        matches!(
            tree.kind(p),
            NodeKind::Unary {
                op: UnaryOp::Not,
                ..
            }
        )
    }) {
        let holder = tree.parent(not);
        return syntax::replace_in(tree, holder, not, call);
    }

    let holder = tree.parent(call);
    let needs_parens = holder.is_some_and(|h| match tree.kind(h) {
        NodeKind::Member { receiver, .. } | NodeKind::Index { receiver, .. } => receiver == call,
        NodeKind::Invoke { callee, .. } => callee == call,
        _ => false,
    });
    let negated = syntax::unary(tree, UnaryOp::Not, call);
    let negated = if needs_parens {
        syntax::paren(tree, negated)
    } else {
        negated
    };
    syntax::replace_in(tree, holder, call, negated)
}
