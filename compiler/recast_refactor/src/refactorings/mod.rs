//! The orchestrators, one module per family.
//!
//! Each orchestrator follows the same shape: read the base tree and oracle to
//! find its pattern, clone the tree, rewrite the clone, and hand both
//! versions to [`RefactorAction`](crate::RefactorAction).

mod call_chains;
mod loops;
mod quantifier;
mod select_clauses;
mod where_clauses;

pub(crate) use call_chains::{ChainCalls, UnchainCalls};
pub(crate) use loops::{ForEachToFor, ForToForEach};
pub(crate) use quantifier::InvertQuantifier;
pub(crate) use select_clauses::{MergeSelect, SplitSelect};
pub(crate) use where_clauses::{MergeWhere, SplitWhere};

use recast_ir::{Name, NodeId, NodeKind, Span, SyntaxTree};

use crate::chain::{Chain, Payload};
use crate::names::NameScope;
use crate::RefactorContext;

/// Parameter name for the lambda that replaces `chain`.
///
/// `preferred` keeps its own name when no payload would capture it.
/// Otherwise the name comes from the lambda-parameter ladder, avoiding every
/// name spelled anywhere in the chain, so it cannot be captured either.
fn merged_parameter(
    ctx: &RefactorContext<'_>,
    scratch: &SyntaxTree,
    chain: &Chain,
    preferred: Option<&Payload>,
) -> Name {
    let captured =
        |name: Name| chain.payloads.iter().any(|p| p.captures(scratch, ctx.oracle, name));
    if let Some(payload) = preferred.filter(|p| !p.is_synthesized() && !captured(p.param)) {
        return payload.param;
    }
    NameScope::new(ctx.tree, ctx.oracle, chain.outer)
        .avoiding(chain.outer)
        .pick(None, &ctx.config.lambda_parameter)
}

/// A parameter with the same name and (copied) type as `param`.
fn copy_param(tree: &mut SyntaxTree, param: NodeId) -> NodeId {
    let NodeKind::Param { ty, name } = tree.kind(param) else {
        return param;
    };
    let ty = if ty.is_valid() {
        tree.duplicate(ty)
    } else {
        ty
    };
    tree.alloc(NodeKind::Param { ty, name }, Span::DUMMY)
}

fn is_parenthesized(tree: &SyntaxTree, lambda: NodeId) -> bool {
    matches!(
        tree.kind(lambda),
        NodeKind::Lambda {
            parenthesized: true,
            ..
        }
    )
}
