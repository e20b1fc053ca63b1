//! Expression composer and decomposer.
//!
//! Predicates combine by conjunction, projections by function composition.
//! Both directions work on payload bodies inside a scratch tree.

use recast_ir::{ArgModifier, BinaryOp, Name, NodeId, NodeKind, SyntaxTree};
use recast_sema::SymbolOracle;

use crate::binding::Binding;
use crate::chain::Payload;
use crate::rewrite;
use crate::syntax;

/// `p0 && p1 && ...` over the parameter `name`, left-associated.
///
/// Each body is renamed to `name` by symbol. Operands that are not atomic
/// are parenthesized; the accumulated conjunction never is.
pub(crate) fn conjoin(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    payloads: &[Payload],
    name: Name,
) -> Option<NodeId> {
    let mut conjunction = None;
    for payload in payloads {
        let body = rewrite::rename_binding(tree, oracle, payload.body, payload.binding, name);
        let operand = if syntax::is_atomic(tree, body) {
            body
        } else {
            syntax::paren(tree, body)
        };
        conjunction = Some(match conjunction {
            None => operand,
            Some(left) => syntax::binary(tree, BinaryOp::And, left, operand),
        });
    }
    conjunction
}

/// Top-level `&&` operands of `body`, left to right.
///
/// Parentheses around the whole body are ignored. A parenthesized operand
/// loses one layer of parentheses and is not factored further.
pub(crate) fn conjuncts(tree: &SyntaxTree, body: NodeId) -> Vec<NodeId> {
    fn collect(tree: &SyntaxTree, id: NodeId, out: &mut Vec<NodeId>) {
        match tree.kind(id) {
            NodeKind::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                collect(tree, left, out);
                collect(tree, right, out);
            }
            NodeKind::Paren { inner } => out.push(inner),
            _ => out.push(id),
        }
    }

    let mut out = Vec::new();
    collect(tree, syntax::strip_parens(tree, body), &mut out);
    out
}

/// `pn(...p1(p0(name)))`: each body substituted for the next payload's
/// parameter, innermost first.
pub(crate) fn compose(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    payloads: &[Payload],
    name: Name,
) -> Option<NodeId> {
    let (first, rest) = payloads.split_first()?;
    let mut composed = rewrite::rename_binding(tree, oracle, first.body, first.binding, name);
    for payload in rest {
        composed = rewrite::substitute_binding(tree, oracle, payload.body, payload.binding, composed);
    }
    Some(composed)
}

/// A payload can take part in composition: its body is a call, and (for
/// every payload but the first) it uses its parameter exactly once.
pub(crate) fn is_composable(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    payload: &Payload,
    first: bool,
) -> bool {
    let is_call = matches!(
        tree.kind(syntax::strip_parens(tree, payload.body)),
        NodeKind::Invoke { .. }
    );
    is_call && (first || payload.binding.references(tree, oracle, payload.body).len() == 1)
}

/// One call of a composition. `hole` is the argument node holding the next
/// layer (or, for the innermost layer, the parameter itself).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Layer {
    pub invoke: NodeId,
    pub hole: NodeId,
}

/// Split `body` into composition layers, outermost first.
///
/// Every layer's callee and non-hole arguments must be independent of the
/// parameter; at most one argument may be a call. Returns `None` unless the
/// whole body validates and has at least two layers.
pub(crate) fn decompose(
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
    body: NodeId,
    binding: Binding,
) -> Option<Vec<Layer>> {
    let references = |id: NodeId| binding.is_referenced(tree, oracle, id);
    let mut layers = Vec::new();
    let mut current = syntax::strip_parens(tree, body);
    loop {
        let NodeKind::Invoke { callee, args } = tree.kind(current) else {
            return None;
        };
        if references(callee) {
            return None;
        }
        let args = tree.list(args);
        let values: Vec<(NodeId, ArgModifier, NodeId)> = args
            .iter()
            .filter_map(|&arg| match tree.kind(arg) {
                NodeKind::Argument { modifier, value } => Some((arg, modifier, value)),
                _ => None,
            })
            .collect();
        let calls: Vec<_> = values
            .iter()
            .filter(|(_, _, value)| matches!(tree.kind(*value), NodeKind::Invoke { .. }))
            .collect();
        if calls.len() > 1 {
            return None;
        }

        if let Some(&&(hole, modifier, next)) = calls.first().filter(|(_, _, v)| references(*v)) {
            let others_clean = values
                .iter()
                .all(|&(arg, _, value)| arg == hole || !references(value));
            if modifier != ArgModifier::None || !others_clean {
                return None;
            }
            layers.push(Layer {
                invoke: current,
                hole,
            });
            current = next;
            continue;
        }

        let mut holes = values.iter().filter(|&&(_, modifier, value)| {
            modifier == ArgModifier::None && binding.matches(tree, oracle, value)
        });
        let (hole, _, _) = *holes.next()?;
        if holes.next().is_some() {
            return None;
        }
        let others_clean = values
            .iter()
            .all(|&(arg, _, value)| arg == hole || !references(value));
        if !others_clean {
            return None;
        }
        layers.push(Layer {
            invoke: current,
            hole,
        });
        break;
    }
    (layers.len() >= 2).then_some(layers)
}
