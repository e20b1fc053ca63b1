//! Pattern finder: runs of consecutive same-named combinator calls.
//!
//! `xs.Where(a).Where(b).Where(c)` is one run of three `Where` calls over the
//! source `xs`. Each call's argument is normalized into a [`Payload`]: a
//! single parameter and an expression body. A method group `f` becomes
//! `f(__arg)` over the configured placeholder name, so callers never
//! special-case it.

use recast_ir::{Name, NodeId, NodeKind, SyntaxTree};
use recast_sema::SymbolOracle;
use rustc_hash::FxHashSet;

use crate::binding::Binding;
use crate::syntax;

/// One combinator argument as `param => body`.
#[derive(Clone, Debug)]
pub(crate) struct Payload {
    pub param: Name,
    pub binding: Binding,
    pub body: NodeId,
}

impl Payload {
    pub(crate) fn is_synthesized(&self) -> bool {
        self.binding.is_synthesized()
    }

    /// `true` if renaming the parameter to `name` would capture something:
    /// the body mentions a different entity spelled `name`, or declares it.
    pub(crate) fn captures(&self, tree: &SyntaxTree, oracle: &dyn SymbolOracle, name: Name) -> bool {
        tree.descendants(self.body).into_iter().any(|n| match tree.kind(n) {
            NodeKind::Ident(text) => text == name && !self.binding.matches(tree, oracle, n),
            NodeKind::Param { name: declared, .. } => declared == name,
            _ => false,
        })
    }
}

/// A maximal run of calls, innermost first.
#[derive(Clone, Debug)]
pub(crate) struct Chain {
    /// Outermost invocation; the run is replaced here.
    pub outer: NodeId,
    /// Member access of the innermost call.
    pub anchor: NodeId,
    pub calls: Vec<NodeId>,
    pub payloads: Vec<Payload>,
}

/// `true` if `id` is `receiver.method(arg)` with one plain argument.
pub(crate) fn is_call(tree: &SyntaxTree, id: NodeId, method: Name) -> bool {
    syntax::invoked_member(tree, id).is_some_and(|(_, _, name, _)| name == method)
        && syntax::single_argument(tree, id).is_some()
}

/// Calls of `method` under `container`, outermost first.
pub(crate) fn calls_in(tree: &SyntaxTree, container: NodeId, method: Name) -> Vec<NodeId> {
    tree.descendants(container)
        .into_iter()
        .filter(|&id| is_call(tree, id, method))
        .collect()
}

/// Normalize the argument `value` of a call into a payload.
///
/// Method groups are copied into a synthesized call; the original syntax
/// is left where it is.
pub(crate) fn payload_of(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    placeholder: Name,
    value: NodeId,
) -> Option<Payload> {
    if let Some((param, name, body)) = syntax::simple_lambda(tree, value) {
        let symbol = oracle.declared_symbol(param)?;
        return Some(Payload {
            param: name,
            binding: Binding::Symbol(symbol),
            body,
        });
    }
    if !syntax::is_stable_path(tree, value) {
        return None;
    }
    let group = tree.duplicate(value);
    let reference = syntax::ident(tree, placeholder);
    let body = syntax::invoke(tree, group, &[reference]);
    Some(Payload {
        param: placeholder,
        binding: Binding::Synthesized(reference),
        body,
    })
}

/// First run of two or more `method` calls under `container` whose payloads
/// all pass `accept`, which also receives the payload's position in the run.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn find_chain(
    tree: &mut SyntaxTree,
    oracle: &dyn SymbolOracle,
    placeholder: Name,
    container: NodeId,
    method: Name,
    mut accept: impl FnMut(&SyntaxTree, &Payload, usize) -> bool,
) -> Option<Chain> {
    let mut seen = FxHashSet::default();
    for candidate in calls_in(tree, container, method) {
        if seen.contains(&candidate) {
            continue;
        }
        let Some((_, receiver, _, _)) = syntax::invoked_member(tree, candidate) else {
            continue;
        };
        if !is_call(tree, receiver, method) {
            continue;
        }

        let mut outer = candidate;
        while let Some(enclosing) = enclosing_call(tree, outer, method) {
            outer = enclosing;
        }
        let mut calls = Vec::new();
        let mut current = outer;
        while is_call(tree, current, method) {
            calls.push(current);
            seen.insert(current);
            match syntax::invoked_member(tree, current) {
                Some((_, receiver, _, _)) => current = receiver,
                None => break,
            }
        }
        calls.reverse();
        let Some((anchor, _, _, _)) = calls.first().and_then(|&c| syntax::invoked_member(tree, c)) else {
            continue;
        };

        let mut payloads = Vec::with_capacity(calls.len());
        for &call in &calls {
            let Some((_, value)) = syntax::single_argument(tree, call) else {
                break;
            };
            let Some(payload) = payload_of(tree, oracle, placeholder, value) else {
                break;
            };
            if !accept(tree, &payload, payloads.len()) {
                break;
            }
            payloads.push(payload);
        }
        if payloads.len() == calls.len() {
            return Some(Chain {
                outer,
                anchor,
                calls,
                payloads,
            });
        }
        tracing::trace!(calls = calls.len(), "rejected combinator run");
    }
    None
}

/// The `.method(...)` call that `call` is the receiver of, if any.
fn enclosing_call(tree: &SyntaxTree, call: NodeId, method: Name) -> Option<NodeId> {
    let member = tree.parent(call)?;
    let NodeKind::Member { receiver, name, .. } = tree.kind(member) else {
        return None;
    };
    if receiver != call || name != method {
        return None;
    }
    let invoke = tree.parent(member)?;
    is_call(tree, invoke, method).then_some(invoke)
}

#[cfg(test)]
mod tests {
    use recast_ir::SharedInterner;
    use recast_sema::SemanticModel;

    use super::*;

    fn setup(source: &str) -> (SyntaxTree, SemanticModel) {
        let tree = recast_parse::parse(source, SharedInterner::new())
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        let model = SemanticModel::build(&tree);
        (tree, model)
    }

    fn find(source: &str, method: &str) -> Option<(SyntaxTree, Chain)> {
        let (tree, model) = setup(source);
        let mut scratch = tree.clone();
        let method = scratch.intern(method);
        let placeholder = scratch.intern("__arg");
        let root = scratch.root();
        let chain = find_chain(&mut scratch, &model, placeholder, root, method, |_, _, _| true)?;
        Some((scratch, chain))
    }

    #[test]
    fn test_maximal_run_innermost_first() {
        let (tree, chain) = find("var q = xs.Where(a => a > 1).Where(F).Where(b => b < 9);", "Where")
            .unwrap_or_else(|| panic!("no chain"));
        assert_eq!(chain.payloads.len(), 3);
        assert_eq!(tree.text(chain.payloads[0].param), "a");
        assert!(chain.payloads[1].is_synthesized());
        assert_eq!(recast_fmt::print_node(&tree, chain.payloads[1].body), "F(__arg)");
        assert_eq!(recast_fmt::print_node(&tree, chain.anchor), "xs.Where");
    }

    #[test]
    fn test_single_call_is_not_a_chain() {
        assert!(find("var q = xs.Where(a => a > 1).Select(F);", "Where").is_none());
    }

    #[test]
    fn test_block_lambda_rejects_run() {
        assert!(find("var q = xs.Where(a => { return a > 1; }).Where(F);", "Where").is_none());
    }

    #[test]
    fn test_rejected_run_does_not_hide_nested_run() {
        let source = "var q = xs.Where(a => a.Ys.Where(G).Where(H).Any()).Where(F);";
        let (tree, model) = setup(source);
        let mut scratch = tree.clone();
        let method = scratch.intern("Where");
        let placeholder = scratch.intern("__arg");
        let root = scratch.root();
        // Refuse any run containing a written lambda.
        let chain = find_chain(&mut scratch, &model, placeholder, root, method, |_, p, _| {
            p.is_synthesized()
        })
        .unwrap_or_else(|| panic!("no chain"));
        assert_eq!(recast_fmt::print_node(&scratch, chain.anchor), "a.Ys.Where");
    }
}
