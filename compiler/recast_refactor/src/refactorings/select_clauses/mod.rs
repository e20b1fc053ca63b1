//! `Select` chains: compose consecutive projections into one, or peel a
//! nested call apart into consecutive projections.

use recast_ir::{NodeId, NodeKind, SyntaxTree};

use super::{copy_param, is_parenthesized, merged_parameter};
use crate::binding::Binding;
use crate::compose::{self, Layer};
use crate::syntax;
use crate::{chain, RefactorError};
use crate::{RefactorAction, RefactorContext, RefactorResult, Refactoring, RefactoringKind};

/// `xs.Select(f).Select(g)` to `xs.Select(x => g(f(x)))`.
pub(crate) struct MergeSelect;

impl Refactoring for MergeSelect {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::MergeSelect
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let container = syntax::statement_of(ctx.tree, node);
        let method = ctx.name("Select");
        let placeholder = ctx.name(&ctx.config.placeholder);
        let mut tree = ctx.tree.clone();
        let oracle = ctx.oracle;
        let Some(chain) = chain::find_chain(
            &mut tree,
            oracle,
            placeholder,
            container,
            method,
            |tree, payload, position| compose::is_composable(tree, oracle, payload, position == 0),
        ) else {
            tracing::trace!("no composable Select chain");
            return Ok(None);
        };

        let preferred = chain.payloads.iter().find(|p| !p.is_synthesized());
        let name = merged_parameter(ctx, &tree, &chain, preferred);
        let parent = tree.parent(chain.outer);
        let Some(body) = compose::compose(&mut tree, oracle, &chain.payloads, name) else {
            return Ok(None);
        };
        let param = syntax::param(&mut tree, name);
        let lambda = syntax::lambda(&mut tree, param, body, false);
        let merged = syntax::invoke(&mut tree, chain.anchor, &[lambda]);
        syntax::replace_in(&mut tree, parent, chain.outer, merged)?;

        Ok(Some(RefactorAction::new(
            self.kind(),
            format!("Merge {} Select calls", chain.calls.len()),
            ctx.tree,
            tree,
        )))
    }
}

/// `xs.Select(x => g(f(x)))` to `xs.Select(f).Select(g)`.
pub(crate) struct SplitSelect;

impl Refactoring for SplitSelect {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::SplitSelect
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let container = syntax::statement_of(ctx.tree, node);
        let method = ctx.name("Select");
        for call in chain::calls_in(ctx.tree, container, method) {
            let Some((_, lambda)) = syntax::single_argument(ctx.tree, call) else {
                continue;
            };
            let Some((param, name, body)) = syntax::simple_lambda(ctx.tree, lambda) else {
                continue;
            };
            let Some(symbol) = ctx.declared(param) else {
                continue;
            };
            let Some(layers) = compose::decompose(ctx.tree, ctx.oracle, body, Binding::Symbol(symbol))
            else {
                continue;
            };
            let Some((_, receiver, _, conditional)) = syntax::invoked_member(ctx.tree, call) else {
                continue;
            };

            let mut tree = ctx.tree.clone();
            let parent = tree.parent(call);
            let parenthesized = is_parenthesized(&tree, lambda);
            let mut current = receiver;
            for (i, layer) in layers.iter().rev().enumerate() {
                let projection = match method_group(&tree, *layer) {
                    Some(group) => group,
                    None => {
                        if i > 0 {
                            let NodeKind::Argument { modifier, .. } = tree.kind(layer.hole) else {
                                return Err(RefactorError::invariant("composition hole is not an argument"));
                            };
                            let value = syntax::ident(&mut tree, name);
                            tree.set_kind(layer.hole, NodeKind::Argument { modifier, value });
                        }
                        let param = copy_param(&mut tree, param);
                        syntax::lambda(&mut tree, param, layer.invoke, parenthesized)
                    }
                };
                let member = syntax::member(&mut tree, current, method, i == 0 && conditional);
                current = syntax::invoke(&mut tree, member, &[projection]);
            }
            syntax::replace_in(&mut tree, parent, call, current)?;

            return Ok(Some(RefactorAction::new(
                self.kind(),
                format!("Split into {} Select calls", layers.len()),
                ctx.tree,
                tree,
            )));
        }
        tracing::trace!("no nested Select projection");
        Ok(None)
    }
}

/// The callee of a layer that only passes its hole along, as a method group.
fn method_group(tree: &SyntaxTree, layer: Layer) -> Option<NodeId> {
    let NodeKind::Invoke { callee, args } = tree.kind(layer.invoke) else {
        return None;
    };
    let only_hole = tree.list(args).as_slice() == [layer.hole];
    (only_hole && syntax::is_stable_path(tree, callee)).then_some(callee)
}

#[cfg(test)]
mod tests;
