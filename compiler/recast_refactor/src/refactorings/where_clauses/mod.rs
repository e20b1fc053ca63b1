//! `Where` chains: merge consecutive filters into one conjunction, or split
//! a conjunction into consecutive filters.

use recast_ir::NodeId;

use super::{copy_param, is_parenthesized, merged_parameter};
use crate::chain;
use crate::compose;
use crate::syntax;
use crate::{RefactorAction, RefactorContext, RefactorResult, Refactoring, RefactoringKind};

/// `xs.Where(a).Where(b)` to `xs.Where(x => a(x) && b(x))`.
pub(crate) struct MergeWhere;

impl Refactoring for MergeWhere {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::MergeWhere
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let container = syntax::statement_of(ctx.tree, node);
        let method = ctx.name("Where");
        let placeholder = ctx.name(&ctx.config.placeholder);
        let mut tree = ctx.tree.clone();
        let Some(chain) =
            chain::find_chain(&mut tree, ctx.oracle, placeholder, container, method, |_, _, _| true)
        else {
            tracing::trace!("no Where chain");
            return Ok(None);
        };

        let preferred = chain.payloads.iter().find(|p| !p.is_synthesized());
        let name = merged_parameter(ctx, &tree, &chain, preferred);
        let parent = tree.parent(chain.outer);
        let Some(body) = compose::conjoin(&mut tree, ctx.oracle, &chain.payloads, name) else {
            return Ok(None);
        };
        let param = syntax::param(&mut tree, name);
        let lambda = syntax::lambda(&mut tree, param, body, false);
        let merged = syntax::invoke(&mut tree, chain.anchor, &[lambda]);
        syntax::replace_in(&mut tree, parent, chain.outer, merged)?;

        Ok(Some(RefactorAction::new(
            self.kind(),
            format!("Merge {} Where calls", chain.calls.len()),
            ctx.tree,
            tree,
        )))
    }
}

/// `xs.Where(x => a && b)` to `xs.Where(x => a).Where(x => b)`.
pub(crate) struct SplitWhere;

impl Refactoring for SplitWhere {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::SplitWhere
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let container = syntax::statement_of(ctx.tree, node);
        let method = ctx.name("Where");
        for call in chain::calls_in(ctx.tree, container, method) {
            let Some((_, lambda)) = syntax::single_argument(ctx.tree, call) else {
                continue;
            };
            let Some((param, _, body)) = syntax::simple_lambda(ctx.tree, lambda) else {
                continue;
            };
            let factors = compose::conjuncts(ctx.tree, body);
            if factors.len() < 2 {
                continue;
            }
            let Some((_, receiver, _, conditional)) = syntax::invoked_member(ctx.tree, call) else {
                continue;
            };

            let mut tree = ctx.tree.clone();
            let parent = tree.parent(call);
            let parenthesized = is_parenthesized(&tree, lambda);
            let mut current = receiver;
            for (i, &factor) in factors.iter().enumerate() {
                let param = copy_param(&mut tree, param);
                let filter = syntax::lambda(&mut tree, param, factor, parenthesized);
                let member = syntax::member(&mut tree, current, method, i == 0 && conditional);
                current = syntax::invoke(&mut tree, member, &[filter]);
            }
            syntax::replace_in(&mut tree, parent, call, current)?;

            return Ok(Some(RefactorAction::new(
                self.kind(),
                format!("Split into {} Where calls", factors.len()),
                ctx.tree,
                tree,
            )));
        }
        tracing::trace!("no Where conjunction");
        Ok(None)
    }
}

#[cfg(test)]
mod tests;
