//! Call chains and the temporaries between them.
//!
//! `var a = x.F(); var b = a.G();` and `var b = x.F().G();` are the same
//! computation when `a` is used nowhere else. Unchaining introduces
//! `newVar0`, `newVar1`, ... for every intermediate call.

use recast_ir::{Name, NodeId, NodeKind, SyntaxTree};
use recast_sema::Symbol;
use smallvec::SmallVec;

use crate::names::NameScope;
use crate::syntax;
use crate::{RefactorAction, RefactorContext, RefactorError, RefactorResult, Refactoring, RefactoringKind};

/// A consumed temporary: its declaration, initializer, and sole use.
struct Link {
    stmt: NodeId,
    init: NodeId,
    use_site: NodeId,
}

/// `(local, initializer)` of `var t = receiver.M(...);`.
fn chain_decl(ctx: &RefactorContext<'_>, stmt: NodeId) -> Option<(Symbol, NodeId)> {
    let NodeKind::LocalDecl { declarators, .. } = ctx.tree.kind(stmt) else {
        return None;
    };
    let declarators = ctx.tree.list(declarators);
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let NodeKind::Declarator { init, .. } = ctx.tree.kind(*declarator) else {
        return None;
    };
    syntax::invoked_member(ctx.tree, init)?;
    Some((ctx.declared(*declarator)?, init))
}

/// `true` if `id` is the receiver of a member that is called.
fn is_called_receiver(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(member) = tree.parent(id) else {
        return false;
    };
    let is_receiver = matches!(tree.kind(member), NodeKind::Member { receiver, .. } if receiver == id);
    is_receiver
        && tree
            .parent(member)
            .is_some_and(|call| matches!(tree.kind(call), NodeKind::Invoke { callee, .. } if callee == member))
}

/// The only reference to `local` in `stmts[next..]`, provided it sits in
/// `stmts[next]` as the receiver of a call.
fn sole_receiver_use(
    ctx: &RefactorContext<'_>,
    stmts: &[NodeId],
    next: usize,
    local: Symbol,
) -> Option<NodeId> {
    let consumer = *stmts.get(next)?;
    let mut uses = stmts[next..]
        .iter()
        .flat_map(|&stmt| ctx.tree.descendants(stmt))
        .filter(|&n| ctx.refers_to(n, local));
    let use_site = uses.next()?;
    if uses.next().is_some() || !ctx.tree.is_within(use_site, consumer) {
        return None;
    }
    let evaluated_once = is_hoistable(ctx.tree, use_site, consumer);
    (evaluated_once && is_called_receiver(ctx.tree, use_site)).then_some(use_site)
}

/// Innermost receiver of a member, call and index spine.
fn spine_root(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    loop {
        id = match tree.kind(id) {
            NodeKind::Invoke { callee, .. } => callee,
            NodeKind::Member { receiver, .. } | NodeKind::Index { receiver, .. } => receiver,
            _ => return id,
        };
    }
}

/// Temporaries starting at `stmts[start]` that each feed the next statement.
/// The statement consuming the last one is `stmts[start + links.len()]`.
fn run_from(ctx: &RefactorContext<'_>, stmts: &[NodeId], start: usize) -> Option<Vec<Link>> {
    let (mut local, mut init) = chain_decl(ctx, stmts[start])?;
    let mut links = Vec::new();
    let mut k = start;
    while let Some(use_site) = sole_receiver_use(ctx, stmts, k + 1, local) {
        links.push(Link {
            stmt: stmts[k],
            init,
            use_site,
        });
        k += 1;
        match chain_decl(ctx, stmts[k]) {
            Some((next_local, next_init)) if spine_root(ctx.tree, next_init) == use_site => {
                local = next_local;
                init = next_init;
            }
            _ => break,
        }
    }
    (!links.is_empty()).then_some(links)
}

/// Inline single-use temporaries into one call chain.
pub(crate) struct ChainCalls;

impl Refactoring for ChainCalls {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::ChainCalls
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let stmt = syntax::statement_of(ctx.tree, node);
        let Some(list) = ctx.tree.parent(stmt).filter(|&p| {
            matches!(
                ctx.tree.kind(p),
                NodeKind::Block { .. } | NodeKind::CompilationUnit { .. }
            )
        }) else {
            return Ok(None);
        };
        let stmts = ctx.tree.children(list);
        let Some(position) = stmts.iter().position(|&s| s == stmt) else {
            return Err(RefactorError::invariant("statement missing from its list"));
        };
        let Some(links) = (0..=position)
            .filter_map(|start| run_from(ctx, &stmts, start).map(|links| (start, links)))
            .find(|(start, links)| start + links.len() >= position)
            .map(|(_, links)| links)
        else {
            tracing::trace!("no single-use temporaries");
            return Ok(None);
        };

        let mut tree = ctx.tree.clone();
        for link in &links {
            let member = tree.parent(link.use_site);
            syntax::replace_in(&mut tree, member, link.use_site, link.init)?;
        }
        for link in &links {
            if !tree.splice_child(list, link.stmt, &[]) {
                return Err(RefactorError::invariant("temporary declaration missing from its list"));
            }
        }

        let title = match links.len() {
            1 => "Inline temporary into call chain".to_owned(),
            n => format!("Inline {n} temporaries into call chain"),
        };
        Ok(Some(RefactorAction::new(self.kind(), title, ctx.tree, tree)))
    }
}

/// Member invocations along a receiver spine ending at `id`, innermost
/// first, if there are at least two.
fn call_spine(tree: &SyntaxTree, id: NodeId) -> Option<SmallVec<[NodeId; 4]>> {
    let mut spine = SmallVec::new();
    let mut current = id;
    while let Some((_, receiver, _, _)) = syntax::invoked_member(tree, current) {
        spine.push(current);
        current = receiver;
    }
    if spine.len() < 2 {
        return None;
    }
    spine.reverse();
    Some(spine)
}

/// `true` if `expr` is evaluated exactly once whenever `stmt` runs, and
/// nothing evaluated before it in `stmt` has side effects.
fn is_hoistable(tree: &SyntaxTree, expr: NodeId, stmt: NodeId) -> bool {
    let mut child = expr;
    for ancestor in tree.ancestors(expr) {
        let conditional = match tree.kind(ancestor) {
            NodeKind::Lambda { .. } | NodeKind::While { .. } => true,
            NodeKind::If { cond, .. } => child != cond,
            NodeKind::For { decl, .. } => child != decl,
            NodeKind::ForEach { collection, .. } => child != collection,
            NodeKind::Binary { op, right, .. } => op.short_circuits() && right == child,
            NodeKind::Invoke { callee, .. } => {
                matches!(tree.kind(child), NodeKind::Argument { .. })
                    && matches!(
                        tree.kind(callee),
                        NodeKind::Member {
                            conditional: true,
                            ..
                        }
                    )
            }
            _ => false,
        };
        if conditional {
            return false;
        }
        let earlier_effects = tree
            .children(ancestor)
            .into_iter()
            .take_while(|&c| c != child)
            .any(|c| syntax::has_side_effects(tree, c));
        if earlier_effects {
            return false;
        }
        if ancestor == stmt {
            return true;
        }
        child = ancestor;
    }
    false
}

/// `true` if anything under `hoisted` refers to a local declared by `stmt`,
/// as in `var a = y, b = a.F().G();`.
fn reads_own_declaration(ctx: &RefactorContext<'_>, hoisted: NodeId, stmt: NodeId) -> bool {
    let NodeKind::LocalDecl { declarators, .. } = ctx.tree.kind(stmt) else {
        return false;
    };
    let declared: SmallVec<[Symbol; 4]> = ctx
        .tree
        .list(declarators)
        .into_iter()
        .filter_map(|d| ctx.declared(d))
        .collect();
    ctx.tree
        .descendants(hoisted)
        .into_iter()
        .any(|n| declared.iter().any(|&symbol| ctx.refers_to(n, symbol)))
}

/// Split a call chain into one temporary per intermediate call.
pub(crate) struct UnchainCalls;

impl Refactoring for UnchainCalls {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::UnchainCalls
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let stmt = syntax::statement_of(ctx.tree, node);
        if !matches!(
            ctx.tree.kind(stmt),
            NodeKind::ExprStmt { .. } | NodeKind::LocalDecl { .. } | NodeKind::Return { .. }
        ) {
            return Ok(None);
        }
        let in_loop_header = ctx.tree.parent(stmt).is_some_and(|p| {
            matches!(
                ctx.tree.kind(p),
                NodeKind::For { .. } | NodeKind::While { .. } | NodeKind::ForEach { .. }
            )
        });
        if in_loop_header {
            return Ok(None);
        }
        let Some(spine) = ctx
            .tree
            .descendants(stmt)
            .into_iter()
            .find_map(|id| call_spine(ctx.tree, id))
        else {
            return Ok(None);
        };
        let outermost = spine[spine.len() - 1];
        if !is_hoistable(ctx.tree, outermost, stmt) {
            tracing::trace!("call chain is not evaluated unconditionally");
            return Ok(None);
        }
        if reads_own_declaration(ctx, spine[spine.len() - 2], stmt) {
            tracing::trace!("call chain reads a local declared by its statement");
            return Ok(None);
        }

        let mut scope = NameScope::new(ctx.tree, ctx.oracle, stmt).avoiding(stmt);
        let temps: SmallVec<[Name; 4]> = (1..spine.len())
            .map(|_| scope.pick(None, &ctx.config.temporary))
            .collect();

        let mut tree = ctx.tree.clone();
        let mut decls = Vec::with_capacity(temps.len());
        for (k, &temp) in temps.iter().enumerate() {
            let Some((member, _, name, conditional)) = syntax::invoked_member(&tree, spine[k + 1]) else {
                return Err(RefactorError::invariant("call spine lost a member"));
            };
            let receiver = syntax::ident(&mut tree, temp);
            tree.set_kind(
                member,
                NodeKind::Member {
                    receiver,
                    name,
                    conditional,
                },
            );
            decls.push(syntax::local_decl(&mut tree, "var", temp, spine[k]));
        }
        syntax::insert_before(&mut tree, stmt, &decls)?;

        let title = match temps.len() {
            1 => "Introduce temporary".to_owned(),
            n => format!("Introduce {n} temporaries"),
        };
        Ok(Some(RefactorAction::new(self.kind(), title, ctx.tree, tree)))
    }
}

#[cfg(test)]
mod tests;
