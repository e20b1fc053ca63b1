//! Counted loops and element loops.
//!
//! `for (int i = 0; i < xs.Length; i++)` whose body only reads `xs[i]`
//! becomes `foreach (var x in xs)`, and back. The conversion to a counted
//! loop materializes the collection into a local when it cannot be indexed
//! where it stands.

use recast_ir::{BinaryOp, NodeId, NodeKind, NodeRange, SyntaxTree, UnaryOp};
use recast_sema::Symbol;

use crate::flow;
use crate::names::{self, NameScope};
use crate::rewrite;
use crate::syntax;
use crate::{RefactorAction, RefactorContext, RefactorResult, Refactoring, RefactoringKind};

/// A `for` loop that walks a collection by index.
struct CountedLoop {
    id: NodeId,
    counter: Symbol,
    collection: NodeId,
    body: NodeId,
}

/// Recognize `for (int i = 0; i < coll.Length; i++)`, also with `Count` or
/// `Count()` as the bound and `++i` as the step.
fn counted_loop(ctx: &RefactorContext<'_>, id: NodeId) -> Option<CountedLoop> {
    let tree = ctx.tree;
    let NodeKind::For {
        decl,
        initializers,
        cond,
        incrementors,
        body,
    } = tree.kind(id)
    else {
        return None;
    };
    if !initializers.is_empty() {
        return None;
    }
    let NodeKind::LocalDecl { declarators, .. } = tree.kind(decl) else {
        return None;
    };
    let declarators = tree.list(declarators);
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let NodeKind::Declarator { init, .. } = tree.kind(*declarator) else {
        return None;
    };
    if tree.kind(init) != NodeKind::Int(0) {
        return None;
    }
    let counter = ctx.declared(*declarator)?;
    if !ctx.oracle.is_integral(&ctx.oracle.symbol_type(counter)) {
        return None;
    }

    let NodeKind::Binary {
        op: BinaryOp::Lt,
        left,
        right,
    } = tree.kind(cond)
    else {
        return None;
    };
    if !ctx.refers_to(left, counter) {
        return None;
    }
    let collection = bound_collection(ctx, right)?;
    if !syntax::is_stable_path(tree, collection) {
        return None;
    }

    let incrementors = tree.list(incrementors);
    let [step] = incrementors.as_slice() else {
        return None;
    };
    let NodeKind::Unary {
        op: UnaryOp::PostInc | UnaryOp::PreInc,
        operand,
    } = tree.kind(*step)
    else {
        return None;
    };
    if !ctx.refers_to(operand, counter) {
        return None;
    }

    Some(CountedLoop {
        id,
        counter,
        collection,
        body,
    })
}

/// `coll` from `coll.Length`, `coll.Count` or `coll.Count()`.
fn bound_collection(ctx: &RefactorContext<'_>, bound: NodeId) -> Option<NodeId> {
    let (length, count) = (ctx.name("Length"), ctx.name("Count"));
    match ctx.tree.kind(bound) {
        NodeKind::Member {
            receiver,
            name,
            conditional: false,
        } if name == length || name == count => Some(receiver),
        NodeKind::Invoke { callee, args } if args.is_empty() => match ctx.tree.kind(callee) {
            NodeKind::Member {
                receiver,
                name,
                conditional: false,
            } if name == count => Some(receiver),
            _ => None,
        },
        _ => None,
    }
}

/// `id` and its ancestors, innermost first.
fn enclosing(tree: &SyntaxTree, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::once(id).chain(tree.ancestors(id))
}

/// `for` over indices to `foreach` over elements.
pub(crate) struct ForToForEach;

impl Refactoring for ForToForEach {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::ForToForEach
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let candidate = enclosing(ctx.tree, node)
            .filter_map(|id| counted_loop(ctx, id))
            .find(|lp| {
                match flow::check_indexed_reads(ctx.tree, ctx.oracle, lp.body, lp.counter, lp.collection) {
                    Ok(()) => true,
                    Err(hazard) => {
                        tracing::trace!(hazard = hazard.describe(), "counted loop rejected");
                        false
                    }
                }
            });
        let Some(CountedLoop {
            id,
            counter,
            collection,
            body,
        }) = candidate
        else {
            return Ok(None);
        };

        let mut preferred = Vec::new();
        if let Some(last) = syntax::path_last_name(ctx.tree, collection) {
            preferred.extend(names::singularize(ctx.text(last)));
        }
        let element_ty = ctx.oracle.element_type(&ctx.oracle.type_of(collection));
        preferred.extend(names::name_for_type(ctx.tree, &element_ty));
        let element = NameScope::new(ctx.tree, ctx.oracle, id)
            .avoiding(id)
            .pick(preferred, &ctx.config.iteration);

        let mut tree = ctx.tree.clone();
        let parent = tree.parent(id);
        let (body, replaced) =
            rewrite::index_to_ident(&mut tree, ctx.oracle, body, counter, collection, element);
        tracing::trace!(replaced, "element accesses rewritten");
        let ty = syntax::type_ref(&mut tree, "var");
        let span = tree.span(id);
        let foreach = tree.alloc(
            NodeKind::ForEach {
                ty,
                name: element,
                collection,
                body,
            },
            span,
        );
        syntax::replace_in(&mut tree, parent, id, foreach)?;

        Ok(Some(RefactorAction::new(
            self.kind(),
            "Convert to foreach",
            ctx.tree,
            tree,
        )))
    }
}

/// Where the counted loop reads its elements from.
enum Indexed {
    /// The collection expression itself.
    InPlace,
    /// A copy of the collection in a local.
    Local,
    /// `collection.ToArray()` in a local.
    Array,
}

/// `foreach` over elements to `for` over indices.
pub(crate) struct ForEachToFor;

impl Refactoring for ForEachToFor {
    fn kind(&self) -> RefactoringKind {
        RefactoringKind::ForEachToFor
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = ?node))]
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>> {
        let Some(foreach) = enclosing(ctx.tree, node)
            .find(|&id| matches!(ctx.tree.kind(id), NodeKind::ForEach { .. }))
        else {
            return Ok(None);
        };
        let NodeKind::ForEach {
            collection, body, ..
        } = ctx.tree.kind(foreach)
        else {
            return Ok(None);
        };
        let Some(element) = ctx.declared(foreach) else {
            return Ok(None);
        };
        if let Err(hazard) = flow::check_element_reads(ctx.tree, ctx.oracle, body, element, collection) {
            tracing::trace!(hazard = hazard.describe(), "element loop rejected");
            return Ok(None);
        }

        let collection_ty = ctx.oracle.type_of(collection);
        let (indexed, length) = match ctx.oracle.collection_shape(&collection_ty) {
            Some(shape) if syntax::is_stable_path(ctx.tree, collection) => {
                (Indexed::InPlace, shape.length_member)
            }
            Some(shape) => (Indexed::Local, shape.length_member),
            None if !ctx.oracle.element_type(&collection_ty).is_unknown() => {
                (Indexed::Array, ctx.name("Length"))
            }
            None => {
                tracing::trace!("collection type unknown");
                return Ok(None);
            }
        };

        let mut scope = NameScope::new(ctx.tree, ctx.oracle, foreach).avoiding(foreach);
        let mut tree = ctx.tree.clone();
        let parent = tree.parent(foreach);
        let (target, hoisted) = match indexed {
            Indexed::InPlace => (collection, None),
            Indexed::Local => {
                let name = scope.pick(None, &ctx.config.materialized_items);
                let decl = syntax::local_decl(&mut tree, "var", name, collection);
                (syntax::ident(&mut tree, name), Some(decl))
            }
            Indexed::Array => {
                let name = scope.pick(None, &ctx.config.materialized_array);
                let to_array = syntax::member(&mut tree, collection, ctx.name("ToArray"), false);
                let init = syntax::invoke(&mut tree, to_array, &[]);
                let decl = syntax::local_decl(&mut tree, "var", name, init);
                (syntax::ident(&mut tree, name), Some(decl))
            }
        };
        let counter = scope.pick(None, &ctx.config.counter);

        let body = rewrite::ident_to_index(&mut tree, ctx.oracle, body, element, target, counter);
        let zero = syntax::int(&mut tree, 0);
        let decl = syntax::local_decl(&mut tree, "int", counter, zero);
        let bound = syntax::member(&mut tree, target, length, false);
        let counter_ref = syntax::ident(&mut tree, counter);
        let cond = syntax::binary(&mut tree, BinaryOp::Lt, counter_ref, bound);
        let step_ref = syntax::ident(&mut tree, counter);
        let step = syntax::unary(&mut tree, UnaryOp::PostInc, step_ref);
        let incrementors = tree.alloc_list([step]);
        let span = tree.span(foreach);
        let for_loop = tree.alloc(
            NodeKind::For {
                decl,
                initializers: NodeRange::EMPTY,
                cond,
                incrementors,
                body,
            },
            span,
        );
        syntax::replace_in(&mut tree, parent, foreach, for_loop)?;
        if let Some(hoisted) = hoisted {
            syntax::insert_before(&mut tree, for_loop, &[hoisted])?;
        }

        Ok(Some(RefactorAction::new(
            self.kind(),
            "Convert to for",
            ctx.tree,
            tree,
        )))
    }
}
