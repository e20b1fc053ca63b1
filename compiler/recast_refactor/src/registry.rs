//! Refactoring registry: kinds, their orchestrators, and span lookup.

use recast_ir::{NodeId, Span};

use crate::refactorings::{
    ChainCalls, ForEachToFor, ForToForEach, InvertQuantifier, MergeSelect, MergeWhere,
    SplitSelect, SplitWhere, UnchainCalls,
};
use crate::{RefactorAction, RefactorContext, RefactorResult};

/// One orchestrator: find its pattern at a node and build the rewrite.
pub trait Refactoring: Send + Sync {
    fn kind(&self) -> RefactoringKind;

    /// `Ok(None)` when the pattern is not present at `node`.
    fn try_get_action(
        &self,
        ctx: &RefactorContext<'_>,
        node: NodeId,
    ) -> RefactorResult<Option<RefactorAction>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefactoringKind {
    MergeWhere,
    SplitWhere,
    MergeSelect,
    SplitSelect,
    InvertQuantifier,
    ForToForEach,
    ForEachToFor,
    ChainCalls,
    UnchainCalls,
}

impl RefactoringKind {
    pub const ALL: [RefactoringKind; 9] = [
        RefactoringKind::MergeWhere,
        RefactoringKind::SplitWhere,
        RefactoringKind::MergeSelect,
        RefactoringKind::SplitSelect,
        RefactoringKind::InvertQuantifier,
        RefactoringKind::ForToForEach,
        RefactoringKind::ForEachToFor,
        RefactoringKind::ChainCalls,
        RefactoringKind::UnchainCalls,
    ];

    /// Command-line spelling.
    pub fn name(self) -> &'static str {
        match self {
            RefactoringKind::MergeWhere => "merge-where",
            RefactoringKind::SplitWhere => "split-where",
            RefactoringKind::MergeSelect => "merge-select",
            RefactoringKind::SplitSelect => "split-select",
            RefactoringKind::InvertQuantifier => "invert-all-any",
            RefactoringKind::ForToForEach => "for-to-foreach",
            RefactoringKind::ForEachToFor => "foreach-to-for",
            RefactoringKind::ChainCalls => "chain-calls",
            RefactoringKind::UnchainCalls => "unchain-calls",
        }
    }

    pub fn from_name(name: &str) -> Option<RefactoringKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn refactoring(self) -> &'static dyn Refactoring {
        match self {
            RefactoringKind::MergeWhere => &MERGE_WHERE,
            RefactoringKind::SplitWhere => &SPLIT_WHERE,
            RefactoringKind::MergeSelect => &MERGE_SELECT,
            RefactoringKind::SplitSelect => &SPLIT_SELECT,
            RefactoringKind::InvertQuantifier => &INVERT_QUANTIFIER,
            RefactoringKind::ForToForEach => &FOR_TO_FOREACH,
            RefactoringKind::ForEachToFor => &FOREACH_TO_FOR,
            RefactoringKind::ChainCalls => &CHAIN_CALLS,
            RefactoringKind::UnchainCalls => &UNCHAIN_CALLS,
        }
    }
}

impl std::fmt::Display for RefactoringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

static MERGE_WHERE: MergeWhere = MergeWhere;
static SPLIT_WHERE: SplitWhere = SplitWhere;
static MERGE_SELECT: MergeSelect = MergeSelect;
static SPLIT_SELECT: SplitSelect = SplitSelect;
static INVERT_QUANTIFIER: InvertQuantifier = InvertQuantifier;
static FOR_TO_FOREACH: ForToForEach = ForToForEach;
static FOREACH_TO_FOR: ForEachToFor = ForEachToFor;
static CHAIN_CALLS: ChainCalls = ChainCalls;
static UNCHAIN_CALLS: UnchainCalls = UnchainCalls;

/// Every refactoring offered for the smallest node covering `span`.
pub fn actions_at(ctx: &RefactorContext<'_>, span: Span) -> RefactorResult<Vec<RefactorAction>> {
    let Some(node) = ctx.tree.covering_node(span) else {
        return Ok(Vec::new());
    };
    let mut actions = Vec::new();
    for kind in RefactoringKind::ALL {
        if let Some(action) = kind.refactoring().try_get_action(ctx, node)? {
            actions.push(action);
        }
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_registered() {
        for kind in RefactoringKind::ALL {
            assert_eq!(kind.refactoring().kind(), kind);
            assert_eq!(RefactoringKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(RefactoringKind::from_name("inline-everything"), None);
    }
}
