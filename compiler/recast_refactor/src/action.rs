//! The result of a successful refactoring attempt.

use recast_ir::SyntaxTree;

use crate::{RefactorError, RefactoringKind};

/// A rewrite from one exact tree version to a new tree.
///
/// The rewrite is computed eagerly; `apply` only checks that it is handed
/// the version it was derived from.
#[derive(Clone)]
pub struct RefactorAction {
    kind: RefactoringKind,
    title: String,
    base: SyntaxTree,
    result: SyntaxTree,
}

impl RefactorAction {
    pub(crate) fn new(
        kind: RefactoringKind,
        title: impl Into<String>,
        base: &SyntaxTree,
        result: SyntaxTree,
    ) -> Self {
        let title = title.into();
        tracing::debug!(kind = kind.name(), %title, "refactoring offered");
        RefactorAction {
            kind,
            title,
            base: base.clone(),
            result,
        }
    }

    pub fn kind(&self) -> RefactoringKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rewrite `tree`, which must be the version the action was computed for.
    pub fn apply(&self, tree: &SyntaxTree) -> Result<SyntaxTree, RefactorError> {
        if !tree.same_version(&self.base) {
            return Err(RefactorError::StaleTree {
                title: self.title.clone(),
            });
        }
        Ok(self.result.clone())
    }
}

impl std::fmt::Debug for RefactorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefactorAction")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
