//! Fixtures for orchestrator tests: parse, locate, apply, print.

use recast_ir::{NodeId, SharedInterner, Span, SyntaxTree};
use recast_sema::SemanticModel;

use crate::{EngineConfig, RefactorAction, RefactorContext, RefactoringKind};

pub(crate) struct Fixture {
    source: String,
    pub tree: SyntaxTree,
    pub model: SemanticModel,
    pub config: EngineConfig,
}

impl Fixture {
    pub(crate) fn new(source: &str) -> Self {
        let tree = recast_parse::parse(source, SharedInterner::new())
            .unwrap_or_else(|e| panic!("parse failed: {e}\n{source}"));
        let model = SemanticModel::build(&tree);
        Fixture {
            source: source.to_owned(),
            tree,
            model,
            config: EngineConfig::default(),
        }
    }

    #[must_use]
    pub(crate) fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn ctx(&self) -> RefactorContext<'_> {
        RefactorContext::new(&self.tree, &self.model, &self.config)
    }

    /// Smallest node covering the first occurrence of `needle`.
    pub(crate) fn node_at(&self, needle: &str) -> NodeId {
        let start = self
            .source
            .find(needle)
            .unwrap_or_else(|| panic!("`{needle}` not in source"));
        self.tree
            .covering_node(Span::from_range(start..start + needle.len()))
            .unwrap_or_else(|| panic!("no node covers `{needle}`"))
    }

    pub(crate) fn action(&self, kind: RefactoringKind, needle: &str) -> Option<RefactorAction> {
        kind.refactoring()
            .try_get_action(&self.ctx(), self.node_at(needle))
            .unwrap_or_else(|e| panic!("{kind} failed: {e}"))
    }

    /// Printed result of `kind` at `needle`, or `None` if not offered.
    pub(crate) fn apply(&self, kind: RefactoringKind, needle: &str) -> Option<String> {
        let action = self.action(kind, needle)?;
        let result = action
            .apply(&self.tree)
            .unwrap_or_else(|e| panic!("apply failed: {e}"));
        Some(recast_fmt::print_tree(&result))
    }
}

/// Assert that `kind` at `needle` rewrites `source` to `expected`.
#[track_caller]
pub(crate) fn check(kind: RefactoringKind, source: &str, needle: &str, expected: &str) {
    let actual = Fixture::new(source)
        .apply(kind, needle)
        .unwrap_or_else(|| panic!("{kind} not offered at `{needle}` in:\n{source}"));
    pretty_assertions::assert_eq!(actual, expected);
}

/// Assert that `kind` is not offered at `needle`.
#[track_caller]
pub(crate) fn check_declined(kind: RefactoringKind, source: &str, needle: &str) {
    if let Some(actual) = Fixture::new(source).apply(kind, needle) {
        panic!("{kind} unexpectedly offered at `{needle}`, producing:\n{actual}");
    }
}
