//! Fresh-name synthesis.
//!
//! A candidate is free at a position when the oracle binds nothing to it
//! there and it is not among the names already taken by the code being
//! rewritten (or by names handed out earlier in the same rewrite).

use recast_ir::{Name, NodeId, SyntaxTree};
use recast_sema::{SymbolOracle, Ty};
use rustc_hash::FxHashSet;

use crate::config::NameLadder;

const KEYWORDS: &[&str] = &[
    "bool", "break", "byte", "case", "char", "class", "const", "continue", "decimal", "default",
    "do", "double", "else", "enum", "false", "float", "for", "foreach", "if", "in", "int",
    "interface", "long", "new", "null", "object", "out", "ref", "return", "short", "static",
    "string", "struct", "switch", "this", "true", "var", "void", "while",
];

/// Bound on numbered candidates; only a stem that is not an identifier gets
/// this far.
const MAX_NUMBERED: usize = 4096;

pub(crate) fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_keyword(text)
}

/// Names available at one position.
pub(crate) struct NameScope<'a> {
    tree: &'a SyntaxTree,
    oracle: &'a dyn SymbolOracle,
    position: NodeId,
    taken: FxHashSet<Name>,
}

impl<'a> NameScope<'a> {
    /// `position` must be a node of the tree the oracle was built for.
    pub(crate) fn new(tree: &'a SyntaxTree, oracle: &'a dyn SymbolOracle, position: NodeId) -> Self {
        NameScope {
            tree,
            oracle,
            position,
            taken: FxHashSet::default(),
        }
    }

    /// Also avoid every name declared or referenced under `root`.
    #[must_use]
    pub(crate) fn avoiding(mut self, root: NodeId) -> Self {
        self.taken.extend(crate::syntax::names_in(self.tree, root));
        self
    }

    pub(crate) fn is_free(&self, text: &str) -> bool {
        if !is_identifier(text) {
            return false;
        }
        let name = self.tree.intern(text);
        !self.taken.contains(&name) && self.oracle.lookup_at(self.position, name).is_none()
    }

    /// Take `name` so later picks avoid it.
    pub(crate) fn reserve(&mut self, name: Name) {
        self.taken.insert(name);
    }

    /// First free candidate from `preferred`, then from `ladder`.
    pub(crate) fn pick(
        &mut self,
        preferred: impl IntoIterator<Item = String>,
        ladder: &NameLadder,
    ) -> Name {
        let text = preferred
            .into_iter()
            .chain(ladder.candidates().take(MAX_NUMBERED))
            .find(|candidate| self.is_free(candidate))
            .unwrap_or_else(|| ladder.stem().to_owned());
        let name = self.tree.intern(&text);
        tracing::trace!(name = %text, "picked fresh name");
        self.reserve(name);
        name
    }
}

/// Singular of an English plural identifier (`args` to `arg`,
/// `entries` to `entry`), if the word looks plural.
pub(crate) fn singularize(word: &str) -> Option<String> {
    let singular = if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        word[..word.len() - 2].to_owned()
    } else if word.ends_with("ss") || word.ends_with("us") {
        return None;
    } else {
        word.strip_suffix('s')?.to_owned()
    };
    (!singular.is_empty() && is_identifier(&singular)).then_some(singular)
}

/// Camel-cased element type name (`Customer` to `customer`).
pub(crate) fn name_for_type(tree: &SyntaxTree, ty: &Ty) -> Option<String> {
    let Ty::Named { name, .. } = ty else {
        return None;
    };
    let text = tree.text(*name);
    let mut chars = text.chars();
    let first = chars.next()?;
    let camel: String = first.to_lowercase().chain(chars).collect();
    is_identifier(&camel).then_some(camel)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recast_ir::SharedInterner;
    use recast_sema::SemanticModel;

    use super::*;
    use crate::EngineConfig;

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("args").as_deref(), Some("arg"));
        assert_eq!(singularize("entries").as_deref(), Some("entry"));
        assert_eq!(singularize("boxes").as_deref(), Some("box"));
        assert_eq!(singularize("customerNames").as_deref(), Some("customerName"));
        assert_eq!(singularize("class"), None);
        assert_eq!(singularize("data"), None);
        assert_eq!(singularize("status"), None);
        // `ints` would become a keyword.
        assert_eq!(singularize("ints"), None);
    }

    #[test]
    fn test_counter_ladder_skips_taken_names() {
        let tree = recast_parse::parse(
            "void M(int[] a) { int i = 0; int k = 1; for (var e = 0; e < 1; e++) { F(index); } }",
            SharedInterner::new(),
        )
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
        let model = SemanticModel::build(&tree);
        let for_loop = tree
            .descendants(tree.root())
            .into_iter()
            .find(|&n| matches!(tree.kind(n), recast_ir::NodeKind::For { .. }))
            .unwrap_or_else(|| panic!("no loop"));
        let config = EngineConfig::default();
        let mut scope = NameScope::new(&tree, &model, for_loop).avoiding(for_loop);
        let first = scope.pick(None, &config.counter);
        let second = scope.pick(None, &config.counter);
        assert_eq!(tree.text(first), "j");
        assert_eq!(tree.text(second), "counter");
    }
}
