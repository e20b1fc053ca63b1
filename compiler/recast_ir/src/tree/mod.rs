//! Persistent syntax tree.
//!
//! Nodes, parent links and child lists live in `im` persistent vectors, so
//! cloning a tree is O(1) and every mutation of a clone leaves the original
//! untouched. A rewrite clones the base tree, builds the replacement in the
//! clone and swaps it in with [`SyntaxTree::replace`]; the base tree and its
//! ids are never disturbed.
//!
//! # Ids across versions
//!
//! Ids are never reused or renumbered. A node that a rewrite does not touch
//! keeps its id in the new version, so side tables keyed by `NodeId` (symbol
//! bindings, types) computed for the base tree stay meaningful for it.
//!
//! Within one version a node id is placed at most once. Moving a subtree is
//! fine; placing the same syntax twice goes through [`SyntaxTree::duplicate`].

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::{Name, Node, NodeId, NodeKind, NodeRange, SharedInterner, Slot, Span};

/// Child id list returned by the navigation helpers.
pub type NodeList = SmallVec<[NodeId; 8]>;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

fn fresh_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone)]
pub struct SyntaxTree {
    nodes: im::Vector<Node>,
    parents: im::Vector<NodeId>,
    lists: im::Vector<NodeId>,
    root: NodeId,
    version: u64,
    interner: SharedInterner,
}

impl SyntaxTree {
    /// Empty tree with no root.
    pub fn new(interner: SharedInterner) -> Self {
        SyntaxTree {
            nodes: im::Vector::new(),
            parents: im::Vector::new(),
            lists: im::Vector::new(),
            root: NodeId::INVALID,
            version: fresh_version(),
            interner,
        }
    }

    // Construction

    /// Append a node and make it the parent of its children.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let index = u32::try_from(self.nodes.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .unwrap_or_else(|| panic!("syntax tree exceeded {} nodes", u32::MAX - 1));
        let id = NodeId::new(index);
        self.nodes.push_back(Node { kind, span });
        self.parents.push_back(NodeId::INVALID);
        self.adopt_children(id, kind);
        self.touch();
        id
    }

    /// Append a child list.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = NodeId>) -> NodeRange {
        let start = self.lists.len();
        self.lists.extend(ids);
        let len = self.lists.len() - start;
        let (Ok(start), Ok(len)) = (u32::try_from(start), u32::try_from(len)) else {
            panic!("syntax tree list store exceeded {} entries", u32::MAX);
        };
        NodeRange::new(start, len)
    }

    /// Replace the kind of `id` in place, keeping its span.
    ///
    /// Children of the new kind are re-parented to `id`; former children that
    /// are no longer referenced become detached.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.kind = kind;
            self.adopt_children(id, kind);
            self.touch();
        }
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
        if let Some(parent) = self.parents.get_mut(root.index()) {
            *parent = NodeId::INVALID;
        }
        self.touch();
    }

    /// Put `replacement` where `target` currently is.
    ///
    /// Returns `false` if `target` is not attached to this tree. When the
    /// replacement wraps `target` (and so has already adopted it), look the
    /// parent up first and use [`SyntaxTree::replace_child`].
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> bool {
        if target == self.root {
            self.set_root(replacement);
            return true;
        }
        match self.parent(target) {
            Some(parent) => self.replace_child(parent, target, replacement),
            None => false,
        }
    }

    /// Put `replacement` where `target` sits among the children of `parent`.
    ///
    /// Only `parent` is rewritten; the persistent stores share everything else
    /// with earlier versions.
    pub fn replace_child(&mut self, parent: NodeId, target: NodeId, replacement: NodeId) -> bool {
        self.rewrite_child(parent, target, &[replacement], false)
    }

    /// Replace the list element `target` of `parent` with `replacements`
    /// (possibly none).
    pub fn splice_child(&mut self, parent: NodeId, target: NodeId, replacements: &[NodeId]) -> bool {
        self.rewrite_child(parent, target, replacements, true)
    }

    fn rewrite_child(
        &mut self,
        parent: NodeId,
        target: NodeId,
        replacements: &[NodeId],
        lists_only: bool,
    ) -> bool {
        let kind = self.kind(parent);
        let mut slots = kind.slots();
        let mut found = false;
        for slot in &mut slots {
            match slot {
                Slot::One(child) if *child == target && !lists_only => {
                    if let [single] = replacements {
                        *child = *single;
                        found = true;
                    }
                }
                Slot::Many(range) => {
                    let items = self.list(*range);
                    if items.contains(&target) {
                        let mut rewritten = NodeList::new();
                        for c in items {
                            if c == target {
                                rewritten.extend_from_slice(replacements);
                            } else {
                                rewritten.push(c);
                            }
                        }
                        *range = self.alloc_list(rewritten);
                        found = true;
                    }
                }
                Slot::One(_) => {}
            }
        }
        if !found {
            return false;
        }
        self.set_kind(parent, kind.with_slots(&slots));
        if !replacements.contains(&target) && self.parent(target) == Some(parent) {
            if let Some(link) = self.parents.get_mut(target.index()) {
                *link = NodeId::INVALID;
            }
        }
        true
    }

    /// Deep copy of the subtree at `id`. The copy shares no nodes with the
    /// original and is not attached anywhere.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        crate::ensure_sufficient_stack(|| {
            let Node { kind, span } = self.node(id);
            let mut slots = kind.slots();
            for slot in &mut slots {
                match slot {
                    Slot::One(child) => {
                        if child.is_valid() {
                            *child = self.duplicate(*child);
                        }
                    }
                    Slot::Many(range) => {
                        let items = self.list(*range);
                        let copies: NodeList = items.iter().map(|&c| self.duplicate(c)).collect();
                        *range = self.alloc_list(copies);
                    }
                }
            }
            self.alloc(kind.with_slots(&slots), span)
        })
    }

    fn adopt_children(&mut self, parent: NodeId, kind: NodeKind) {
        for child in self.children_of_kind(kind) {
            if let Some(slot) = self.parents.get_mut(child.index()) {
                *slot = parent;
            }
        }
    }

    fn touch(&mut self) {
        self.version = fresh_version();
    }

    // Navigation

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `id`. Invalid ids read as a dummy `Null`.
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes.get(id.index()).copied().unwrap_or(Node {
            kind: NodeKind::Null,
            span: Span::DUMMY,
        })
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().and_then(NodeId::valid)
    }

    /// Parent chain of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    pub fn list(&self, range: NodeRange) -> NodeList {
        range
            .indices()
            .filter_map(|i| self.lists.get(i).copied())
            .collect()
    }

    /// Present children of `id` in source order.
    pub fn children(&self, id: NodeId) -> NodeList {
        self.children_of_kind(self.kind(id))
    }

    fn children_of_kind(&self, kind: NodeKind) -> NodeList {
        let mut out = NodeList::new();
        for slot in kind.slots() {
            match slot {
                Slot::One(child) => out.extend(child.valid()),
                Slot::Many(range) => out.extend(self.list(range)),
            }
        }
        out
    }

    /// `id` and everything below it, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !id.is_valid() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Deepest attached node whose source span covers `span`.
    pub fn covering_node(&self, span: Span) -> Option<NodeId> {
        let mut current = self.root.valid()?;
        if !self.span(current).contains_span(span) {
            return None;
        }
        'descend: loop {
            for child in self.children(current) {
                let child_span = self.span(child);
                if !child_span.is_dummy() && child_span.contains_span(span) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    // Names

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // Versions

    /// `true` if `other` is this exact version (a clone with no mutation
    /// since).
    pub fn same_version(&self, other: &SyntaxTree) -> bool {
        self.version == other.version
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
