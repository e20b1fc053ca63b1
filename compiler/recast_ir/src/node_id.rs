//! Node ids and list ranges for the flat syntax tree.

use std::fmt;

/// Index into a [`crate::SyntaxTree`]'s node store.
///
/// Ids are stable across tree versions: a rewrite never renumbers existing
/// nodes, it only appends new ones and re-points parents. An id therefore
/// names the same source construct in the base tree and in every tree
/// derived from it, which is what lets a symbol oracle built for the base
/// tree keep answering during a rewrite.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for an absent optional child.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// `Some(self)` unless this is the sentinel.
    #[inline]
    pub const fn valid(self) -> Option<NodeId> {
        if self.is_valid() {
            Some(self)
        } else {
            None
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Contiguous run of child ids in the tree's list store.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        NodeRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn indices(&self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len()
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRange({}..{})", self.start, self.start.saturating_add(self.len))
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{NodeId, NodeRange};
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(NodeRange, 8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_sentinel() {
        assert!(!NodeId::INVALID.is_valid());
        assert_eq!(NodeId::INVALID.valid(), None);
        assert_eq!(NodeId::new(3).valid(), Some(NodeId::new(3)));
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn test_node_range_indices() {
        let range = NodeRange::new(4, 3);
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert!(NodeRange::EMPTY.is_empty());
    }
}
