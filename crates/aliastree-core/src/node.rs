//! Node types for alias-aware hierarchies.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node within a hierarchy.
///
/// Identity is decided by this id, never by name: two nodes called
/// `file1` are different nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Position of the node in its hierarchy's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a node, derived from its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Node with at least one structural child.
    Branch,
    /// Node with no children and no alias target.
    Leaf,
    /// Alias node pointing at another node.
    Alias {
        /// Node the alias refers to.
        target: NodeId,
    },
}

impl NodeKind {
    /// Check if this is an alias.
    pub fn is_alias(&self) -> bool {
        matches!(self, NodeKind::Alias { .. })
    }

    /// Check if this node has children.
    pub fn is_branch(&self) -> bool {
        matches!(self, NodeKind::Branch)
    }

    /// Check if this is a plain leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Leaf)
    }
}

/// A single node in a hierarchy.
///
/// Children are owned structurally through the hierarchy's arena. The
/// alias target is a plain id and carries no ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,

    /// Display label, not necessarily unique.
    pub name: CompactString,

    /// Structural children in insertion order.
    pub children: Vec<NodeId>,

    /// Target of an alias node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<NodeId>,
}

impl Node {
    /// Create a plain node.
    pub fn new(id: NodeId, name: impl Into<CompactString>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
            alias_target: None,
        }
    }

    /// Create an alias node pointing at `target`.
    pub fn new_alias(id: NodeId, name: impl Into<CompactString>, target: NodeId) -> Self {
        Self {
            alias_target: Some(target),
            ..Self::new(id, name)
        }
    }

    /// Check if this node is an alias.
    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Classify the node. An alias stays an alias even if children were
    /// attached to it.
    pub fn kind(&self) -> NodeKind {
        match self.alias_target {
            Some(target) => NodeKind::Alias { target },
            None if self.children.is_empty() => NodeKind::Leaf,
            None => NodeKind::Branch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.0, 42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "#42");
    }

    #[test]
    fn test_plain_node_creation() {
        let node = Node::new(NodeId::new(1), "file1");
        assert!(!node.is_alias());
        assert_eq!(node.kind(), NodeKind::Leaf);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_alias_node_creation() {
        let node = Node::new_alias(NodeId::new(2), "aliasToFolder2", NodeId::new(7));
        assert!(node.is_alias());
        assert_eq!(node.alias_target, Some(NodeId::new(7)));
        assert!(node.kind().is_alias());
    }

    #[test]
    fn test_alias_with_children_is_still_alias() {
        let mut node = Node::new_alias(NodeId::new(2), "odd", NodeId::new(0));
        node.children.push(NodeId::new(3));
        assert_eq!(node.kind(), NodeKind::Alias { target: NodeId::new(0) });
    }
}
