//! Arena-backed hierarchy container and statistics.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{HierarchyError, HierarchyResult};
use crate::node::{Node, NodeId};

/// Summary statistics for the subtree under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStats {
    /// Nodes structurally reachable from the root, root included.
    pub total_nodes: u64,
    /// Alias nodes among them.
    pub total_aliases: u64,
    /// Nodes without structural children (aliases included).
    pub total_leaves: u64,
    /// Deepest level reached; the root is at depth 0.
    pub max_depth: u32,
}

impl HierarchyStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a visited node.
    pub fn record(&mut self, node: &Node, depth: u32) {
        self.total_nodes += 1;
        self.max_depth = self.max_depth.max(depth);
        if node.is_alias() {
            self.total_aliases += 1;
        }
        if node.children.is_empty() {
            self.total_leaves += 1;
        }
    }
}

/// A hierarchy of nodes joined by structural and alias edges.
///
/// All nodes live in one arena and refer to each other by [`NodeId`].
/// Children lists are the owning, structural edges; alias targets are
/// plain references and may point anywhere, including at an ancestor of
/// the alias itself.
///
/// Deserialization goes through the same checks the builder methods
/// enforce: ids must match arena positions, every referenced id must
/// exist, and children edges must not form a cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "HierarchyData")]
pub struct Hierarchy {
    nodes: Vec<Node>,
}

/// Unchecked serialized form of a [`Hierarchy`].
#[derive(Deserialize)]
struct HierarchyData {
    nodes: Vec<Node>,
}

impl TryFrom<HierarchyData> for Hierarchy {
    type Error = HierarchyError;

    fn try_from(data: HierarchyData) -> HierarchyResult<Self> {
        let hierarchy = Hierarchy { nodes: data.nodes };
        for (index, node) in hierarchy.nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(HierarchyError::IdMismatch { index, id: node.id });
            }
            for &id in node.children.iter().chain(node.alias_target.iter()) {
                hierarchy.check(id)?;
            }
        }
        if let Some((parent, child)) = hierarchy.find_structural_cycle() {
            return Err(HierarchyError::StructuralCycle { parent, child });
        }
        debug!(nodes = hierarchy.len(), "validated deserialized hierarchy");
        Ok(hierarchy)
    }
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached node with no children and no alias target.
    pub fn create_node(&mut self, name: impl Into<CompactString>) -> NodeId {
        let id = self.next_id();
        let node = Node::new(id, name);
        trace!(%id, name = %node.name, "created node");
        self.nodes.push(node);
        id
    }

    /// Append `child` to the children of `parent`.
    ///
    /// Attaching a node that already has a parent is not rejected, but
    /// ancestor queries involving it are then undefined. Attachments that
    /// would close a structural cycle are rejected.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> HierarchyResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_structural_descendant(child, parent) {
            return Err(HierarchyError::StructuralCycle { parent, child });
        }
        self.nodes[parent.index()].children.push(child);
        debug!(%parent, %child, "attached child");
        Ok(())
    }

    /// Create an alias node called `name` pointing at `target` and append
    /// it to the children of `parent`.
    ///
    /// The alias is a node of its own, distinct from its target.
    pub fn add_alias(
        &mut self,
        parent: NodeId,
        name: impl Into<CompactString>,
        target: NodeId,
    ) -> HierarchyResult<NodeId> {
        self.check(parent)?;
        self.check(target)?;
        let id = self.next_id();
        let node = Node::new_alias(id, name, target);
        debug!(%parent, alias = %id, %target, name = %node.name, "attached alias");
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Check if the id was issued by this hierarchy.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get the name of a node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Get the structural children of a node, empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the alias target of a node.
    pub fn alias_target(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.alias_target)
    }

    /// Check if a node is an alias.
    pub fn is_alias(&self, id: NodeId) -> bool {
        self.alias_target(id).is_some()
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Walk the structural subtree under `root` in pre-order.
    pub fn pre_order(&self, root: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, root)
    }

    /// Find the first child of `parent` called `name`, in insertion order.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.name(child) == Some(name))
    }

    /// Resolve a slash-separated list of child names starting at `root`.
    ///
    /// Empty segments are ignored, so `""` and `"/"` both name the root.
    /// Alias targets are never followed.
    pub fn lookup(&self, root: NodeId, path: &str) -> Option<NodeId> {
        if !self.contains(root) {
            return None;
        }
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(root, |current, segment| self.find_child(current, segment))
    }

    /// Compute statistics for the structural subtree under `root`.
    pub fn stats(&self, root: NodeId) -> HierarchyStats {
        let mut stats = HierarchyStats::new();
        for (id, depth) in self.pre_order(root) {
            if let Some(node) = self.node(id) {
                stats.record(node, depth);
            }
        }
        stats
    }

    /// Check whether `target` is `from` or lies structurally below it.
    pub fn is_structural_descendant(&self, from: NodeId, target: NodeId) -> bool {
        self.pre_order(from).any(|(id, _)| id == target)
    }

    /// Find a children edge closing a cycle, if any. Expects every child
    /// id to be in range.
    fn find_structural_cycle(&self) -> Option<(NodeId, NodeId)> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Open,
            Done,
        }

        let mut marks = vec![Mark::New; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if marks[start] != Mark::New {
                continue;
            }
            marks[start] = Mark::Open;
            let mut stack = vec![(self.nodes[start].id, 0usize)];

            while let Some((id, cursor)) = stack.last_mut() {
                let children = &self.nodes[id.index()].children;
                let Some(&child) = children.get(*cursor) else {
                    marks[id.index()] = Mark::Done;
                    stack.pop();
                    continue;
                };
                *cursor += 1;
                let parent = *id;
                match marks[child.index()] {
                    Mark::Open => return Some((parent, child)),
                    Mark::New => {
                        marks[child.index()] = Mark::Open;
                        stack.push((child, 0));
                    }
                    Mark::Done => {}
                }
            }
        }
        None
    }

    pub(crate) fn set_alias_target(&mut self, alias: NodeId, target: NodeId) {
        if let Some(node) = self.nodes.get_mut(alias.index()) {
            node.alias_target = Some(target);
        }
    }

    fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u64)
    }

    fn check(&self, id: NodeId) -> HierarchyResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(HierarchyError::UnknownNode { id })
        }
    }
}

/// Pre-order walk over structural edges, yielding `(id, depth)`.
///
/// Children are visited in insertion order. Alias targets are not
/// followed.
pub struct PreOrder<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<(NodeId, u32)>,
}

impl<'a> PreOrder<'a> {
    fn new(hierarchy: &'a Hierarchy, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if hierarchy.contains(root) {
            stack.push((root, 0));
        }
        Self { hierarchy, stack }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = (NodeId, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        // Reverse push keeps left-to-right order.
        for &child in self.hierarchy.children(id).iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((id, depth))
    }
}
