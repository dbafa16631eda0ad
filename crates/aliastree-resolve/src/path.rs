//! Structural root-to-node paths.
//!
//! Paths follow children edges only. An alias is a stop on a path when it
//! is itself the target, but its alias target is never entered.

use std::ops::Deref;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use aliastree_core::{Hierarchy, NodeId, ResolverConfig, TraversalStrategy};

/// Ordered sequence of nodes from a root to a target, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(Vec<NodeId>);

impl NodePath {
    /// Wrap a root-first sequence of ids.
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }

    /// Number of edges between root and target.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Last node shared with `other` before the two paths diverge.
    ///
    /// Returns `None` when the first nodes already differ.
    pub fn last_common(&self, other: &NodePath) -> Option<NodeId> {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .last()
            .map(|(&a, _)| a)
    }

    /// Check whether `other` starts with this path.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Render the path with node names, joined by `/`.
    pub fn display(&self, hierarchy: &Hierarchy) -> String {
        self.0
            .iter()
            .map(|&id| hierarchy.name(id).unwrap_or("?"))
            .join("/")
    }

    /// Consume the path, returning the ids.
    pub fn into_inner(self) -> Vec<NodeId> {
        self.0
    }
}

impl Deref for NodePath {
    type Target = [NodeId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Find the structural path from `root` to `target`.
///
/// Children are searched depth-first in insertion order and the first
/// match wins. Returns `None` if `target` is not `root` itself or one of
/// its structural descendants within the configured depth.
pub fn find_path(
    hierarchy: &Hierarchy,
    root: NodeId,
    target: NodeId,
    config: &ResolverConfig,
) -> Option<NodePath> {
    if !hierarchy.contains(root) || !hierarchy.contains(target) {
        return None;
    }
    match config.strategy {
        TraversalStrategy::Iterative => find_path_iterative(hierarchy, root, target, config),
        TraversalStrategy::Recursive => {
            let mut path = Vec::new();
            find_path_recursive(hierarchy, root, target, config, &mut path).then(|| NodePath(path))
        }
    }
}

/// Depth-first search with an explicit stack of child cursors.
///
/// `path` always holds the nodes from the root to the node currently being
/// expanded, so the result needs no parent bookkeeping.
fn find_path_iterative(
    hierarchy: &Hierarchy,
    root: NodeId,
    target: NodeId,
    config: &ResolverConfig,
) -> Option<NodePath> {
    if root == target {
        return Some(NodePath(vec![root]));
    }

    let mut path = vec![root];
    let mut cursors = vec![0usize];

    while let Some(cursor) = cursors.last_mut() {
        let current = *path.last()?;
        let children = hierarchy.children(current);

        if *cursor >= children.len() || !config.allows_depth(path.len()) {
            path.pop();
            cursors.pop();
            continue;
        }

        let child = children[*cursor];
        *cursor += 1;
        path.push(child);
        if child == target {
            return Some(NodePath(path));
        }
        cursors.push(0);
    }

    None
}

fn find_path_recursive(
    hierarchy: &Hierarchy,
    node: NodeId,
    target: NodeId,
    config: &ResolverConfig,
    path: &mut Vec<NodeId>,
) -> bool {
    if !config.allows_depth(path.len()) {
        return false;
    }
    path.push(node);
    if node == target {
        return true;
    }
    for &child in hierarchy.children(node) {
        if find_path_recursive(hierarchy, child, target, config, path) {
            return true;
        }
    }
    path.pop();
    false
}
