//! Lowest common ancestor over structural edges.
//!
//! The resolver works on the identity it is handed. An alias node and the
//! node it points to are different inputs: the alias is located by its own
//! place in the tree, never by its target's. Callers that want the target
//! dereference the alias themselves before asking.

use tracing::{debug, trace};

use aliastree_core::{Hierarchy, NodeId, ResolverConfig};

use crate::path::{NodePath, find_path};

/// Resolves structural paths and common ancestors.
#[derive(Debug, Clone, Default)]
pub struct AncestorResolver {
    config: ResolverConfig,
}

impl AncestorResolver {
    /// Create a resolver with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with a custom config.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Config used by this resolver.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Find the structural path from `root` to `target`.
    pub fn find_path(&self, hierarchy: &Hierarchy, root: NodeId, target: NodeId) -> Option<NodePath> {
        let path = find_path(hierarchy, root, target, &self.config);
        trace!(%root, %target, found = path.is_some(), "path lookup");
        path
    }

    /// Find the deepest node lying on both structural paths from `root`
    /// to `a` and to `b`.
    ///
    /// Returns `None` when either node is not structurally reachable from
    /// `root`. If one node is an ancestor of the other, that ancestor is
    /// the answer.
    pub fn find_common_ancestor(
        &self,
        hierarchy: &Hierarchy,
        root: NodeId,
        a: NodeId,
        b: NodeId,
    ) -> Option<NodeId> {
        let path_a = self.find_path(hierarchy, root, a)?;
        let path_b = self.find_path(hierarchy, root, b)?;
        let ancestor = path_a.last_common(&path_b);
        debug!(
            %root,
            %a,
            %b,
            ancestor = ?ancestor,
            "common ancestor"
        );
        ancestor
    }

    /// Check whether `ancestor` lies on the structural path from `root` to
    /// `node`. Every node is its own ancestor.
    pub fn is_ancestor(
        &self,
        hierarchy: &Hierarchy,
        root: NodeId,
        ancestor: NodeId,
        node: NodeId,
    ) -> bool {
        self.find_path(hierarchy, root, node)
            .is_some_and(|path| path.contains(&ancestor))
    }
}

/// Find the lowest common ancestor of `a` and `b` under `root` using the
/// default config.
pub fn find_common_ancestor(
    hierarchy: &Hierarchy,
    root: NodeId,
    a: NodeId,
    b: NodeId,
) -> Option<NodeId> {
    AncestorResolver::new().find_common_ancestor(hierarchy, root, a, b)
}
