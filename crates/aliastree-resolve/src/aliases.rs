//! Alias inspection.
//!
//! Lists the alias nodes under a root and classifies where each one
//! points: at a structural ancestor of itself (a logical cycle), at a node
//! outside the root's subtree (dangling for this root), or elsewhere.

use serde::{Deserialize, Serialize};
use tracing::debug;

use aliastree_core::{Hierarchy, NodeId};

use crate::ancestor::AncestorResolver;

/// One alias node and what it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// The alias node itself.
    pub alias: NodeId,
    /// Name of the alias node.
    pub name: String,
    /// Node the alias points to.
    pub target: NodeId,
    /// Structural depth of the alias below the root.
    pub depth: u32,
    /// Whether the target is structurally reachable from the root.
    pub target_reachable: bool,
    /// Whether the target is a structural ancestor of the alias, so that
    /// following the alias leads back over the alias again.
    pub cyclic: bool,
    /// Common ancestor of the alias node and its target.
    pub common_ancestor: Option<NodeId>,
}

/// Results from alias analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasReport {
    /// Aliases in pre-order.
    pub aliases: Vec<AliasEntry>,
    /// Aliases whose target is one of their own ancestors.
    pub cyclic_count: usize,
    /// Aliases whose target lies outside the root's subtree.
    pub dangling_count: usize,
}

impl AliasReport {
    /// Check if any aliases were found.
    pub fn has_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Aliases that form a logical cycle.
    pub fn cyclic(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.iter().filter(|e| e.cyclic)
    }

    /// Aliases whose target is not reachable from the root.
    pub fn dangling(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.iter().filter(|e| !e.target_reachable)
    }
}

/// Alias analyzer.
#[derive(Debug, Clone, Default)]
pub struct AliasAnalyzer {
    resolver: AncestorResolver,
}

impl AliasAnalyzer {
    /// Create a new analyzer with a default resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer around a configured resolver.
    pub fn with_resolver(resolver: AncestorResolver) -> Self {
        Self { resolver }
    }

    /// Analyze every alias structurally under `root`.
    ///
    /// Aliases below the resolver's depth limit are unreachable for its
    /// queries and are left out of the report.
    pub fn analyze(&self, hierarchy: &Hierarchy, root: NodeId) -> AliasReport {
        let mut report = AliasReport::default();
        let config = self.resolver.config();

        for (alias, depth) in hierarchy.pre_order(root) {
            if !config.allows_depth(depth as usize) {
                continue;
            }
            let Some(target) = hierarchy.alias_target(alias) else {
                continue;
            };

            let target_reachable = self.resolver.find_path(hierarchy, root, target).is_some();
            let cyclic = self.resolver.is_ancestor(hierarchy, root, target, alias);
            let common_ancestor = self
                .resolver
                .find_common_ancestor(hierarchy, root, alias, target);

            if cyclic {
                report.cyclic_count += 1;
            }
            if !target_reachable {
                report.dangling_count += 1;
            }

            report.aliases.push(AliasEntry {
                alias,
                name: hierarchy.name(alias).unwrap_or_default().to_string(),
                target,
                depth,
                target_reachable,
                cyclic,
                common_ancestor,
            });
        }

        debug!(
            aliases = report.aliases.len(),
            cyclic = report.cyclic_count,
            dangling = report.dangling_count,
            "alias analysis complete"
        );
        report
    }
}
