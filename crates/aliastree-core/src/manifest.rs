//! JSON manifests describing a hierarchy.
//!
//! A manifest is a nested tree of named entries. Entries carrying an
//! `alias` field become alias nodes; the value is a slash-separated path
//! of names relative to the manifest root. Aliases are resolved after the
//! whole tree exists, so forward references and aliases to aliases work.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HierarchyError, HierarchyResult};
use crate::hierarchy::Hierarchy;
use crate::node::NodeId;

/// One entry of a hierarchy manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeManifest {
    /// Display name of the node.
    pub name: String,

    /// Path of the alias target, relative to the manifest root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Structural children in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeManifest>,
}

impl NodeManifest {
    /// Create a plain entry.
    pub fn node(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            children: Vec::new(),
        }
    }

    /// Create an alias entry.
    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            alias: Some(target.into()),
            ..Self::node(name)
        }
    }

    /// Add a child entry.
    pub fn with_child(mut self, child: NodeManifest) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a manifest from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> HierarchyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HierarchyError::io(path, e))?;
        let manifest =
            Self::from_json(&content).map_err(|e| HierarchyError::manifest(path, e))?;
        debug!(path = %path.display(), "loaded manifest");
        Ok(manifest)
    }

    /// Serialize the manifest as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Alias waiting for its target to be resolved.
struct PendingAlias {
    id: NodeId,
    name: String,
    target: String,
}

impl Hierarchy {
    /// Build a hierarchy from a manifest, returning it with its root.
    pub fn from_manifest(manifest: &NodeManifest) -> HierarchyResult<(Self, NodeId)> {
        let mut hierarchy = Hierarchy::new();
        let mut pending = Vec::new();
        let root = hierarchy.create_node(manifest.name.as_str());
        if let Some(target) = &manifest.alias {
            pending.push(PendingAlias {
                id: root,
                name: manifest.name.clone(),
                target: target.clone(),
            });
        }

        let mut stack: Vec<(NodeId, &NodeManifest)> = vec![(root, manifest)];
        while let Some((parent, entry)) = stack.pop() {
            let mut created = Vec::with_capacity(entry.children.len());
            for child in &entry.children {
                let id = hierarchy.create_node(child.name.as_str());
                hierarchy.add_child(parent, id)?;
                if let Some(target) = &child.alias {
                    pending.push(PendingAlias {
                        id,
                        name: child.name.clone(),
                        target: target.clone(),
                    });
                }
                created.push((id, child));
            }
            stack.extend(created.into_iter().rev());
        }

        for alias in pending {
            let target = hierarchy
                .lookup(root, &alias.target)
                .ok_or_else(|| HierarchyError::unresolved_alias(&alias.name, &alias.target))?;
            hierarchy.set_alias_target(alias.id, target);
        }

        debug!(nodes = hierarchy.len(), "built hierarchy from manifest");
        Ok((hierarchy, root))
    }

    /// Describe the structural subtree under `root` as a manifest.
    ///
    /// Alias targets are written as paths from `root`. Targets outside the
    /// subtree cannot be expressed and are dropped, turning the alias into
    /// a plain entry.
    pub fn to_manifest(&self, root: NodeId) -> Option<NodeManifest> {
        self.node(root)?;
        let paths = self.relative_paths(root);
        Some(self.manifest_entry(root, &paths))
    }

    fn manifest_entry(&self, id: NodeId, paths: &HashMap<NodeId, String>) -> NodeManifest {
        let mut entry = NodeManifest::node(self.name(id).unwrap_or_default());
        if let Some(target) = self.alias_target(id) {
            match paths.get(&target) {
                Some(path) => entry.alias = Some(path.clone()),
                None => warn!(alias = %id, %target, "alias target outside exported subtree"),
            }
        }
        entry.children = self
            .children(id)
            .iter()
            .map(|&child| self.manifest_entry(child, paths))
            .collect();
        entry
    }

    /// Map every node under `root` to its slash path. The first occurrence
    /// of a name wins, matching [`Hierarchy::lookup`]; later namesakes and
    /// their subtrees get no path.
    fn relative_paths(&self, root: NodeId) -> HashMap<NodeId, String> {
        let mut paths = HashMap::new();
        paths.insert(root, String::new());
        for (id, _) in self.pre_order(root) {
            let Some(prefix) = paths.get(&id).cloned() else {
                continue;
            };
            for &child in self.children(id) {
                let name = self.name(child).unwrap_or_default();
                let path = if prefix.is_empty() {
                    name.to_string()
                } else {
                    format!("{prefix}/{name}")
                };
                if self.find_child(id, name) == Some(child) {
                    paths.entry(child).or_insert(path);
                }
            }
        }
        paths
    }
}
