//! Error types for building and loading hierarchies.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeId;

/// Errors that can occur while building or loading a hierarchy.
///
/// Ancestor queries never produce these; an unreachable node is reported
/// as an absent result instead.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// Id was not issued by this hierarchy.
    #[error("Unknown node: {id}")]
    UnknownNode { id: NodeId },

    /// Attaching the child would make the structural graph cyclic.
    #[error("Attaching {child} under {parent} would create a structural cycle")]
    StructuralCycle { parent: NodeId, child: NodeId },

    /// Serialized node sits at a position that does not match its id.
    #[error("Node id {id} does not match its position {index}")]
    IdMismatch { index: usize, id: NodeId },

    /// Alias path in a manifest does not name any node.
    #[error("Alias '{alias}' points to unknown path '{target}'")]
    UnresolvedAlias { alias: String, target: String },

    /// Manifest could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON or has the wrong shape.
    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HierarchyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a manifest parse error with path context.
    pub fn manifest(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Manifest {
            path: path.into(),
            source,
        }
    }

    /// Create an unresolved alias error.
    pub fn unresolved_alias(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnresolvedAlias {
            alias: alias.into(),
            target: target.into(),
        }
    }
}

/// Result alias for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
