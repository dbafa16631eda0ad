//! Core types for aliastree.
//!
//! This crate provides the hierarchy model shared by the resolver and the
//! CLI: nodes, the arena that owns them, alias edges, JSON manifests and
//! resolver configuration.

mod config;
mod error;
mod hierarchy;
mod manifest;
mod node;

pub use config::{ResolverConfig, ResolverConfigBuilder, TraversalStrategy};
pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::{Hierarchy, HierarchyStats, PreOrder};
pub use manifest::NodeManifest;
pub use node::{Node, NodeId, NodeKind};
