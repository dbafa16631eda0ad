//! Structural path finding and common ancestor queries for aliastree.
//!
//! This crate answers ancestry questions over an alias-aware
//! [`Hierarchy`]:
//!
//! - **Paths** - root-to-node sequences over children edges only
//! - **Common ancestors** - the deepest node shared by two such paths
//! - **Alias analysis** - where each alias points relative to itself
//!
//! Alias targets are never followed while resolving. Passing an alias node
//! asks about the alias's own position; passing its target asks about the
//! target's position, and the two answers can differ.
//!
//! ```rust,ignore
//! use aliastree_core::Hierarchy;
//! use aliastree_resolve::find_common_ancestor;
//!
//! let mut h = Hierarchy::new();
//! let root = h.create_node("root");
//! let docs = h.create_node("docs");
//! let src = h.create_node("src");
//! h.add_child(root, docs)?;
//! h.add_child(root, src)?;
//! let link = h.add_alias(docs, "src-link", src)?;
//!
//! assert_eq!(find_common_ancestor(&h, root, link, docs), Some(docs));
//! assert_eq!(find_common_ancestor(&h, root, src, docs), Some(root));
//! ```

pub mod aliases;
mod ancestor;
mod path;

pub use aliases::{AliasAnalyzer, AliasEntry, AliasReport};
pub use ancestor::{AncestorResolver, find_common_ancestor};
pub use path::{NodePath, find_path};

// Re-export core types
pub use aliastree_core::{Hierarchy, NodeId, ResolverConfig, TraversalStrategy};
