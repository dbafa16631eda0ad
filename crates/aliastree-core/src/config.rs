//! Resolver configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the path finder walks the structural tree.
///
/// Both strategies visit children in insertion order and return the same
/// paths; the iterative one does not grow the call stack with depth.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    /// Explicit stack.
    #[default]
    Iterative,
    /// Plain recursion.
    Recursive,
}

/// Configuration for ancestor queries.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ResolverConfig {
    /// Traversal used by the path finder.
    #[builder(default)]
    #[serde(default)]
    pub strategy: TraversalStrategy,

    /// Maximum depth searched below the root (None = unlimited).
    ///
    /// Nodes deeper than this are treated as unreachable.
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl ResolverConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.max_depth {
            return Err("max_depth must be at least 1 when set".to_string());
        }
        Ok(())
    }
}

impl ResolverConfig {
    /// Create a new resolver config builder.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Create the default config: iterative, unlimited depth.
    pub fn new() -> Self {
        Self {
            strategy: TraversalStrategy::Iterative,
            max_depth: None,
        }
    }

    /// Check whether a node at `depth` (root = 0) may be visited.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max as usize)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
