//! Dotted-path resolver configuration.

use serde::{Deserialize, Serialize};

/// Default ceiling on memoised paths.
pub const DEFAULT_MAX_CACHED_PATHS: usize = 1024;

/// Settings for the dynamic field resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Memoise resolved paths per entity type.
    #[serde(default = "default_true")]
    pub cache_paths: bool,
    /// Stop memoising once this many paths are cached. Paths past the
    /// ceiling are still resolved, just not kept.
    #[serde(default = "default_max_cached_paths")]
    pub max_cached_paths: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_paths: true,
            max_cached_paths: DEFAULT_MAX_CACHED_PATHS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_cached_paths() -> usize {
    DEFAULT_MAX_CACHED_PATHS
}
