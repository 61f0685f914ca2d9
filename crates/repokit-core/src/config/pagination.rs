//! Pagination defaults.

use serde::{Deserialize, Serialize};

/// Default page index when a request omits it.
pub const DEFAULT_PAGE_INDEX: u64 = 1;
/// Default page size when a request omits it.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page index used when the caller does not supply one.
    #[serde(default = "default_page_index")]
    pub default_page_index: u64,
    /// Page size used when the caller does not supply one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Optional upper bound; larger requested sizes are clamped down.
    #[serde(default)]
    pub max_page_size: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_index: DEFAULT_PAGE_INDEX,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
        }
    }
}

fn default_page_index() -> u64 {
    DEFAULT_PAGE_INDEX
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
