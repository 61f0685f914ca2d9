//! Page window requests and windowed results.

use serde::{Deserialize, Serialize};

use crate::config::pagination::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, PaginationConfig};

/// Number of pages needed for `total_items` at `page_size` per page.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    total_items.div_ceil(page_size.max(1))
}

/// Raw page request with optional fields, as received from a caller.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct RawPagination {
    page_index: Option<i64>,
    page_size: Option<i64>,
}

/// Request parameters for a paginated query.
///
/// Both values are at least 1. Out-of-range inputs are clamped rather
/// than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct PaginationParameters {
    /// Page number (1-based).
    page_index: u64,
    /// Number of items per page.
    page_size: u64,
}

impl PaginationParameters {
    /// Create a page request, clamping both values to at least 1.
    pub fn new(page_index: i64, page_size: i64) -> Self {
        Self {
            page_index: clamp_positive(page_index),
            page_size: clamp_positive(page_size),
        }
    }

    /// Create a page request, filling absent values from configuration
    /// and applying its optional size ceiling.
    pub fn from_config(
        config: &PaginationConfig,
        page_index: Option<i64>,
        page_size: Option<i64>,
    ) -> Self {
        let page_index = page_index.map_or(config.default_page_index.max(1), clamp_positive);
        let mut page_size = page_size.map_or(config.default_page_size.max(1), clamp_positive);
        if let Some(max) = config.max_page_size {
            page_size = page_size.min(max.max(1));
        }
        Self {
            page_index,
            page_size,
        }
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip before the window starts: `(page_index - 1) * page_size`,
    /// saturating. Never negative, since both values are clamped to 1.
    pub fn skip(&self) -> u64 {
        self.page_index.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PaginationParameters {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<RawPagination> for PaginationParameters {
    fn from(raw: RawPagination) -> Self {
        let defaults = Self::default();
        Self {
            page_index: raw.page_index.map_or(defaults.page_index, clamp_positive),
            page_size: raw.page_size.map_or(defaults.page_size, clamp_positive),
        }
    }
}

fn clamp_positive(value: i64) -> u64 {
    u64::try_from(value.max(1)).unwrap_or(1)
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page_index: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of matching items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T> PaginatedResult<T> {
    /// Package a fetched window with its totals.
    pub fn new(items: Vec<T>, params: &PaginationParameters, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, params.page_size);
        Self {
            items,
            page_index: params.page_index,
            page_size: params.page_size,
            total_items,
            total_pages,
            has_next: params.page_index < total_pages,
            has_previous: params.page_index > 1,
        }
    }

    /// Paginate an already-materialized sequence with the same window math.
    pub fn from_items(items: impl IntoIterator<Item = T>, params: &PaginationParameters) -> Self {
        let all: Vec<T> = items.into_iter().collect();
        let total_items = all.len() as u64;
        let skip = usize::try_from(params.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(params.page_size).unwrap_or(usize::MAX);
        let window = all.into_iter().skip(skip).take(take).collect();
        Self::new(window, params, total_items)
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<R>(self, f: impl FnMut(T) -> R) -> PaginatedResult<R> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
