//! The composed, not-yet-executed query handed to a data source.
//!
//! A [`Query`] is pure data. Building one never touches a store; a
//! [`DataSource`](crate::traits::DataSource) reads it to decide what to
//! load, filter, order and return.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::limiting::Limiting;
use super::sorting::{Comparator, SortDirection, SortKey};
use super::specification::{Include, Predicate, Tracking};
use super::value::SortValue;

/// How an [`OrderClause`] orders two entities.
enum ClauseOrdering<T> {
    Compare(Comparator<T>),
    Key(SortKey<T>),
}

impl<T> Clone for ClauseOrdering<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Compare(compare) => Self::Compare(Arc::clone(compare)),
            Self::Key(key) => Self::Key(Arc::clone(key)),
        }
    }
}

/// A resolved ordering key with its direction.
///
/// A clause either compares two entities directly or extracts a
/// [`SortValue`] from each. Keyed clauses are read once per row when a
/// [`Query`] sorts, not once per comparison.
pub struct OrderClause<T> {
    label: String,
    direction: SortDirection,
    ordering: ClauseOrdering<T>,
}

impl<T> OrderClause<T> {
    /// A clause ordering by a direct comparison.
    pub fn new(label: impl Into<String>, direction: SortDirection, compare: Comparator<T>) -> Self {
        Self {
            label: label.into(),
            direction,
            ordering: ClauseOrdering::Compare(compare),
        }
    }

    /// A clause ordering by an extracted key.
    pub fn keyed(label: impl Into<String>, direction: SortDirection, key: SortKey<T>) -> Self {
        Self {
            label: label.into(),
            direction,
            ordering: ClauseOrdering::Key(key),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two entities under this clause, direction applied.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = match &self.ordering {
            ClauseOrdering::Compare(compare) => compare(a, b),
            ClauseOrdering::Key(key) => key(a).cmp(&key(b)),
        };
        self.direction.apply(ordering)
    }

    /// The extracted key for `entity`, or `None` for comparison clauses.
    fn key_of(&self, entity: &T) -> Option<SortValue> {
        match &self.ordering {
            ClauseOrdering::Compare(_) => None,
            ClauseOrdering::Key(key) => Some(key(entity)),
        }
    }

    /// Compare using precomputed keys when both are present.
    fn compare_decorated(
        &self,
        (key_a, a): (&Option<SortValue>, &T),
        (key_b, b): (&Option<SortValue>, &T),
    ) -> Ordering {
        match (key_a, key_b) {
            (Some(x), Some(y)) => self.direction.apply(x.cmp(y)),
            _ => self.compare(a, b),
        }
    }
}

impl<T> Clone for OrderClause<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            direction: self.direction,
            ordering: self.ordering.clone(),
        }
    }
}

impl<T> fmt::Debug for OrderClause<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.direction)
    }
}

/// A contiguous sub-range of an ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub skip: u64,
    pub take: u64,
}

/// A composition step, recorded in the order it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposeStage {
    Include,
    Predicate,
    Filter,
    Sort,
    Tracking,
    Limit,
}

/// A deferred query over entities of type `T`.
pub struct Query<T> {
    includes: Vec<Include>,
    predicates: Vec<Predicate<T>>,
    order: Vec<OrderClause<T>>,
    tracking: Tracking,
    limit: Option<Limiting>,
    window: Option<Window>,
    stages: Vec<ComposeStage>,
}

impl<T> Query<T> {
    /// An unfiltered, unordered, tracked query.
    pub fn new() -> Self {
        Self {
            includes: Vec::new(),
            predicates: Vec::new(),
            order: Vec::new(),
            tracking: Tracking::Tracked,
            limit: None,
            window: None,
            stages: Vec::new(),
        }
    }

    /// Add eager-loads in order. A path already present is skipped.
    pub fn include<'a>(mut self, includes: impl IntoIterator<Item = &'a Include>) -> Self {
        for include in includes {
            if !self.includes.contains(include) {
                self.includes.push(include.clone());
            }
        }
        self.record(ComposeStage::Include)
    }

    /// Add the specification predicate.
    pub fn predicate(mut self, predicate: Predicate<T>) -> Self {
        self.predicates.push(predicate);
        self.record(ComposeStage::Predicate)
    }

    /// Add an ad-hoc filter, AND-ed after any predicate.
    pub fn filter(mut self, filter: Predicate<T>) -> Self {
        self.predicates.push(filter);
        self.record(ComposeStage::Filter)
    }

    /// Replace the ordering with the given clauses, primary first.
    pub fn order_by(mut self, clauses: Vec<OrderClause<T>>) -> Self {
        self.order = clauses;
        self.record(ComposeStage::Sort)
    }

    pub fn tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self.record(ComposeStage::Tracking)
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: Limiting) -> Self {
        self.limit = Some(limit);
        self.record(ComposeStage::Limit)
    }

    /// A copy of this query restricted to `window`. Filters, order and
    /// tracking are shared unchanged.
    pub fn windowed(&self, window: Window) -> Self {
        let mut query = self.clone();
        query.window = Some(window);
        query
    }

    fn record(mut self, stage: ComposeStage) -> Self {
        if self.stages.last() != Some(&stage) {
            self.stages.push(stage);
        }
        self
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn predicates(&self) -> &[Predicate<T>] {
        &self.predicates
    }

    pub fn order(&self) -> &[OrderClause<T>] {
        &self.order
    }

    pub fn tracking_mode(&self) -> Tracking {
        self.tracking
    }

    pub fn cap(&self) -> Option<Limiting> {
        self.limit
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Composition steps in the order they were applied.
    pub fn stages(&self) -> &[ComposeStage] {
        &self.stages
    }

    /// Whether an entity satisfies every predicate and filter.
    pub fn matches(&self, entity: &T) -> bool {
        self.predicates.iter().all(|p| p.test(entity))
    }

    /// Compare two entities under the ordering, primary key first.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.order
            .iter()
            .map(|clause| clause.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort. Full ties keep their relative order.
    ///
    /// Keyed clauses are evaluated once per item up front; comparison
    /// clauses run on demand.
    pub fn sort(&self, items: Vec<T>) -> Vec<T> {
        if self.order.is_empty() {
            return items;
        }
        let mut decorated: Vec<(Vec<Option<SortValue>>, T)> = items
            .into_iter()
            .map(|item| {
                let keys = self.order.iter().map(|c| c.key_of(&item)).collect();
                (keys, item)
            })
            .collect();
        decorated.sort_by(|(keys_a, a), (keys_b, b)| {
            self.order
                .iter()
                .zip(keys_a.iter().zip(keys_b))
                .map(|(clause, (key_a, key_b))| clause.compare_decorated((key_a, a), (key_b, b)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        decorated.into_iter().map(|(_, item)| item).collect()
    }

    /// Apply the window, then the cap, to an already ordered sequence.
    pub fn bound(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let (skip, mut take) = match self.window {
            Some(w) => (to_usize(w.skip), to_usize(w.take)),
            None => (0, usize::MAX),
        };
        if let Some(limit) = self.limit {
            take = take.min(limit.count());
        }
        items.into_iter().skip(skip).take(take).collect()
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            includes: self.includes.clone(),
            predicates: self.predicates.clone(),
            order: self.order.clone(),
            tracking: self.tracking,
            limit: self.limit,
            window: self.window,
            stages: self.stages.clone(),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("includes", &self.includes)
            .field("predicates", &self.predicates.len())
            .field("order", &self.order)
            .field("tracking", &self.tracking)
            .field("limit", &self.limit)
            .field("window", &self.window)
            .finish()
    }
}
