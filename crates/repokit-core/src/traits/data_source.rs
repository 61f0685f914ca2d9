//! Backing store traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::query::Query;

/// What a staged change does on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// A pending change to one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Added(T),
    Modified(T),
    Removed(T),
}

impl<T> Change<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added(_) => ChangeKind::Added,
            Self::Modified(_) => ChangeKind::Modified,
            Self::Removed(_) => ChangeKind::Removed,
        }
    }

    pub fn entity(&self) -> &T {
        match self {
            Self::Added(e) | Self::Modified(e) | Self::Removed(e) => e,
        }
    }
}

/// A queryable, stageable sequence of entities.
///
/// Each read method is one round-trip. Implementations must honour the
/// query's includes, predicates, ordering, tracking mode, cap and
/// window, and report their own failures (including timeouts and
/// cancellation) as [`ErrorKind::Store`](crate::error::ErrorKind::Store).
#[async_trait]
pub trait DataSource<T: Entity>: Send + Sync + 'static {
    /// Number of matching rows. Ordering and window are ignored; a cap
    /// bounds the result.
    async fn count(&self, query: &Query<T>) -> AppResult<u64>;

    /// Whether at least one row matches.
    async fn exists(&self, query: &Query<T>) -> AppResult<bool>;

    /// Materialize the matching rows.
    async fn fetch(&self, query: &Query<T>) -> AppResult<Vec<T>>;

    /// Record a change for the next commit. Nothing is persisted here.
    async fn stage(&self, change: Change<T>) -> AppResult<()>;
}

/// Commit boundary for staged changes.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    /// Persist every staged change. Returns how many were applied.
    async fn commit(&self) -> AppResult<usize>;

    /// Number of changes waiting for commit.
    async fn pending(&self) -> usize;
}
