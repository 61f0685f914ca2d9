//! In-memory data source backed by a `Vec`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashSet;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use repokit_core::error::AppError;
use repokit_core::result::AppResult;
use repokit_core::traits::data_source::{Change, DataSource, UnitOfWork};
use repokit_core::traits::entity::Entity;
use repokit_core::types::query::Query;
use repokit_core::types::specification::Tracking;

/// Fills a relation on a cloned row when a query includes it.
pub type RelationLoader<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Round-trip counters, by operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub counts: u64,
    pub exists: u64,
    pub fetches: u64,
    pub commits: u64,
}

impl StoreStats {
    /// Total round-trips of any kind.
    pub fn round_trips(&self) -> u64 {
        self.counts + self.exists + self.fetches + self.commits
    }
}

#[derive(Debug, Default)]
struct Counters {
    counts: AtomicU64,
    exists: AtomicU64,
    fetches: AtomicU64,
    commits: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Count,
    Exists,
    Fetch,
    Commit,
}

/// In-process store for one entity type.
pub struct MemoryStore<T: Entity> {
    rows: RwLock<Vec<T>>,
    staged: Mutex<Vec<Change<T>>>,
    /// Identities returned by tracked reads.
    tracked: DashSet<T::Id>,
    relations: HashMap<String, RelationLoader<T>>,
    counters: Counters,
    failure: Mutex<Option<String>>,
    latency: Option<Duration>,
}

impl<T: Entity> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Create a store seeded with `rows`, kept in the given order.
    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
            staged: Mutex::new(Vec::new()),
            tracked: DashSet::new(),
            relations: HashMap::new(),
            counters: Counters::default(),
            failure: Mutex::new(None),
            latency: None,
        }
    }

    /// Register the loader run for rows of a query that includes `name`.
    pub fn with_relation(
        mut self,
        name: impl Into<String>,
        loader: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Self {
        self.relations.insert(name.into(), Arc::new(loader));
        self
    }

    /// Delay every round-trip by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next round-trip fail with a store error.
    pub async fn inject_failure(&self, message: impl Into<String>) {
        *self.failure.lock().await = Some(message.into());
    }

    /// Snapshot of the round-trip counters since creation.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            counts: self.counters.counts.load(Ordering::SeqCst),
            exists: self.counters.exists.load(Ordering::SeqCst),
            fetches: self.counters.fetches.load(Ordering::SeqCst),
            commits: self.counters.commits.load(Ordering::SeqCst),
        }
    }

    /// Shorthand for `stats().round_trips()`.
    pub fn round_trips(&self) -> u64 {
        self.stats().round_trips()
    }

    /// Whether a tracked read has returned the entity with `id`.
    pub fn is_tracked(&self, id: &T::Id) -> bool {
        self.tracked.contains(id)
    }

    /// Number of distinct identities registered by tracked reads.
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// A copy of the committed rows.
    pub async fn snapshot(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    /// Changes staged since the last successful commit.
    pub async fn staged(&self) -> Vec<Change<T>> {
        self.staged.lock().await.clone()
    }

    async fn round_trip(&self, op: Op) -> AppResult<()> {
        let counter = match op {
            Op::Count => &self.counters.counts,
            Op::Exists => &self.counters.exists,
            Op::Fetch => &self.counters.fetches,
            Op::Commit => &self.counters.commits,
        };
        counter.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = self.failure.lock().await.take() {
            warn!(entity = T::schema().type_name, ?op, %message, "Store round-trip failed");
            return Err(AppError::store(message));
        }
        Ok(())
    }

    /// Matching rows with relations loaded, ordering applied, unbounded.
    async fn matching(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        let loaders = query
            .includes()
            .iter()
            .map(|include| {
                self.relations.get(include.path()).ok_or_else(|| {
                    AppError::store(format!(
                        "{} has no relation named '{include}'",
                        T::schema().type_name
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let rows = self.rows.read().await;
        let matched: Vec<T> = rows
            .iter()
            .cloned()
            .map(|mut row| {
                for load in &loaders {
                    load(&mut row);
                }
                row
            })
            .filter(|row| query.matches(row))
            .collect();
        drop(rows);

        Ok(query.sort(matched))
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataSource<T> for MemoryStore<T> {
    async fn count(&self, query: &Query<T>) -> AppResult<u64> {
        self.round_trip(Op::Count).await?;
        let matched = self.matching(query).await?.len();
        let total = match query.cap() {
            Some(limit) => matched.min(limit.count()),
            None => matched,
        };
        Ok(total as u64)
    }

    async fn exists(&self, query: &Query<T>) -> AppResult<bool> {
        self.round_trip(Op::Exists).await?;
        Ok(!self.matching(query).await?.is_empty())
    }

    async fn fetch(&self, query: &Query<T>) -> AppResult<Vec<T>> {
        self.round_trip(Op::Fetch).await?;
        let rows = query.bound(self.matching(query).await?);

        if query.tracking_mode() == Tracking::Tracked {
            for row in &rows {
                self.tracked.insert(row.id());
            }
        }
        debug!(
            entity = T::schema().type_name,
            returned = rows.len(),
            tracking = ?query.tracking_mode(),
            "Fetched rows"
        );
        Ok(rows)
    }

    async fn stage(&self, change: Change<T>) -> AppResult<()> {
        debug!(
            entity = T::schema().type_name,
            kind = ?change.kind(),
            id = ?change.entity().id(),
            "Staged change"
        );
        self.staged.lock().await.push(change);
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> UnitOfWork for MemoryStore<T> {
    /// Apply staged changes in staging order, all or nothing.
    ///
    /// On failure the committed rows are untouched and the staged
    /// changes stay pending.
    async fn commit(&self) -> AppResult<usize> {
        self.round_trip(Op::Commit).await?;

        let mut staged = self.staged.lock().await;
        if staged.is_empty() {
            return Ok(0);
        }

        let mut rows = self.rows.write().await;
        let mut working = rows.clone();
        for change in staged.iter() {
            if let Err(e) = apply(&mut working, change) {
                warn!(entity = T::schema().type_name, error = %e, "Commit rejected");
                return Err(e);
            }
        }
        *rows = working;

        let applied = staged.len();
        for change in staged.drain(..) {
            if let Change::Removed(entity) = change {
                self.tracked.remove(&entity.id());
            }
        }

        info!(
            entity = T::schema().type_name,
            applied,
            rows = rows.len(),
            "Committed changes"
        );
        Ok(applied)
    }

    async fn pending(&self) -> usize {
        self.staged.lock().await.len()
    }
}

fn apply<T: Entity>(rows: &mut Vec<T>, change: &Change<T>) -> AppResult<()> {
    let id = change.entity().id();
    let position = rows.iter().position(|row| row.id() == id);
    match (change, position) {
        (Change::Added(entity), None) => rows.push(entity.clone()),
        (Change::Modified(entity), Some(i)) => rows[i] = entity.clone(),
        (Change::Removed(_), Some(i)) => {
            rows.remove(i);
        }
        (Change::Added(_), Some(_)) => {
            return Err(AppError::store(format!(
                "{} {id:?} already exists",
                T::schema().type_name
            )));
        }
        (_, None) => {
            return Err(AppError::store(format!(
                "{} {id:?} not found",
                T::schema().type_name
            )));
        }
    }
    Ok(())
}
