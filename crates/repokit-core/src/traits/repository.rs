//! Generic repository trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::limiting::Limiting;
use crate::types::pagination::{PaginatedResult, PaginationParameters};
use crate::types::projection::Projection;
use crate::types::sorting::Sorting;
use crate::types::specification::{Predicate, Specification};

/// Specification-driven read and staging facade for one entity type.
///
/// Nothing here commits. Create, update and delete only stage changes
/// for a [`UnitOfWork`](crate::traits::UnitOfWork) owned by the caller.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync + 'static {
    /// Count every entity.
    async fn count(&self) -> AppResult<u64>;

    /// Count entities matching `spec`.
    async fn count_matching(&self, spec: &Specification<T>) -> AppResult<u64>;

    /// Whether any entity exists.
    async fn exists(&self) -> AppResult<bool>;

    /// Whether any entity matches `spec`.
    async fn exists_matching(&self, spec: &Specification<T>) -> AppResult<bool>;

    /// First match, or `None` when nothing matches.
    async fn get_one(&self, spec: &Specification<T>) -> AppResult<Option<T>>;

    /// Every match, in store order.
    async fn get_many(&self, spec: &Specification<T>) -> AppResult<Vec<T>>;

    /// Every match, sorted.
    async fn get_many_sorted(&self, spec: &Specification<T>, sorting: Sorting<T>)
    -> AppResult<Vec<T>>;

    /// At most `limit` matches, sorted before the cap is applied.
    async fn get_many_limited(
        &self,
        spec: &Specification<T>,
        sorting: Sorting<T>,
        limit: Limiting,
    ) -> AppResult<Vec<T>>;

    /// One page of projected matches.
    async fn get_paginated<R, P>(
        &self,
        spec: &Specification<T>,
        params: &PaginationParameters,
        projection: P,
        filter: Option<Predicate<T>>,
        sorting: Option<Sorting<T>>,
    ) -> AppResult<PaginatedResult<R>>
    where
        R: Send + 'static,
        P: Projection<T, R> + 'static;

    /// Stage a new entity.
    async fn create(&self, entity: T) -> AppResult<()>;

    /// Stage several new entities. An empty batch is rejected.
    async fn create_many(&self, entities: Vec<T>) -> AppResult<()>;

    /// Stage the full desired state of an existing entity as modified.
    async fn update(&self, entity: T) -> AppResult<()>;

    /// Stage several existing entities as modified. An empty batch is rejected.
    async fn update_many(&self, entities: Vec<T>) -> AppResult<()>;

    /// Stage one known entity for removal.
    async fn remove(&self, entity: T) -> AppResult<()>;

    /// Stage every entity matching `spec` for removal. Returns how many.
    async fn delete(&self, spec: &Specification<T>) -> AppResult<u64>;
}
