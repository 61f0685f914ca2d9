//! Specification-driven repository over any [`DataSource`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use repokit_core::error::AppError;
use repokit_core::result::AppResult;
use repokit_core::traits::data_source::{Change, DataSource};
use repokit_core::traits::entity::Entity;
use repokit_core::traits::repository::Repository;
use repokit_core::types::limiting::Limiting;
use repokit_core::types::pagination::{PaginatedResult, PaginationParameters};
use repokit_core::types::projection::Projection;
use repokit_core::types::query::Query;
use repokit_core::types::sorting::Sorting;
use repokit_core::types::specification::{Predicate, Specification};

use crate::composer::{ComposeOptions, QueryComposer};
use crate::paginator::Paginator;
use crate::resolver::FieldResolver;

/// Repository for one entity type, backed by a data source.
///
/// Every read goes through [`QueryComposer`]; every write is staged on
/// the source and left for the caller's unit of work to commit.
pub struct SpecRepository<T, D: ?Sized> {
    source: Arc<D>,
    composer: QueryComposer,
    _entity: PhantomData<fn() -> T>,
}

impl<T, D> SpecRepository<T, D>
where
    T: Entity,
    D: DataSource<T> + ?Sized,
{
    /// Create a repository using the process-wide path resolver.
    pub fn new(source: Arc<D>) -> Self {
        Self::with_resolver(source, FieldResolver::shared())
    }

    /// Create a repository with its own path resolver.
    pub fn with_resolver(source: Arc<D>, resolver: Arc<FieldResolver>) -> Self {
        Self {
            source,
            composer: QueryComposer::new(resolver),
            _entity: PhantomData,
        }
    }

    fn compose(
        &self,
        spec: &Specification<T>,
        options: ComposeOptions<T>,
    ) -> AppResult<Query<T>> {
        self.composer.compose(spec, options)
    }

    async fn stage_all(&self, entities: Vec<T>, change: fn(T) -> Change<T>) -> AppResult<()> {
        if entities.is_empty() {
            warn!(entity = T::schema().type_name, "Rejected empty batch");
            return Err(AppError::invalid_argument(
                "batch must contain at least one entity",
            ));
        }
        for entity in entities {
            self.source.stage(change(entity)).await?;
        }
        Ok(())
    }
}

impl<T, D: ?Sized> Clone for SpecRepository<T, D> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            composer: self.composer.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T, D> Repository<T> for SpecRepository<T, D>
where
    T: Entity,
    D: DataSource<T> + ?Sized,
{
    async fn count(&self) -> AppResult<u64> {
        self.count_matching(&Specification::all()).await
    }

    async fn count_matching(&self, spec: &Specification<T>) -> AppResult<u64> {
        let query = self.compose(spec, ComposeOptions::new())?;
        self.source.count(&query).await
    }

    async fn exists(&self) -> AppResult<bool> {
        self.exists_matching(&Specification::all()).await
    }

    async fn exists_matching(&self, spec: &Specification<T>) -> AppResult<bool> {
        let query = self.compose(spec, ComposeOptions::new())?;
        self.source.exists(&query).await
    }

    async fn get_one(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        let query = self.compose(spec, ComposeOptions::new().limit(Limiting::new(1)?))?;
        Ok(self.source.fetch(&query).await?.into_iter().next())
    }

    async fn get_many(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        let query = self.compose(spec, ComposeOptions::new())?;
        self.source.fetch(&query).await
    }

    async fn get_many_sorted(
        &self,
        spec: &Specification<T>,
        sorting: Sorting<T>,
    ) -> AppResult<Vec<T>> {
        let query = self.compose(spec, ComposeOptions::new().sorting(Some(sorting)))?;
        self.source.fetch(&query).await
    }

    async fn get_many_limited(
        &self,
        spec: &Specification<T>,
        sorting: Sorting<T>,
        limit: Limiting,
    ) -> AppResult<Vec<T>> {
        let options = ComposeOptions::new().sorting(Some(sorting)).limit(limit);
        let query = self.compose(spec, options)?;
        self.source.fetch(&query).await
    }

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
        P: Projection<T, R> + 'static,
    {
        let options = ComposeOptions::new()
            .filter(filter)
            .sorting(sorting)
            .paginated();
        let projected = self.composer.compose_projected(spec, options, projection)?;
        Paginator::new(self.source.as_ref())
            .fetch(&projected, params)
            .await
    }

    async fn create(&self, entity: T) -> AppResult<()> {
        debug!(entity = T::schema().type_name, id = ?entity.id(), "Staging create");
        self.source.stage(Change::Added(entity)).await
    }

    async fn create_many(&self, entities: Vec<T>) -> AppResult<()> {
        self.stage_all(entities, Change::Added).await
    }

    async fn update(&self, entity: T) -> AppResult<()> {
        debug!(entity = T::schema().type_name, id = ?entity.id(), "Staging update");
        self.source.stage(Change::Modified(entity)).await
    }

    async fn update_many(&self, entities: Vec<T>) -> AppResult<()> {
        self.stage_all(entities, Change::Modified).await
    }

    async fn remove(&self, entity: T) -> AppResult<()> {
        debug!(entity = T::schema().type_name, id = ?entity.id(), "Staging removal");
        self.source.stage(Change::Removed(entity)).await
    }

    async fn delete(&self, spec: &Specification<T>) -> AppResult<u64> {
        let query = self.compose(spec, ComposeOptions::new())?;
        let matches = self.source.fetch(&query).await?;
        let staged = matches.len() as u64;
        for entity in matches {
            self.source.stage(Change::Removed(entity)).await?;
        }
        debug!(entity = T::schema().type_name, staged, "Staged deletion");
        Ok(staged)
    }
}
