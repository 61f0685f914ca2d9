//! Query composition.
//!
//! [`QueryComposer::compose`] turns a specification plus optional
//! filter, sort and cap into one deferred [`Query`], always in this order:
//!
//! 1. eager-loads, as given, duplicates collapsed
//! 2. the specification predicate, if any
//! 3. the ad-hoc filter, if any
//! 4. the sort chain, if any
//! 5. the specification's tracking mode
//! 6. the cap, if any
//!
//! Composition is synchronous and never touches a store, so a bad sort
//! path or conflicting options fail before any round-trip.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use repokit_core::error::AppError;
use repokit_core::result::AppResult;
use repokit_core::traits::entity::Entity;
use repokit_core::types::limiting::Limiting;
use repokit_core::types::projection::Projection;
use repokit_core::types::query::{OrderClause, Query};
use repokit_core::types::sorting::{SortSelector, Sorting};
use repokit_core::types::specification::{Predicate, Specification};

use crate::resolver::FieldResolver;

/// Optional inputs layered on top of a specification.
pub struct ComposeOptions<T> {
    filter: Option<Predicate<T>>,
    sorting: Option<Sorting<T>>,
    limit: Option<Limiting>,
    paginated: bool,
}

impl<T> ComposeOptions<T> {
    /// Empty options; composing with them applies only the specification.
    pub fn new() -> Self {
        Self {
            filter: None,
            sorting: None,
            limit: None,
            paginated: false,
        }
    }

    /// An extra predicate AND-ed after the specification's.
    pub fn filter(mut self, filter: Option<Predicate<T>>) -> Self {
        self.filter = filter;
        self
    }

    /// Order by `sorting`, replacing any earlier chain. `None` keeps
    /// the source's natural order.
    pub fn sorting(mut self, sorting: Option<Sorting<T>>) -> Self {
        self.sorting = sorting;
        self
    }

    /// Cap the result. Cannot be combined with [`paginated`](Self::paginated).
    pub fn limit(mut self, limit: Limiting) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Mark the query as the input of a paginator.
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }
}

impl<T> Default for ComposeOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A composed query together with the projection applied to its rows.
pub struct ProjectedQuery<T, R, P> {
    query: Query<T>,
    projection: P,
    _shape: PhantomData<fn() -> R>,
}

impl<T, R, P> ProjectedQuery<T, R, P>
where
    P: Projection<T, R>,
{
    /// Pair a composed query with the projection for its rows.
    pub fn new(query: Query<T>, projection: P) -> Self {
        Self {
            query,
            projection,
            _shape: PhantomData,
        }
    }

    /// The underlying query, as handed to the data source.
    pub fn query(&self) -> &Query<T> {
        &self.query
    }

    /// Project every fetched row, preserving order.
    pub fn project_all(&self, rows: Vec<T>) -> Vec<R> {
        rows.into_iter()
            .map(|row| self.projection.project(row))
            .collect()
    }
}

/// Builds queries from specifications.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    resolver: Arc<FieldResolver>,
}

impl QueryComposer {
    /// A composer resolving dotted sort paths through `resolver`.
    pub fn new(resolver: Arc<FieldResolver>) -> Self {
        Self { resolver }
    }

    /// Compose one deferred query.
    pub fn compose<T: Entity>(
        &self,
        spec: &Specification<T>,
        options: ComposeOptions<T>,
    ) -> AppResult<Query<T>> {
        let entity = T::schema().type_name;

        if options.limit.is_some() && options.paginated {
            warn!(entity, "Rejected query combining a limit with pagination");
            return Err(AppError::invalid_argument(
                "a result limit cannot be combined with pagination",
            ));
        }

        let mut query = Query::new();

        if !spec.includes().is_empty() {
            query = query.include(spec.includes());
        }
        if let Some(predicate) = spec.predicate() {
            query = query.predicate(predicate.clone());
        }
        if let Some(filter) = options.filter {
            query = query.filter(filter);
        }
        if let Some(sorting) = options.sorting {
            query = query.order_by(self.order_clauses(&sorting)?);
        }
        query = query.tracking(spec.tracking());
        if let Some(limit) = options.limit {
            query = query.limit(limit);
        }

        debug!(
            entity,
            stages = ?query.stages(),
            includes = query.includes().len(),
            order = ?query.order(),
            tracking = ?query.tracking_mode(),
            "Composed query"
        );
        Ok(query)
    }

    /// Compose a query whose rows are projected after fetching.
    pub fn compose_projected<T, R, P>(
        &self,
        spec: &Specification<T>,
        options: ComposeOptions<T>,
        projection: P,
    ) -> AppResult<ProjectedQuery<T, R, P>>
    where
        T: Entity,
        P: Projection<T, R>,
    {
        let query = self.compose(spec, options)?;
        Ok(ProjectedQuery::new(query, projection))
    }

    /// Turn a sort chain into ordering clauses, resolving any dotted paths.
    pub fn order_clauses<T: Entity>(&self, sorting: &Sorting<T>) -> AppResult<Vec<OrderClause<T>>> {
        sorting
            .keys()
            .iter()
            .map(|key| -> AppResult<OrderClause<T>> {
                let label = key.selector().label();
                let direction = key.sort_direction();
                Ok(match key.selector() {
                    SortSelector::Typed { compare, .. } => {
                        OrderClause::new(label, direction, Arc::clone(compare))
                    }
                    SortSelector::Path(path) => {
                        let field = self.resolver.resolve::<T>(path)?;
                        OrderClause::keyed(label, direction, field.key())
                    }
                })
            })
            .collect()
    }
}

impl Default for QueryComposer {
    fn default() -> Self {
        Self::new(FieldResolver::shared())
    }
}
