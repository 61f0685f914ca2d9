//! Count-plus-window pagination over a composed query.
//!
//! The total and the page are two reads of the same [`Query`]: the
//! count reads it as composed, the page reads a windowed copy that
//! differs only in skip/take. The two reads are issued concurrently.
//! A store without a shared snapshot can observe writes between them,
//! so under concurrent writes `total_items` and `items` may disagree by
//! the rows written in between.

use std::marker::PhantomData;

use tracing::debug;

use repokit_core::error::AppError;
use repokit_core::result::AppResult;
use repokit_core::traits::data_source::DataSource;
use repokit_core::traits::entity::Entity;
use repokit_core::types::pagination::{PaginatedResult, PaginationParameters};
use repokit_core::types::projection::Projection;
use repokit_core::types::query::Window;

use crate::composer::ProjectedQuery;

/// Windowed reader bound to one data source.
pub struct Paginator<'a, T, D: ?Sized> {
    source: &'a D,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T, D> Paginator<'a, T, D>
where
    T: Entity,
    D: DataSource<T> + ?Sized,
{
    pub fn new(source: &'a D) -> Self {
        Self {
            source,
            _entity: PhantomData,
        }
    }

    /// Fetch one page of `projected`.
    ///
    /// The query must not carry a result cap; a capped query is a
    /// caller error and is rejected before any read.
    pub async fn fetch<R, P>(
        &self,
        projected: &ProjectedQuery<T, R, P>,
        params: &PaginationParameters,
    ) -> AppResult<PaginatedResult<R>>
    where
        P: Projection<T, R>,
    {
        let query = projected.query();
        if query.cap().is_some() {
            return Err(AppError::invalid_argument(
                "a paginated query cannot carry a result limit",
            ));
        }

        let window = Window {
            skip: params.skip(),
            take: params.page_size(),
        };
        let windowed = query.windowed(window);

        let (total_items, rows) =
            tokio::try_join!(self.source.count(query), self.source.fetch(&windowed))?;

        debug!(
            entity = T::schema().type_name,
            page_index = params.page_index(),
            page_size = params.page_size(),
            skip = window.skip,
            total_items,
            returned = rows.len(),
            "Fetched page"
        );

        Ok(PaginatedResult::new(
            projected.project_all(rows),
            params,
            total_items,
        ))
    }
}
