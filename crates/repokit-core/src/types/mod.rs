//! Query value objects shared across the RepoKit workspace.

pub mod limiting;
pub mod pagination;
pub mod projection;
pub mod query;
pub mod schema;
pub mod sorting;
pub mod specification;
pub mod value;

pub use limiting::Limiting;
pub use pagination::{PaginatedResult, PaginationParameters};
pub use projection::{Identity, Projection};
pub use query::{ComposeStage, OrderClause, Query, Window};
pub use schema::{FieldDef, FieldKind, ScalarKind, Schema};
pub use sorting::{Comparator, SortDescriptor, SortKey, SortDirection, SortSelector, Sorting};
pub use specification::{Include, Predicate, Specification, Tracking};
pub use value::{FieldValue, SortValue};
