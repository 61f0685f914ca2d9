//! Convenience result type alias for RepoKit.

use crate::error::AppError;

/// A specialized `Result` type for RepoKit operations.
///
/// Every crate in the workspace returns this so callers match on a
/// single error type.
pub type AppResult<T> = Result<T, AppError>;
