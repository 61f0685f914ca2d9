//! # repokit-core
//!
//! Core crate for RepoKit. Contains the query value objects
//! (specification, sorting, limiting, pagination, projection), entity
//! metadata, the collaborator traits a backing store implements,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other RepoKit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, FieldResolutionError};
pub use result::AppResult;
