//! Core traits defined in `repokit-core` and implemented by other crates.

pub mod data_source;
pub mod entity;
pub mod repository;

pub use data_source::{Change, ChangeKind, DataSource, UnitOfWork};
pub use entity::{Described, Entity, Record};
pub use repository::Repository;
