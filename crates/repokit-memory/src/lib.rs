//! # repokit-memory
//!
//! In-process [`DataSource`](repokit_core::traits::DataSource) and
//! [`UnitOfWork`](repokit_core::traits::UnitOfWork) for RepoKit.
//!
//! Rows live in a `Vec` behind an async lock and queries are evaluated
//! by walking it. Useful for tests, demos and small fixed data sets.

pub mod store;

pub use store::{MemoryStore, StoreStats};
