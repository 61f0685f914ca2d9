//! # repokit-query
//!
//! Turns [`Specification`](repokit_core::types::Specification)s into
//! deferred queries and runs them against a
//! [`DataSource`](repokit_core::traits::DataSource):
//!
//! - [`resolver`]: dotted sort paths validated against entity schemas
//! - [`composer`]: fixed-order query composition
//! - [`paginator`]: concurrent count plus windowed fetch
//! - [`repository`]: the [`Repository`](repokit_core::traits::Repository) facade

pub mod composer;
pub mod paginator;
pub mod repository;
pub mod resolver;

pub use composer::{ComposeOptions, ProjectedQuery, QueryComposer};
pub use paginator::Paginator;
pub use repository::SpecRepository;
pub use resolver::{FieldPath, FieldResolver};
