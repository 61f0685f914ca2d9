//! Unified error types for RepoKit.
//!
//! The composition stage raises [`ErrorKind::InvalidArgument`] and
//! [`ErrorKind::FieldResolution`] before any store call is issued.
//! Failures reported by a data source are wrapped as
//! [`ErrorKind::Store`] and passed through without reinterpretation.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A required input was missing or violated its contract.
    InvalidArgument,
    /// A dotted sort path did not resolve on the entity type.
    FieldResolution,
    /// The backing data source failed during a round-trip.
    Store,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::FieldResolution => write!(f, "FIELD_RESOLUTION"),
            Self::Store => write!(f, "STORE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// Details of a dotted path that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve '{path}': {reason} (segment '{segment}' on type {type_name})")]
pub struct FieldResolutionError {
    /// The full dotted path that was requested.
    pub path: String,
    /// The type at which resolution stopped.
    pub type_name: &'static str,
    /// The segment that failed.
    pub segment: String,
    /// Why the segment was rejected.
    pub reason: &'static str,
}

/// The unified error used throughout RepoKit.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Return the resolution details if this is a field-resolution error.
    pub fn resolution_details(&self) -> Option<&FieldResolutionError> {
        self.source
            .as_deref()
            .and_then(|s| s.downcast_ref::<FieldResolutionError>())
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        // Resolution details are plain data and survive the clone.
        let source = self
            .resolution_details()
            .cloned()
            .map(|d| Box::new(d) as Box<dyn std::error::Error + Send + Sync>);
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source,
        }
    }
}

impl From<FieldResolutionError> for AppError {
    fn from(err: FieldResolutionError) -> Self {
        Self::with_source(ErrorKind::FieldResolution, err.to_string(), err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
