//! Hard cap on result size.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// A positive maximum number of records to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Limiting {
    count: NonZeroUsize,
}

impl Limiting {
    /// Create a cap of `count` records. Zero is rejected.
    pub fn new(count: usize) -> AppResult<Self> {
        NonZeroUsize::new(count)
            .map(|count| Self { count })
            .ok_or_else(|| AppError::invalid_argument("limit must be greater than zero"))
    }

    /// The maximum number of records.
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl TryFrom<usize> for Limiting {
    type Error = AppError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<Limiting> for usize {
    fn from(limit: Limiting) -> Self {
        limit.count()
    }
}
