//! Result-shape transforms applied before windowing.

use std::marker::PhantomData;

/// Maps a stored entity into the shape handed back to the caller.
///
/// Any `Fn(T) -> R` closure is a projection, so a summary view is
/// usually written inline at the call site.
pub trait Projection<T, R>: Send + Sync {
    fn project(&self, entity: T) -> R;
}

impl<T, R, F> Projection<T, R> for F
where
    F: Fn(T) -> R + Send + Sync,
{
    fn project(&self, entity: T) -> R {
        self(entity)
    }
}

/// Returns entities unchanged.
pub struct Identity<T>(PhantomData<fn(T) -> T>);

impl<T> Identity<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Projection<T, T> for Identity<T> {
    fn project(&self, entity: T) -> T {
        entity
    }
}
