//! Reusable query shapes.
//!
//! A [`Specification`] bundles an optional predicate, an ordered list of
//! relations to eager-load, and a tracking mode. It is built once with
//! the fluent methods below and never changed afterwards; every builder
//! method consumes `self` and returns a new value.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A pure boolean test over an entity.
pub struct Predicate<T>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Predicate<T> {
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate against one entity.
    pub fn test(&self, entity: &T) -> bool {
        (self.0)(entity)
    }
}

impl<T: 'static> Predicate<T> {
    /// Both predicates must hold. `self` is evaluated first.
    pub fn and(self, other: Predicate<T>) -> Self {
        Self::new(move |e| self.test(e) && other.test(e))
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A relation to materialize alongside its parent, named by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Include(Cow<'static, str>);

impl Include {
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Include {
    fn from(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }
}

impl From<String> for Include {
    fn from(path: String) -> Self {
        Self(Cow::Owned(path))
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether read results take part in the store's change detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tracking {
    /// Results are registered for later in-place update.
    #[default]
    Tracked,
    /// Results are read-only snapshots.
    Untracked,
}

/// Which entities to select, which relations to load, and how to track them.
pub struct Specification<T> {
    predicate: Option<Predicate<T>>,
    includes: Vec<Include>,
    tracking: Tracking,
}

impl<T: 'static> Specification<T> {
    /// Match every entity, tracked, with no eager-loads.
    pub fn all() -> Self {
        Self {
            predicate: None,
            includes: Vec::new(),
            tracking: Tracking::Tracked,
        }
    }

    /// Match entities satisfying `f`.
    pub fn matching(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self::all().filter(f)
    }

    /// Add a condition. Conditions accumulate with AND.
    pub fn filter(self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.with_predicate(Predicate::new(f))
    }

    /// Add a prepared predicate. Predicates accumulate with AND.
    pub fn with_predicate(mut self, predicate: Predicate<T>) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Eager-load a relation. Order is kept.
    pub fn include(mut self, include: impl Into<Include>) -> Self {
        self.includes.push(include.into());
        self
    }

    /// Return read-only snapshots.
    pub fn untracked(mut self) -> Self {
        self.tracking = Tracking::Untracked;
        self
    }

    /// Register results for change detection (the default).
    pub fn tracked(mut self) -> Self {
        self.tracking = Tracking::Tracked;
        self
    }

    /// Combine two specifications: predicates AND-ed, includes
    /// concatenated, and untracked if either side is untracked.
    pub fn and(self, other: Specification<T>) -> Self {
        let mut combined = match other.predicate {
            Some(p) => self.with_predicate(p),
            None => self,
        };
        combined.includes.extend(other.includes);
        if other.tracking == Tracking::Untracked {
            combined.tracking = Tracking::Untracked;
        }
        combined
    }
}

impl<T> Specification<T> {
    /// The predicate, or `None` for "select all".
    pub fn predicate(&self) -> Option<&Predicate<T>> {
        self.predicate.as_ref()
    }

    /// Relations to eager-load, in the order given.
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking == Tracking::Tracked
    }
}

impl<T: 'static> Default for Specification<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            includes: self.includes.clone(),
            tracking: self.tracking,
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("predicate", &self.predicate.is_some())
            .field("includes", &self.includes)
            .field("tracking", &self.tracking)
            .finish()
    }
}
