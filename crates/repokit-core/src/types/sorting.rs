//! Sort instructions.
//!
//! A sort key is either a typed accessor, compared directly, or a
//! dotted path such as `"owner.name"` that the query engine resolves
//! against the entity's schema. Both forms produce the same kind of
//! ordering clause once composed.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::SortValue;

/// A boxed comparison between two entities.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A boxed extractor producing an owned sort key for one entity.
pub type SortKey<T> = Arc<dyn Fn(&T) -> SortValue + Send + Sync>;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// How a sort key is selected.
pub enum SortSelector<T> {
    /// A compile-time accessor.
    Typed {
        label: String,
        compare: Comparator<T>,
    },
    /// A dotted field path resolved at composition time.
    Path(String),
}

impl<T> SortSelector<T> {
    /// Human-readable name for logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Typed { label, .. } => label,
            Self::Path(path) => path,
        }
    }
}

impl<T> Clone for SortSelector<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Typed { label, compare } => Self::Typed {
                label: label.clone(),
                compare: Arc::clone(compare),
            },
            Self::Path(path) => Self::Path(path.clone()),
        }
    }
}

impl<T> fmt::Debug for SortSelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed { label, .. } => f.debug_tuple("Typed").field(label).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// One sort instruction: a key and a direction.
pub struct SortDescriptor<T> {
    selector: SortSelector<T>,
    direction: SortDirection,
}

impl<T: 'static> SortDescriptor<T> {
    /// Sort ascending by a typed key.
    pub fn by<K: Ord + 'static>(key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self::by_named("typed", key)
    }

    /// Sort ascending by a typed key, with a name used in logs.
    pub fn by_named<K: Ord + 'static>(
        label: impl Into<String>,
        key: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            selector: SortSelector::Typed {
                label: label.into(),
                compare: Arc::new(move |a: &T, b: &T| key(a).cmp(&key(b))),
            },
            direction: SortDirection::Ascending,
        }
    }
}

impl<T> SortDescriptor<T> {
    /// Sort ascending by a dotted field path.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            selector: SortSelector::Path(path.into()),
            direction: SortDirection::Ascending,
        }
    }

    /// Use the given direction.
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sort largest first.
    pub fn descending(self) -> Self {
        self.direction(SortDirection::Descending)
    }

    /// Sort smallest first (the default).
    pub fn ascending(self) -> Self {
        self.direction(SortDirection::Ascending)
    }

    /// Add a secondary key that breaks ties of this one.
    pub fn then_by(self, next: SortDescriptor<T>) -> Sorting<T> {
        Sorting::from(self).then_by(next)
    }

    pub fn selector(&self) -> &SortSelector<T> {
        &self.selector
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.direction
    }
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("selector", &self.selector)
            .field("direction", &self.direction)
            .finish()
    }
}

/// A non-empty chain of sort instructions, primary key first.
pub struct Sorting<T> {
    keys: Vec<SortDescriptor<T>>,
}

impl<T> Sorting<T> {
    /// Append a key compared only when all earlier keys tie.
    pub fn then_by(mut self, next: SortDescriptor<T>) -> Self {
        self.keys.push(next);
        self
    }

    pub fn keys(&self) -> &[SortDescriptor<T>] {
        &self.keys
    }
}

impl<T> From<SortDescriptor<T>> for Sorting<T> {
    fn from(descriptor: SortDescriptor<T>) -> Self {
        Self {
            keys: vec![descriptor],
        }
    }
}

impl<T> Clone for Sorting<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<T> fmt::Debug for Sorting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.keys).finish()
    }
}
