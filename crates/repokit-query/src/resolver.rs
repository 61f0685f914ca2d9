//! Dotted-path resolution for sort keys.
//!
//! A path such as `"owner.name"` is checked against the entity's static
//! [`Schema`] once: every intermediate segment must name a nested record
//! and the last one a comparable scalar. The result is a [`FieldPath`]
//! that reads the value from any instance at sort time. Resolved paths
//! are memoised per (entity type, path).

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::{debug, trace};

use repokit_core::config::ResolverConfig;
use repokit_core::error::FieldResolutionError;
use repokit_core::result::AppResult;
use repokit_core::traits::entity::{Entity, Record};
use repokit_core::types::schema::{FieldKind, ScalarKind, Schema};
use repokit_core::types::sorting::SortKey;
use repokit_core::types::value::{FieldValue, SortValue};

/// A validated dotted path bound to an entity schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    path: String,
    root: &'static str,
    segments: Vec<&'static str>,
    kind: ScalarKind,
}

impl FieldPath {
    /// Walk `schema` along `path`.
    pub fn resolve(schema: &'static Schema, path: &str) -> Result<Self, FieldResolutionError> {
        let fail = |at: &'static Schema, segment: &str, reason| FieldResolutionError {
            path: path.to_string(),
            type_name: at.type_name,
            segment: segment.to_string(),
            reason,
        };

        let parts: Vec<&str> = path.split('.').collect();
        let mut current = schema;
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                return Err(fail(current, part, "empty segment"));
            }
            let field = current
                .field(part)
                .ok_or_else(|| fail(current, part, "no such field"))?;
            segments.push(field.name);

            let last = i + 1 == parts.len();
            match (field.kind, last) {
                (FieldKind::Scalar(kind), true) => {
                    return Ok(Self {
                        path: path.to_string(),
                        root: schema.type_name,
                        segments,
                        kind,
                    });
                }
                (FieldKind::Scalar(_), false) => {
                    return Err(fail(current, part, "not a nested record"));
                }
                (FieldKind::Nested(_), true) => {
                    return Err(fail(current, part, "not a comparable scalar"));
                }
                (FieldKind::Nested(next), false) => current = next(),
            }
        }

        // `split` always yields at least one part, so the loop returns.
        Err(fail(current, path, "empty segment"))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the entity type the path starts from.
    pub fn root(&self) -> &'static str {
        self.root
    }

    /// Scalar kind of the terminal field.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Read the terminal value from a record. A missing optional
    /// relation along the way yields [`SortValue::Null`].
    pub fn read(&self, record: &dyn Record) -> SortValue {
        let Some((last, parents)) = self.segments.split_last() else {
            return SortValue::Null;
        };
        let mut current = record;
        for segment in parents {
            match current.field(segment) {
                Some(FieldValue::Record(next)) => current = next,
                _ => return SortValue::Null,
            }
        }
        current
            .field(last)
            .and_then(|v| v.to_sort_value())
            .unwrap_or(SortValue::Null)
    }

    /// A sort key extractor reading this path from an entity.
    pub fn key<T: Entity>(self: Arc<Self>) -> SortKey<T> {
        Arc::new(move |entity: &T| self.read(entity))
    }
}

/// Resolves and memoises dotted paths per entity type.
///
/// The cache holds at most `max_cached_paths` entries. A recursive
/// schema admits unboundedly many valid paths (`parent.parent.name`,
/// ...), so once the ceiling is reached new paths are resolved on every
/// call instead of being kept.
#[derive(Debug)]
pub struct FieldResolver {
    cache: DashMap<(TypeId, String), Arc<FieldPath>>,
    cache_paths: bool,
    max_cached_paths: usize,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::from_config(&ResolverConfig::default())
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            cache: DashMap::new(),
            cache_paths: config.cache_paths,
            max_cached_paths: config.max_cached_paths,
        }
    }

    /// Process-wide resolver shared by repositories that are not given one.
    /// Uses the default configuration, so its cache is bounded by
    /// [`DEFAULT_MAX_CACHED_PATHS`](repokit_core::config::resolver::DEFAULT_MAX_CACHED_PATHS).
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<FieldResolver>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(FieldResolver::new())))
    }

    /// Resolve `path` on `T`, reusing an earlier resolution when cached.
    pub fn resolve<T: Entity>(&self, path: &str) -> AppResult<Arc<FieldPath>> {
        let key = (TypeId::of::<T>(), path.to_string());
        if self.cache_paths {
            if let Some(hit) = self.cache.get(&key) {
                return Ok(Arc::clone(hit.value()));
            }
        }

        let resolved = Arc::new(FieldPath::resolve(T::schema(), path)?);
        debug!(
            entity = resolved.root(),
            path,
            kind = %resolved.kind(),
            "Resolved sort path"
        );

        if self.cache_paths {
            if self.cache.len() < self.max_cached_paths {
                self.cache.insert(key, Arc::clone(&resolved));
            } else {
                trace!(path, max = self.max_cached_paths, "Path cache full");
            }
        }
        Ok(resolved)
    }

    /// Number of memoised paths.
    pub fn cached_paths(&self) -> usize {
        self.cache.len()
    }
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self::new()
    }
}
