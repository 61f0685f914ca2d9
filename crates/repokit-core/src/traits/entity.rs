//! Entity metadata traits.
//!
//! The engine treats entities as opaque apart from two capabilities:
//! a stable identity (for update/delete staging) and reflectable field
//! access (for dotted-path sorting).

use std::fmt;
use std::hash::Hash;

use crate::types::schema::Schema;
use crate::types::value::FieldValue;

/// Runtime field access by name.
///
/// Implemented by entities and by any related record reachable from
/// them through [`FieldValue::Record`].
pub trait Record: fmt::Debug + Send + Sync {
    /// Return the named field, or `None` if the type has no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Static field metadata for a type.
pub trait Described {
    /// The schema used to validate dotted paths before execution.
    fn schema() -> &'static Schema;
}

/// A persistable entity.
pub trait Entity: Record + Described + Clone + Send + Sync + 'static {
    /// Stable identity used to match staged changes against stored rows.
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Return this entity's identity.
    fn id(&self) -> Self::Id;
}
