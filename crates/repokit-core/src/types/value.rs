//! Runtime field values and the comparable sort key derived from them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::traits::entity::Record;

/// A borrowed view of one field of a [`Record`].
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// A related record, walked by dotted paths.
    Record(&'a dyn Record),
}

impl FieldValue<'_> {
    /// Convert a scalar into an owned sort key. Records are not comparable.
    pub fn to_sort_value(&self) -> Option<SortValue> {
        Some(match *self {
            Self::Null => SortValue::Null,
            Self::Bool(v) => SortValue::Bool(v),
            Self::Int(v) => SortValue::Int(v),
            Self::Float(v) => SortValue::Float(v),
            Self::Text(v) => SortValue::Text(v.to_string()),
            Self::Uuid(v) => SortValue::Uuid(v),
            Self::Timestamp(v) => SortValue::Timestamp(v),
            Self::Record(_) => return None,
        })
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(v)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(v: &'a String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Uuid> for FieldValue<'_> {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<'a, V> From<Option<V>> for FieldValue<'a>
where
    V: Into<FieldValue<'a>>,
{
    fn from(v: Option<V>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// An owned, totally ordered sort key.
///
/// Values of different kinds order by kind: `Null` first, then `Bool`,
/// numbers, `Text`, `Uuid`, `Timestamp`. `Int` and `Float` compare
/// numerically with each other; floats use `total_cmp`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
            Self::Uuid(_) => 4,
            Self::Timestamp(_) => 5,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}
