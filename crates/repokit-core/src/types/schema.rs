//! Static field metadata for entity types.
//!
//! A [`Schema`] lists the named fields of a type. Scalar fields are
//! comparable and usable as sort keys; nested fields point at the schema
//! of the related type so dotted paths can be checked without an
//! instance at hand.

use std::fmt;

/// Logical type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Text,
    Uuid,
    Timestamp,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::Text => write!(f, "Text"),
            Self::Uuid => write!(f, "Uuid"),
            Self::Timestamp => write!(f, "Timestamp"),
        }
    }
}

/// What a field holds.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A comparable leaf value.
    Scalar(ScalarKind),
    /// A related record described by another schema.
    Nested(fn() -> &'static Schema),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            Self::Nested(schema) => f.debug_tuple("Nested").field(&schema().type_name).finish(),
        }
    }
}

/// One named field of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    /// A scalar field.
    pub const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(kind),
        }
    }

    /// A field holding a related record.
    pub const fn nested(name: &'static str, schema: fn() -> &'static Schema) -> Self {
        Self {
            name,
            kind: FieldKind::Nested(schema),
        }
    }
}

/// Field metadata for one type.
#[derive(Debug)]
pub struct Schema {
    /// Name reported in resolution errors.
    pub type_name: &'static str,
    pub fields: &'static [FieldDef],
}

impl Schema {
    pub const fn new(type_name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { type_name, fields }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
