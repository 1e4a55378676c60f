use std::fmt;

use super::access::Access;
use super::Schema;

/// Reserved external name marking the identity field.
pub const IDENTITY_NAME: &str = "uid";
/// Reserved external name excluding a field from all mapping.
pub const EXCLUDED_NAME: &str = "-";

/// Scalar kinds understood by the codec.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    /// Signed integer of any width.
    Int,
    /// Unsigned integer of any width.
    Uint,
    /// Floating point.
    Float,
    /// UTF-8 text.
    String,
    /// Boolean.
    Bool,
    /// Byte sequence.
    Bytes,
    /// Timestamp.
    DateTime,
    /// Geographic feature.
    Geo,
}

impl ScalarKind {
    /// Kinds that may appear inside a JSON-blob primitive collection.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ScalarKind::Int
                | ScalarKind::Uint
                | ScalarKind::Float
                | ScalarKind::String
                | ScalarKind::Bool
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::Bytes => "bytes",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Geo => "geo",
        };
        f.write_str(name)
    }
}

/// Whether a relation field holds its record inline or behind a reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Shape {
    /// `T`
    Value,
    /// `Option<Box<T>>` / `Box<T>` elements.
    Reference,
}

/// Classification shared by the write path, the read path and the
/// projection builder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    /// One scalar edge.
    Scalar(ScalarKind),
    /// Collection of scalars stored as one JSON string edge.
    ScalarList(ScalarKind),
    /// Nested record linked by one edge.
    Relation(Shape),
    /// Nested records linked by one edge each, same predicate repeated.
    RelationList(Shape),
}

impl FieldKind {
    /// Relations (single or collection) become nested blocks in projections
    /// and child nodes in results.
    pub fn is_relation(self) -> bool {
        matches!(self, FieldKind::Relation(_) | FieldKind::RelationList(_))
    }
}

/// Resolved mapping name of a field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldName {
    /// Mapped under this external name.
    Named(&'static str),
    /// The identity field; mapped as `uid` and used to derive the XID.
    Identity,
    /// Excluded from writes, reads and projections.
    Excluded,
}

impl FieldName {
    /// External edge name, `None` for excluded fields.
    pub fn external(self) -> Option<&'static str> {
        match self {
            FieldName::Named(name) => Some(name),
            FieldName::Identity => Some(IDENTITY_NAME),
            FieldName::Excluded => None,
        }
    }
}

/// Applies the naming precedence: graph tag, then serialization tag, then
/// the declared name.
pub fn resolve_name(
    declared: &'static str,
    graph_tag: Option<&'static str>,
    serde_tag: Option<&'static str>,
) -> FieldName {
    let name = graph_tag.or(serde_tag).unwrap_or(declared);
    match name {
        EXCLUDED_NAME => FieldName::Excluded,
        IDENTITY_NAME => FieldName::Identity,
        other => FieldName::Named(other),
    }
}

/// Descriptor of one record field.
pub struct Field {
    pub(crate) declared: &'static str,
    pub(crate) graph_tag: Option<&'static str>,
    pub(crate) serde_tag: Option<&'static str>,
    pub(crate) name: FieldName,
    pub(crate) kind: FieldKind,
    pub(crate) access: Access,
}

impl Field {
    /// Name as declared on the Rust struct.
    pub fn declared_name(&self) -> &'static str {
        self.declared
    }

    /// Graph-mapping tag, if any.
    pub fn graph_tag(&self) -> Option<&'static str> {
        self.graph_tag
    }

    /// Serialization tag, if any.
    pub fn serde_tag(&self) -> Option<&'static str> {
        self.serde_tag
    }

    /// Resolved mapping name.
    pub fn name(&self) -> FieldName {
        self.name
    }

    /// External edge name; `None` when excluded.
    pub fn external_name(&self) -> Option<&'static str> {
        self.name.external()
    }

    /// Field classification.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Schema of the related record type for relation fields.
    pub fn target(&self) -> Option<&'static Schema> {
        match &self.access {
            Access::Relation(access) => Some(access.target()),
            Access::RelationList(access) => Some(access.target()),
            Access::Scalar(_) | Access::ScalarList(_) => None,
        }
    }

    pub(crate) fn access(&self) -> &Access {
        &self.access
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("declared", &self.declared)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
