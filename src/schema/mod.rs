#![forbid(unsafe_code)]

//! Registration-time record descriptors.
//!
//! Every mapped type implements [`Record`] and hands out one [`Schema`],
//! built once with a [`SchemaBuilder`] and cached for the life of the
//! process. The write pipeline, the read pipeline and the projection builder
//! all walk the same descriptor, so the shape they agree on has exactly one
//! definition.
//!
//! ```ignore
//! impl Record for Dog {
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::builder::<Dog>("Dog")
//!                 .scalar("Id", |d| &d.id, |d| &mut d.id)
//!                 .graph_tag("uid")
//!                 .scalar("Name", |d| &d.name, |d| &mut d.name)
//!                 .serde_tag("name")
//!                 .build()
//!         })
//!     }
//! }
//! ```

mod access;
mod field;
mod scalar;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::codec::Scalar;

pub(crate) use access::Access;
use access::{
    RelationBinding, RelationListBinding, RelationRefBinding, RelationRefListBinding,
    ScalarBinding, ScalarListBinding,
};
/// Field descriptors and the name resolution rules.
pub use field::{
    resolve_name, Field, FieldKind, FieldName, ScalarKind, Shape, EXCLUDED_NAME, IDENTITY_NAME,
};
/// Conversion between field types and codec scalars.
pub use scalar::ScalarField;

/// A user type the mapper can write and read.
pub trait Record: Any + Default {
    /// Cached descriptor of this type.
    fn schema() -> &'static Schema;

    /// Custom identity. When it returns a value, that value (formatted
    /// canonically) is used verbatim as the XID and takes precedence over any
    /// `uid` field.
    fn identity(&self) -> Option<Scalar> {
        None
    }
}

/// Object-safe view of a [`Record`], used by the recursive visitors.
pub trait Entity: Any {
    /// Descriptor of the concrete type.
    fn descriptor(&self) -> &'static Schema;
    /// Forwards to [`Record::identity`].
    fn custom_identity(&self) -> Option<Scalar>;
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<R: Record> Entity for R {
    fn descriptor(&self) -> &'static Schema {
        R::schema()
    }

    fn custom_identity(&self) -> Option<Scalar> {
        Record::identity(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Ordered field table of one record type.
pub struct Schema {
    type_name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    /// Starts describing `R`, registered under `type_name`.
    pub fn builder<R: Record>(type_name: &'static str) -> SchemaBuilder<R> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Type name used in lookup queries and identity suffixes.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Lowercased type name, the suffix of field-derived XIDs.
    pub fn identity_suffix(&self) -> String {
        self.type_name.to_lowercase()
    }

    /// Fields in declaration order, excluded ones included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields that take part in mapping.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|field| field.name() != FieldName::Excluded)
    }

    /// First field, in declaration order, resolved to the identity name.
    pub fn identity_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name() == FieldName::Identity)
    }

    /// Looks a mapped field up by external name.
    pub fn field(&self, external: &str) -> Option<&Field> {
        self.mapped_fields()
            .find(|field| field.external_name() == Some(external))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Registers the fields of `R` in declaration order.
///
/// Each registration takes a getter pair; `graph_tag` and `serde_tag` then
/// annotate the field registered last.
pub struct SchemaBuilder<R> {
    type_name: &'static str,
    fields: Vec<Field>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SchemaBuilder<R> {
    fn push(mut self, declared: &'static str, kind: FieldKind, access: Access) -> Self {
        self.fields.push(Field {
            declared,
            graph_tag: None,
            serde_tag: None,
            name: FieldName::Named(declared),
            kind,
            access,
        });
        self
    }

    /// Single scalar, or `Option` of one.
    pub fn scalar<T: ScalarField>(
        self,
        declared: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(
            declared,
            FieldKind::Scalar(T::KIND),
            Access::Scalar(Box::new(ScalarBinding { get, get_mut })),
        )
    }

    /// Collection of scalars, stored as one JSON array edge.
    pub fn scalars<T: ScalarField>(
        self,
        declared: &'static str,
        get: fn(&R) -> &Vec<T>,
        get_mut: fn(&mut R) -> &mut Vec<T>,
    ) -> Self {
        self.push(
            declared,
            FieldKind::ScalarList(T::KIND),
            Access::ScalarList(Box::new(ScalarListBinding { get, get_mut })),
        )
    }

    /// Nested record held by value.
    pub fn relation<T: Record>(
        self,
        declared: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(
            declared,
            FieldKind::Relation(Shape::Value),
            Access::Relation(Box::new(RelationBinding { get, get_mut })),
        )
    }

    /// Optional boxed nested record.
    pub fn relation_ref<T: Record>(
        self,
        declared: &'static str,
        get: fn(&R) -> &Option<Box<T>>,
        get_mut: fn(&mut R) -> &mut Option<Box<T>>,
    ) -> Self {
        self.push(
            declared,
            FieldKind::Relation(Shape::Reference),
            Access::Relation(Box::new(RelationRefBinding { get, get_mut })),
        )
    }

    /// Collection of nested records held by value.
    pub fn relations<T: Record>(
        self,
        declared: &'static str,
        get: fn(&R) -> &Vec<T>,
        get_mut: fn(&mut R) -> &mut Vec<T>,
    ) -> Self {
        self.push(
            declared,
            FieldKind::RelationList(Shape::Value),
            Access::RelationList(Box::new(RelationListBinding { get, get_mut })),
        )
    }

    /// Collection of boxed nested records.
    pub fn relation_refs<T: Record>(
        self,
        declared: &'static str,
        get: fn(&R) -> &Vec<Box<T>>,
        get_mut: fn(&mut R) -> &mut Vec<Box<T>>,
    ) -> Self {
        self.push(
            declared,
            FieldKind::RelationList(Shape::Reference),
            Access::RelationList(Box::new(RelationRefListBinding { get, get_mut })),
        )
    }

    /// Graph-mapping name of the last registered field.
    pub fn graph_tag(mut self, name: &'static str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.graph_tag = Some(name);
        }
        self
    }

    /// Serialization name of the last registered field.
    pub fn serde_tag(mut self, name: &'static str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.serde_tag = Some(name);
        }
        self
    }

    /// Resolves every field's external name and freezes the table.
    pub fn build(mut self) -> Schema {
        for field in &mut self.fields {
            field.name = resolve_name(field.declared, field.graph_tag, field.serde_tag);
        }
        Schema {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}
