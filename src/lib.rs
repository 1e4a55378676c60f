//! Object-graph mapper for XID-keyed graph stores.
//!
//! Records describe themselves once through a [`Schema`]; the [`Mapper`]
//! then writes them as flat edge mutations (recursing into related records)
//! and reads query results back into them, reporting any field it had to
//! leave untouched in [`Diagnostics`].

#![warn(missing_docs)]

pub mod codec;
pub mod identity;
pub mod mapper;
pub mod mutation;
pub mod options;
pub mod populate;
pub mod projection;
pub mod query;
pub mod schema;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
pub mod transport;
pub mod types;

/// Value conversion between native scalars and the store representation.
pub use codec::{GeoPoint, Scalar, Value};
/// Identity resolution.
pub use identity::{hash_to_vertex_id, resolve_identity, Identity, IdentitySource};
/// Public mapping surface.
pub use mapper::Mapper;
/// Mutation requests.
pub use mutation::{Edge, Mutation, Object, Vertex};
/// Configuration.
pub use options::{ConfigError, EmptyRelationList, MapperOptions};
/// Read-path diagnostics.
pub use populate::{populate, Diagnostics, SkipReason, Skipped};
/// Projection trees.
pub use projection::Projection;
/// Query surface.
pub use query::{lookup_query, QueryBuilder};
/// Record descriptors.
pub use schema::{Entity, Field, FieldKind, FieldName, Record, ScalarField, ScalarKind, Schema};
/// Store collaborator interface.
pub use transport::{Property, ResultNode, Transport, TransportError};
/// Identifiers and errors.
pub use types::{GraftError, Result, Uid, Xid};
