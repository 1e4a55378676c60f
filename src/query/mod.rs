#![forbid(unsafe_code)]

//! Identity-based lookups and the fluent query builder.

use std::fmt;

use tracing::debug;

use crate::identity::{self, Identity};
use crate::options::MapperOptions;
use crate::populate::{populate, Diagnostics};
use crate::projection::Projection;
use crate::schema::{Entity, Record, Schema};
use crate::transport::Transport;
use crate::types::{GraftError, Result, Uid};

/// Lookup query for one vertex: `{ <Type>(id: <uid>) { <projection> } }`.
pub fn lookup_query(type_name: &str, uid: Uid, projection: &Projection) -> String {
    format!("{{ {type_name}(id: {uid}) {{ {projection} }} }}")
}

/// Runs a lookup and populates `record` from the first record node.
///
/// The response is expected as one top-level node whose first child is the
/// record; anything less is [`GraftError::NotFound`].
pub(crate) fn fetch<T: Transport + ?Sized>(
    transport: &T,
    schema: &Schema,
    identity: &Identity,
    projection: &Projection,
    record: &mut dyn Entity,
) -> Result<Diagnostics> {
    let text = lookup_query(schema.type_name(), identity.uid, projection);
    debug!(record = schema.type_name(), xid = %identity.xid, query = %text, "mapper.query.run");
    let nodes = transport.run_query(&text)?;
    let node = nodes
        .first()
        .and_then(|top| top.children.first())
        .ok_or_else(|| GraftError::NotFound(format!("{} {}", schema.type_name(), identity.xid)))?;
    let diagnostics = populate(node, record);
    debug!(
        record = schema.type_name(),
        skipped = diagnostics.skipped().len(),
        "mapper.query.populated"
    );
    Ok(diagnostics)
}

/// Fluent lookup returned by [`crate::Mapper::query`].
///
/// ```ignore
/// let mut dog = Dog::default();
/// mapper.query(&mut dog).id(1).fields(["name", "color"]).execute()?;
/// ```
pub struct QueryBuilder<'m, T: ?Sized, R> {
    transport: &'m T,
    options: &'m MapperOptions,
    record: &'m mut R,
    id: Option<String>,
    projection: Option<Projection>,
    error: Option<GraftError>,
}

impl<'m, T: Transport + ?Sized, R: Record> QueryBuilder<'m, T, R> {
    pub(crate) fn new(transport: &'m T, options: &'m MapperOptions, record: &'m mut R) -> Self {
        QueryBuilder {
            transport,
            options,
            record,
            id: None,
            projection: None,
            error: None,
        }
    }

    /// Looks the vertex up as `"<value>_<lowercased type>"` instead of the
    /// record's own identity.
    pub fn id(mut self, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        if value.is_empty() && self.error.is_none() {
            self.error = Some(GraftError::invalid("query id must not be empty"));
        }
        self.id = Some(value);
        self
    }

    /// Requests only these properties instead of the derived projection.
    /// An empty list keeps the derived projection.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        if names.is_empty() {
            self.projection = None;
            return self;
        }
        match Projection::from_fields(&names) {
            Ok(projection) => self.projection = Some(projection),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    /// Runs the lookup and populates the record in place.
    pub fn execute(self) -> Result<Diagnostics> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let schema = R::schema();
        let identity = match &self.id {
            Some(value) => Identity::for_value(value, schema),
            None => identity::resolve_with(&*self.record, self.options.random_identity)?,
        };
        let projection = self
            .projection
            .unwrap_or_else(|| Projection::derive(schema, self.options.max_projection_depth));
        fetch(self.transport, schema, &identity, &projection, self.record)
    }
}
