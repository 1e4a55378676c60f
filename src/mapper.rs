//! Public entry point tying the pipelines to a transport.

use tracing::debug;

use crate::identity;
use crate::mutation::{Vertex, Writer};
use crate::options::MapperOptions;
use crate::populate::Diagnostics;
use crate::projection::Projection;
use crate::query::{self, QueryBuilder};
use crate::schema::Record;
use crate::transport::Transport;
use crate::types::Result;

/// Object-graph mapper over a store [`Transport`].
///
/// The mapper holds no per-record state and takes no locks; concurrent use
/// is as safe as the transport is.
#[derive(Debug)]
pub struct Mapper<T> {
    transport: T,
    options: MapperOptions,
}

impl<T: Transport> Mapper<T> {
    /// Mapper with default options.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, MapperOptions::default())
    }

    /// Mapper with explicit options.
    pub fn with_options(transport: T, options: MapperOptions) -> Self {
        Mapper { transport, options }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Active options.
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Consumes the mapper, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Writes `record` and every record it links to.
    ///
    /// Returns the record's vertex, or `None` when an empty relation
    /// collection abandoned the write under [`crate::EmptyRelationList::Abort`].
    /// Nested records are flushed one round trip each before their parent;
    /// an error part way leaves the already flushed ones in the store.
    pub fn add<R: Record>(&self, record: &R) -> Result<Option<Vertex>> {
        let vertex = Writer::new(&self.transport, &self.options).add(record)?;
        debug!(
            record = R::schema().type_name(),
            written = vertex.is_some(),
            "mapper.add"
        );
        Ok(vertex)
    }

    /// Reads the vertex matching `record`'s identity back into `record`.
    pub fn find_by_id<R: Record>(&self, record: &mut R) -> Result<Diagnostics> {
        let schema = R::schema();
        let identity = identity::resolve_with(&*record, self.options.random_identity)?;
        let projection = Projection::derive(schema, self.options.max_projection_depth);
        query::fetch(&self.transport, schema, &identity, &projection, record)
    }

    /// Starts a lookup that fills `record` in place.
    pub fn query<'m, R: Record>(&'m self, record: &'m mut R) -> QueryBuilder<'m, T, R> {
        QueryBuilder::new(&self.transport, &self.options, record)
    }

    /// Projection used by [`Mapper::find_by_id`] for `R`.
    pub fn projection<R: Record>(&self) -> Projection {
        Projection::derive(R::schema(), self.options.max_projection_depth)
    }
}
