use tracing::{debug, warn};

use super::{Mutation, Vertex, XID_EDGE};
use crate::codec::{self, Scalar, Value};
use crate::identity;
use crate::options::{EmptyRelationList, MapperOptions};
use crate::schema::{Access, Entity, Field, FieldKind};
use crate::transport::Transport;
use crate::types::{GraftError, Result};

/// Recursive write visitor.
///
/// Each record gets its own [`Mutation`], flushed after every nested record
/// it links to has been flushed. There is no enclosing transaction: a failure
/// deep in the graph leaves already flushed children in the store.
pub(crate) struct Writer<'a, T: ?Sized> {
    transport: &'a T,
    options: &'a MapperOptions,
}

enum Outcome {
    Continue,
    /// An empty relation collection abandoned the record.
    Abort,
}

impl<'a, T: Transport + ?Sized> Writer<'a, T> {
    pub(crate) fn new(transport: &'a T, options: &'a MapperOptions) -> Self {
        Writer { transport, options }
    }

    /// Writes `record` and everything it links to. `None` means the record
    /// was abandoned without creating a vertex.
    pub(crate) fn add(&self, record: &dyn Entity) -> Result<Option<Vertex>> {
        let schema = record.descriptor();
        let identity = identity::resolve_with(record, self.options.random_identity)?;
        let vertex = Vertex::new(identity.uid);

        let mut mutation = Mutation::new();
        mutation.set(vertex.edge(XID_EDGE, Value::Str(identity.xid.as_str().to_owned())));

        for field in schema.mapped_fields() {
            if let Outcome::Abort = self.write_field(record, field, vertex, &mut mutation)? {
                warn!(
                    record = schema.type_name(),
                    xid = %identity.xid,
                    field = field.declared_name(),
                    "mapper.add.empty_relation_list"
                );
                return Ok(None);
            }
        }

        self.transport.run_mutation(&mutation)?;
        debug!(
            record = schema.type_name(),
            xid = %identity.xid,
            uid = %identity.uid,
            edges = mutation.len(),
            "mapper.add.flush"
        );
        Ok(Some(vertex))
    }

    fn write_field(
        &self,
        record: &dyn Entity,
        field: &Field,
        vertex: Vertex,
        mutation: &mut Mutation,
    ) -> Result<Outcome> {
        let Some(name) = field.external_name() else {
            return Ok(Outcome::Continue);
        };
        match (field.access(), field.kind()) {
            (Access::Scalar(access), _) => {
                let Some(scalar) = access.read(record) else {
                    return Ok(Outcome::Continue);
                };
                if scalar.is_zero() {
                    return Ok(Outcome::Continue);
                }
                set_scalar(mutation, vertex, name, &scalar)?;
            }
            (Access::ScalarList(access), FieldKind::ScalarList(kind)) => {
                // an empty collection is a zero value whatever its element kind
                if access.len(record) == 0 {
                    return Ok(Outcome::Continue);
                }
                if !kind.is_primitive() {
                    return Err(GraftError::unsupported(format!(
                        "{kind} collection in field {}",
                        field.declared_name()
                    )));
                }
                let items = access.to_json(record)?;
                let text = codec::encode_list(items)?;
                set_scalar(mutation, vertex, name, &Scalar::String(text))?;
            }
            (Access::Relation(access), _) => {
                let Some(child) = access.get(record) else {
                    return Ok(Outcome::Continue);
                };
                match self.add(child)? {
                    Some(target) => mutation.set(vertex.connect_to(name, target)),
                    None => debug!(field = name, "mapper.add.skip_edge"),
                }
            }
            (Access::RelationList(access), _) => {
                let children = access.items(record);
                if children.is_empty() {
                    return Ok(match self.options.empty_relation_list {
                        EmptyRelationList::Abort => Outcome::Abort,
                        EmptyRelationList::Skip => Outcome::Continue,
                    });
                }
                for child in children {
                    match self.add(child)? {
                        Some(target) => mutation.set(vertex.connect_to(name, target)),
                        None => debug!(field = name, "mapper.add.skip_edge"),
                    }
                }
            }
            (Access::ScalarList(_), kind) => {
                return Err(GraftError::unsupported(format!(
                    "field {} classified as {kind:?}",
                    field.declared_name()
                )));
            }
        }
        Ok(Outcome::Continue)
    }
}

fn set_scalar(mutation: &mut Mutation, vertex: Vertex, name: &str, scalar: &Scalar) -> Result<()> {
    match codec::to_store(scalar) {
        Ok(value) => {
            mutation.set(vertex.edge(name, value));
            Ok(())
        }
        Err(GraftError::EmptyValue) => {
            debug!(field = name, "mapper.add.empty_value");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
