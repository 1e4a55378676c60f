//! Read pipeline: fills a record from a query result tree.
//!
//! Mirrors the write pipeline field by field over the same schema. Shape
//! problems never fail the read; every field left untouched is reported in
//! [`Diagnostics`] instead.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::codec::{self, Scalar};
use crate::schema::{Access, Entity, Field, FieldKind, ScalarKind};
use crate::transport::ResultNode;

/// Why a field was left at its previous value.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The result carries nothing under the field's name.
    Missing,
    /// The stored value has a different kind than the field.
    TypeMismatch {
        /// Kind the field accepts.
        expected: ScalarKind,
        /// Kind found in the result.
        found: ScalarKind,
    },
    /// The stored value could not be decoded.
    Undecodable(String),
    /// The stored JSON collection could not be decoded into the field's
    /// element type.
    UndecodableList,
    /// A relation field found a property instead of child nodes.
    ExpectedNode,
    /// A scalar field found child nodes instead of a property.
    ExpectedProperty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => f.write_str("missing"),
            SkipReason::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            SkipReason::Undecodable(err) => write!(f, "undecodable value: {err}"),
            SkipReason::UndecodableList => f.write_str("undecodable collection"),
            SkipReason::ExpectedNode => f.write_str("expected child node"),
            SkipReason::ExpectedProperty => f.write_str("expected property"),
        }
    }
}

/// One skipped field.
#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    /// Dotted path of external names from the populated root,
    /// e.g. `likes_place.name`.
    pub path: String,
    /// Cause.
    pub reason: SkipReason,
}

/// Fields a populate call left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    skipped: Vec<Skipped>,
}

impl Diagnostics {
    /// Whether every mapped field was filled.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Skipped fields in visit order.
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    /// Reason recorded for `path`, if it was skipped.
    pub fn reason(&self, path: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|skip| skip.path == path)
            .map(|skip| &skip.reason)
    }

    /// Skips other than [`SkipReason::Missing`].
    pub fn mismatches(&self) -> impl Iterator<Item = &Skipped> {
        self.skipped
            .iter()
            .filter(|skip| skip.reason != SkipReason::Missing)
    }

    fn skip(&mut self, path: String, reason: SkipReason) {
        debug!(path = %path, reason = %reason, "populate.skip");
        self.skipped.push(Skipped { path, reason });
    }
}

enum Slot<'n> {
    Property(crate::types::Result<Scalar>),
    Nodes(Vec<&'n ResultNode>),
}

/// Flattens a node into name → property or child nodes. Repeated child
/// names collect into one list; a child sharing a property's name is
/// ignored.
fn node_map(node: &ResultNode) -> HashMap<&str, Slot<'_>> {
    let mut map = HashMap::with_capacity(node.properties.len() + node.children.len());
    for property in &node.properties {
        map.insert(
            property.prop.as_str(),
            Slot::Property(codec::from_store(&property.value)),
        );
    }
    for child in &node.children {
        match map
            .entry(child.attribute.as_str())
            .or_insert_with(|| Slot::Nodes(Vec::new()))
        {
            Slot::Nodes(nodes) => nodes.push(child),
            Slot::Property(_) => {}
        }
    }
    map
}

/// Populates `record` from `node`.
pub fn populate(node: &ResultNode, record: &mut dyn Entity) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();
    populate_into(node, record, "", &mut diagnostics);
    diagnostics
}

fn populate_into(
    node: &ResultNode,
    record: &mut dyn Entity,
    prefix: &str,
    diagnostics: &mut Diagnostics,
) {
    let schema = record.descriptor();
    let slots = node_map(node);
    for field in schema.mapped_fields() {
        let Some(name) = field.external_name() else {
            continue;
        };
        let path = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}.{name}")
        };
        match slots.get(name) {
            None => diagnostics.skip(path, SkipReason::Missing),
            Some(slot) => {
                if let Err(reason) = fill_field(field, slot, record, &path, diagnostics) {
                    diagnostics.skip(path, reason);
                }
            }
        }
    }
}

fn fill_field(
    field: &Field,
    slot: &Slot<'_>,
    record: &mut dyn Entity,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Result<(), SkipReason> {
    match (field.access(), slot) {
        (Access::Scalar(access), Slot::Property(Ok(scalar))) => {
            let found = scalar.kind();
            if access.write(record, scalar.clone()) {
                Ok(())
            } else {
                Err(SkipReason::TypeMismatch {
                    expected: scalar_kind(field.kind()),
                    found,
                })
            }
        }
        (Access::ScalarList(access), Slot::Property(Ok(scalar))) => {
            let Scalar::String(text) = scalar else {
                return Err(SkipReason::TypeMismatch {
                    expected: ScalarKind::String,
                    found: scalar.kind(),
                });
            };
            let items = codec::decode_list(text).map_err(|_| SkipReason::UndecodableList)?;
            if access.from_json(record, &items) {
                Ok(())
            } else {
                Err(SkipReason::UndecodableList)
            }
        }
        (Access::Scalar(_) | Access::ScalarList(_), Slot::Property(Err(err))) => {
            Err(SkipReason::Undecodable(err.to_string()))
        }
        (Access::Scalar(_) | Access::ScalarList(_), Slot::Nodes(_)) => {
            Err(SkipReason::ExpectedProperty)
        }
        (Access::Relation(access), Slot::Nodes(nodes)) => {
            let Some(first) = nodes.first() else {
                return Err(SkipReason::Missing);
            };
            if nodes.len() > 1 {
                debug!(path, nodes = nodes.len(), "populate.relation_takes_first");
            }
            access.attach(record, &mut |child: &mut dyn Entity| {
                populate_into(first, child, path, diagnostics)
            });
            Ok(())
        }
        (Access::RelationList(access), Slot::Nodes(nodes)) => {
            for node in nodes {
                access.append(record, &mut |child: &mut dyn Entity| {
                    populate_into(node, child, path, diagnostics)
                });
            }
            Ok(())
        }
        (Access::Relation(_) | Access::RelationList(_), Slot::Property(_)) => {
            Err(SkipReason::ExpectedNode)
        }
    }
}

fn scalar_kind(kind: FieldKind) -> ScalarKind {
    match kind {
        FieldKind::Scalar(kind) | FieldKind::ScalarList(kind) => kind,
        // relations never reach the scalar arms
        FieldKind::Relation(_) | FieldKind::RelationList(_) => ScalarKind::String,
    }
}
