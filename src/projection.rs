//! Projection trees: which properties and relations to fetch for a record
//! type, rendered as the brace-nested field list of a lookup query.

use std::fmt;

use tracing::debug;

use crate::mutation::{UID_EDGE, XID_EDGE};
use crate::schema::{FieldKind, Schema};
use crate::types::{GraftError, Result};

/// One entry of a [`Projection`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selection {
    /// Scalar or primitive-collection property.
    Leaf(String),
    /// Relation expanded into its own block.
    Block(Projection),
}

/// Nested field-name tree mirroring a record's relation structure.
///
/// The root has an empty name and renders without a surrounding block;
/// every named node renders as `name { _xid_ _uid_ ... }`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Projection {
    name: String,
    entries: Vec<Selection>,
}

impl Projection {
    /// Derives the projection of `schema`, expanding relations at most
    /// `max_depth` levels deep.
    pub fn derive(schema: &Schema, max_depth: usize) -> Projection {
        Projection {
            name: String::new(),
            entries: derive_entries(schema, 0, max_depth),
        }
    }

    /// Flat root projection over explicit property names.
    ///
    /// Names may contain ASCII letters, digits, `_` and `.`; anything else
    /// would change the shape of the query and is rejected.
    pub fn from_fields<S: AsRef<str>>(names: &[S]) -> Result<Projection> {
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !is_identifier(name) {
                return Err(GraftError::invalid(format!("query field name '{name}'")));
            }
            entries.push(Selection::Leaf(name.to_owned()));
        }
        Ok(Projection {
            name: String::new(),
            entries,
        })
    }

    /// Block name; empty at the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[Selection] {
        &self.entries
    }

    /// Named child block, if present.
    pub fn block(&self, name: &str) -> Option<&Projection> {
        self.entries.iter().find_map(|entry| match entry {
            Selection::Block(block) if block.name == name => Some(block),
            _ => None,
        })
    }

    fn render_entries(&self, out: &mut String) {
        for entry in &self.entries {
            match entry {
                Selection::Leaf(name) => {
                    out.push(' ');
                    out.push_str(name);
                }
                Selection::Block(block) => {
                    out.push(' ');
                    out.push_str(&block.name);
                    out.push_str(" { ");
                    out.push_str(XID_EDGE);
                    out.push(' ');
                    out.push_str(UID_EDGE);
                    block.render_entries(out);
                    out.push_str(" }");
                }
            }
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!("{XID_EDGE} {UID_EDGE}");
        self.render_entries(&mut out);
        f.write_str(&out)
    }
}

fn derive_entries(schema: &Schema, depth: usize, max_depth: usize) -> Vec<Selection> {
    let mut entries = Vec::new();
    for field in schema.mapped_fields() {
        let Some(name) = field.external_name() else {
            continue;
        };
        match field.kind() {
            FieldKind::Scalar(_) | FieldKind::ScalarList(_) => {
                entries.push(Selection::Leaf(name.to_owned()));
            }
            FieldKind::Relation(_) | FieldKind::RelationList(_) => {
                if depth >= max_depth {
                    debug!(
                        record = schema.type_name(),
                        field = name,
                        depth,
                        "projection.depth_limit"
                    );
                    continue;
                }
                let Some(target) = field.target() else {
                    continue;
                };
                entries.push(Selection::Block(Projection {
                    name: name.to_owned(),
                    entries: derive_entries(target, depth + 1, max_depth),
                }));
            }
        }
    }
    entries
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}
