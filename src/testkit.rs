//! In-process [`Transport`] for tests and examples.
//!
//! [`MemoryStore`] applies mutations to a vertex table and answers the
//! lookup queries the mapper emits, so both pipelines can be exercised end
//! to end without a server.
//!
//! Built with the `testkit` feature (on by default). Disable default
//! features to leave it and `parking_lot` out of a production build.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use crate::codec::Value;
use crate::mutation::{Mutation, Object, UID_EDGE, XID_EDGE};
use crate::transport::{Property, ResultNode, Transport, TransportError};
use crate::types::Uid;

const ROOT_ATTRIBUTE: &str = "_root_";

/// Stored state of one vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexSnapshot {
    properties: Vec<(String, Value)>,
    edges: Vec<(String, Uid)>,
}

impl VertexSnapshot {
    /// Value of the `_xid_` edge as stored.
    pub fn xid(&self) -> Option<&str> {
        match self.property(XID_EDGE) {
            Some(Value::Str(xid)) => Some(xid),
            _ => None,
        }
    }

    /// Scalar edge value.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
    }

    /// Scalar edge names in first-write order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|(prop, _)| prop.as_str()).collect()
    }

    /// Targets of `predicate` in first-link order.
    pub fn targets(&self, predicate: &str) -> Vec<Uid> {
        self.edges
            .iter()
            .filter(|(name, _)| name == predicate)
            .map(|(_, target)| *target)
            .collect()
    }

    fn set(&mut self, predicate: &str, object: &Object) {
        match object {
            Object::Value(value) => {
                match self.properties.iter_mut().find(|(prop, _)| prop == predicate) {
                    Some(slot) => slot.1 = value.clone(),
                    None => self.properties.push((predicate.to_owned(), value.clone())),
                }
            }
            Object::Vertex(target) => {
                let exists = self
                    .edges
                    .iter()
                    .any(|(name, uid)| name == predicate && uid == target);
                if !exists {
                    self.edges.push((predicate.to_owned(), *target));
                }
            }
        }
    }
}

#[derive(Default)]
struct State {
    vertices: HashMap<Uid, VertexSnapshot>,
    mutations: Vec<Mutation>,
    queries: Vec<String>,
    fail_after: Option<usize>,
    canned: Option<Vec<ResultNode>>,
}

/// Thread-safe in-memory graph store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutations applied so far.
    pub fn mutation_count(&self) -> usize {
        self.state.lock().mutations.len()
    }

    /// Applied mutations in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().mutations.clone()
    }

    /// Query texts received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    /// Number of vertices touched by any mutation.
    pub fn vertex_count(&self) -> usize {
        self.state.lock().vertices.len()
    }

    /// Snapshot of one vertex.
    pub fn vertex(&self, uid: Uid) -> Option<VertexSnapshot> {
        self.state.lock().vertices.get(&uid).cloned()
    }

    /// Lets `n` more mutations succeed, then rejects every later one.
    pub fn fail_mutations_after(&self, n: usize) {
        let mut state = self.state.lock();
        state.fail_after = Some(state.mutations.len() + n);
    }

    /// Answers every later query with `nodes` instead of the stored graph.
    pub fn answer_queries_with(&self, nodes: Vec<ResultNode>) {
        self.state.lock().canned = Some(nodes);
    }
}

impl Transport for MemoryStore {
    fn run_mutation(&self, mutation: &Mutation) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if let Some(limit) = state.fail_after {
            if state.mutations.len() >= limit {
                return Err(TransportError::msg("mutation rejected by failure injection"));
            }
        }
        for edge in mutation.sets() {
            state
                .vertices
                .entry(edge.subject)
                .or_default()
                .set(&edge.predicate, &edge.object);
        }
        state.mutations.push(mutation.clone());
        trace!(edges = mutation.len(), "testkit.mutation");
        Ok(())
    }

    fn run_query(&self, query: &str) -> Result<Vec<ResultNode>, TransportError> {
        let mut state = self.state.lock();
        state.queries.push(query.to_owned());
        if let Some(nodes) = &state.canned {
            return Ok(nodes.clone());
        }
        let lookup = parse_lookup(query)?;
        let mut root = ResultNode::new(ROOT_ATTRIBUTE);
        if state.vertices.contains_key(&lookup.uid) {
            root.children.push(render(
                &state.vertices,
                lookup.uid,
                &lookup.type_name,
                &lookup.selections,
            ));
        }
        Ok(vec![root])
    }
}

#[derive(Debug, PartialEq)]
enum Selection {
    Leaf(String),
    Block(String, Vec<Selection>),
}

#[derive(Debug)]
struct Lookup {
    type_name: String,
    uid: Uid,
    selections: Vec<Selection>,
}

/// Parses `{ Type(id: 0x..) { fields } }`.
fn parse_lookup(query: &str) -> Result<Lookup, TransportError> {
    let bad = || TransportError::msg(format!("unsupported query: {query}"));
    let body = query
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(bad)?
        .trim();
    let open = body.find("(id:").ok_or_else(bad)?;
    let type_name = body[..open].trim().to_owned();
    let rest = &body[open + "(id:".len()..];
    let close = rest.find(')').ok_or_else(bad)?;
    let uid = Uid::parse_hex(rest[..close].trim()).ok_or_else(bad)?;

    let mut tokens = rest[close + 1..].split_whitespace().peekable();
    if tokens.next() != Some("{") {
        return Err(bad());
    }
    let selections = parse_selections(&mut tokens).ok_or_else(bad)?;
    if tokens.next().is_some() || type_name.is_empty() {
        return Err(bad());
    }
    Ok(Lookup {
        type_name,
        uid,
        selections,
    })
}

/// Reads selections up to and including the closing brace.
fn parse_selections<'q, I>(tokens: &mut std::iter::Peekable<I>) -> Option<Vec<Selection>>
where
    I: Iterator<Item = &'q str>,
{
    let mut selections = Vec::new();
    loop {
        let token = tokens.next()?;
        match token {
            "}" => return Some(selections),
            "{" => return None,
            name => {
                if tokens.peek() == Some(&"{") {
                    tokens.next();
                    let children = parse_selections(tokens)?;
                    selections.push(Selection::Block(name.to_owned(), children));
                } else {
                    selections.push(Selection::Leaf(name.to_owned()));
                }
            }
        }
    }
}

fn render(
    vertices: &HashMap<Uid, VertexSnapshot>,
    uid: Uid,
    attribute: &str,
    selections: &[Selection],
) -> ResultNode {
    let mut node = ResultNode::new(attribute);
    let vertex = vertices.get(&uid);
    for selection in selections {
        match selection {
            Selection::Leaf(name) if name == UID_EDGE => node.properties.push(Property {
                prop: UID_EDGE.to_owned(),
                value: Value::Uid(uid.0),
            }),
            Selection::Leaf(name) => {
                if let Some(value) = vertex.and_then(|v| v.property(name)) {
                    node.properties.push(Property {
                        prop: name.clone(),
                        value: value.clone(),
                    });
                }
            }
            Selection::Block(name, children) => {
                let targets = vertex.map(|v| v.targets(name)).unwrap_or_default();
                for target in targets {
                    node.children.push(render(vertices, target, name, children));
                }
            }
        }
    }
    node
}
