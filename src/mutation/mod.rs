#![forbid(unsafe_code)]

//! Flat mutation requests and the recursive write pipeline.

mod writer;

use std::fmt;

use crate::codec::Value;
use crate::types::Uid;

pub(crate) use writer::Writer;

/// Reserved edge holding a vertex's external identity.
pub const XID_EDGE: &str = "_xid_";
/// Reserved property carrying a vertex's internal id in query results.
pub const UID_EDGE: &str = "_uid_";

/// Handle to a store vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Vertex {
    uid: Uid,
}

impl Vertex {
    /// Handle for a vertex key.
    pub fn new(uid: Uid) -> Self {
        Vertex { uid }
    }

    /// Vertex key.
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Scalar edge from this vertex.
    pub fn edge(&self, predicate: impl Into<String>, value: Value) -> Edge {
        Edge {
            subject: self.uid,
            predicate: predicate.into(),
            object: Object::Value(value),
        }
    }

    /// Directed edge from this vertex to `target`.
    pub fn connect_to(&self, predicate: impl Into<String>, target: Vertex) -> Edge {
        Edge {
            subject: self.uid,
            predicate: predicate.into(),
            object: Object::Vertex(target.uid),
        }
    }
}

/// Right-hand side of an edge.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    /// Scalar value.
    Value(Value),
    /// Another vertex.
    Vertex(Uid),
}

/// One (vertex, predicate, value-or-vertex) triple.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Source vertex.
    pub subject: Uid,
    /// Edge name.
    pub predicate: String,
    /// Value or target vertex.
    pub object: Object,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Object::Value(value) => write!(f, "<{}> <{}> {:?}", self.subject, self.predicate, value),
            Object::Vertex(target) => write!(f, "<{}> <{}> <{}>", self.subject, self.predicate, target),
        }
    }
}

/// Ordered set of edges flushed to the store in one round trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mutation {
    sets: Vec<Edge>,
}

impl Mutation {
    /// Empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edge.
    pub fn set(&mut self, edge: Edge) {
        self.sets.push(edge);
    }

    /// Edges in insertion order.
    pub fn sets(&self) -> &[Edge] {
        &self.sets
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no edge was set.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
