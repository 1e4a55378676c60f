//! Store collaborator interface.
//!
//! The mapper never opens connections itself; it hands flat mutations and
//! query text to a [`Transport`] and reads back [`ResultNode`] trees.

use std::error::Error as StdError;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Value;
use crate::mutation::Mutation;

/// Opaque failure reported by a transport.
#[derive(Debug, Error)]
#[error("transport error: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl TransportError {
    /// Wraps any error raised by the underlying client.
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        TransportError {
            source: source.into(),
        }
    }

    /// Plain message error.
    pub fn msg(message: impl Into<String>) -> Self {
        TransportError::new(message.into())
    }

    /// Underlying client error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// One typed property of a result node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Edge name.
    pub prop: String,
    /// Stored value.
    pub value: Value,
}

/// Node of a query response tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultNode {
    /// Edge (or query block) name this node was reached through.
    pub attribute: String,
    /// Scalar edges of the node.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Related nodes; one entry per target, names may repeat.
    #[serde(default)]
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    /// Empty node reached through `attribute`.
    pub fn new(attribute: impl Into<String>) -> Self {
        ResultNode {
            attribute: attribute.into(),
            ..ResultNode::default()
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, prop: impl Into<String>, value: Value) -> Self {
        self.properties.push(Property {
            prop: prop.into(),
            value,
        });
        self
    }

    /// Adds a child node.
    pub fn with_child(mut self, child: ResultNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Blocking connection to a graph store.
pub trait Transport {
    /// Applies one flat mutation.
    fn run_mutation(&self, mutation: &Mutation) -> Result<(), TransportError>;
    /// Runs query text, returning the top-level response nodes.
    fn run_query(&self, query: &str) -> Result<Vec<ResultNode>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn run_mutation(&self, mutation: &Mutation) -> Result<(), TransportError> {
        (**self).run_mutation(mutation)
    }

    fn run_query(&self, query: &str) -> Result<Vec<ResultNode>, TransportError> {
        (**self).run_query(query)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn run_mutation(&self, mutation: &Mutation) -> Result<(), TransportError> {
        (**self).run_mutation(mutation)
    }

    fn run_query(&self, query: &str) -> Result<Vec<ResultNode>, TransportError> {
        (**self).run_query(query)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn run_mutation(&self, mutation: &Mutation) -> Result<(), TransportError> {
        (**self).run_mutation(mutation)
    }

    fn run_query(&self, query: &str) -> Result<Vec<ResultNode>, TransportError> {
        (**self).run_query(query)
    }
}
