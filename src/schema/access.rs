//! Type-erased field accessors.
//!
//! Each binding captures the typed getter pair registered on the
//! [`super::SchemaBuilder`] and exposes it through `&dyn Entity`, so the
//! write and read visitors can recurse across record types.

use super::{Entity, Record, Schema, ScalarField};
use crate::codec::{self, Scalar};
use crate::types::Result;

pub(crate) enum Access {
    Scalar(Box<dyn ScalarAccess>),
    ScalarList(Box<dyn ScalarListAccess>),
    Relation(Box<dyn RelationAccess>),
    RelationList(Box<dyn RelationListAccess>),
}

pub(crate) trait ScalarAccess: Send + Sync {
    /// `None` for a null reference.
    fn read(&self, record: &dyn Entity) -> Option<Scalar>;
    /// `false` when the value does not fit the field.
    fn write(&self, record: &mut dyn Entity, scalar: Scalar) -> bool;
}

pub(crate) trait ScalarListAccess: Send + Sync {
    fn len(&self, record: &dyn Entity) -> usize;
    /// JSON elements of the collection; empty when the collection is empty.
    fn to_json(&self, record: &dyn Entity) -> Result<Vec<serde_json::Value>>;
    /// Replaces the collection; `false` (field untouched) if any element
    /// does not fit.
    fn from_json(&self, record: &mut dyn Entity, items: &[serde_json::Value]) -> bool;
}

pub(crate) trait RelationAccess: Send + Sync {
    fn target(&self) -> &'static Schema;
    /// `None` for a null reference.
    fn get<'a>(&self, record: &'a dyn Entity) -> Option<&'a dyn Entity>;
    /// Allocates a fresh nested record, lets `fill` populate it, then stores
    /// it in the field.
    fn attach(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity));
}

pub(crate) trait RelationListAccess: Send + Sync {
    fn target(&self) -> &'static Schema;
    fn items<'a>(&self, record: &'a dyn Entity) -> Vec<&'a dyn Entity>;
    /// Allocates a fresh nested record, lets `fill` populate it, then appends
    /// it to the collection.
    fn append(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity));
}

fn downcast<R: Record>(record: &dyn Entity) -> Option<&R> {
    record.as_any().downcast_ref::<R>()
}

fn downcast_mut<R: Record>(record: &mut dyn Entity) -> Option<&mut R> {
    record.as_any_mut().downcast_mut::<R>()
}

pub(crate) struct ScalarBinding<R, T> {
    pub(crate) get: fn(&R) -> &T,
    pub(crate) get_mut: fn(&mut R) -> &mut T,
}

impl<R: Record, T: ScalarField> ScalarAccess for ScalarBinding<R, T> {
    fn read(&self, record: &dyn Entity) -> Option<Scalar> {
        downcast::<R>(record).and_then(|r| (self.get)(r).to_scalar())
    }

    fn write(&self, record: &mut dyn Entity, scalar: Scalar) -> bool {
        let Some(value) = T::from_scalar(scalar) else {
            return false;
        };
        match downcast_mut::<R>(record) {
            Some(r) => {
                *(self.get_mut)(r) = value;
                true
            }
            None => false,
        }
    }
}

pub(crate) struct ScalarListBinding<R, T> {
    pub(crate) get: fn(&R) -> &Vec<T>,
    pub(crate) get_mut: fn(&mut R) -> &mut Vec<T>,
}

impl<R: Record, T: ScalarField> ScalarListAccess for ScalarListBinding<R, T> {
    fn len(&self, record: &dyn Entity) -> usize {
        downcast::<R>(record).map_or(0, |r| (self.get)(r).len())
    }

    fn to_json(&self, record: &dyn Entity) -> Result<Vec<serde_json::Value>> {
        let Some(r) = downcast::<R>(record) else {
            return Ok(Vec::new());
        };
        (self.get)(r)
            .iter()
            .map(|item| match item.to_scalar() {
                Some(scalar) => codec::scalar_to_json(&scalar),
                None => Ok(serde_json::Value::Null),
            })
            .collect()
    }

    fn from_json(&self, record: &mut dyn Entity, items: &[serde_json::Value]) -> bool {
        let mut decoded = Vec::with_capacity(items.len());
        for item in items {
            let value = if item.is_null() {
                T::from_null()
            } else {
                codec::scalar_from_json(T::KIND, item).and_then(T::from_scalar)
            };
            match value {
                Some(value) => decoded.push(value),
                None => return false,
            }
        }
        match downcast_mut::<R>(record) {
            Some(r) => {
                *(self.get_mut)(r) = decoded;
                true
            }
            None => false,
        }
    }
}

pub(crate) struct RelationBinding<R, T> {
    pub(crate) get: fn(&R) -> &T,
    pub(crate) get_mut: fn(&mut R) -> &mut T,
}

impl<R: Record, T: Record> RelationAccess for RelationBinding<R, T> {
    fn target(&self) -> &'static Schema {
        T::schema()
    }

    fn get<'a>(&self, record: &'a dyn Entity) -> Option<&'a dyn Entity> {
        downcast::<R>(record).map(|r| (self.get)(r) as &dyn Entity)
    }

    fn attach(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity)) {
        let mut child = T::default();
        fill(&mut child);
        if let Some(r) = downcast_mut::<R>(record) {
            *(self.get_mut)(r) = child;
        }
    }
}

pub(crate) struct RelationRefBinding<R, T> {
    pub(crate) get: fn(&R) -> &Option<Box<T>>,
    pub(crate) get_mut: fn(&mut R) -> &mut Option<Box<T>>,
}

impl<R: Record, T: Record> RelationAccess for RelationRefBinding<R, T> {
    fn target(&self) -> &'static Schema {
        T::schema()
    }

    fn get<'a>(&self, record: &'a dyn Entity) -> Option<&'a dyn Entity> {
        downcast::<R>(record)
            .and_then(|r| (self.get)(r).as_deref())
            .map(|child| child as &dyn Entity)
    }

    fn attach(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity)) {
        let mut child = Box::new(T::default());
        fill(&mut *child);
        if let Some(r) = downcast_mut::<R>(record) {
            *(self.get_mut)(r) = Some(child);
        }
    }
}

pub(crate) struct RelationListBinding<R, T> {
    pub(crate) get: fn(&R) -> &Vec<T>,
    pub(crate) get_mut: fn(&mut R) -> &mut Vec<T>,
}

impl<R: Record, T: Record> RelationListAccess for RelationListBinding<R, T> {
    fn target(&self) -> &'static Schema {
        T::schema()
    }

    fn items<'a>(&self, record: &'a dyn Entity) -> Vec<&'a dyn Entity> {
        match downcast::<R>(record) {
            Some(r) => (self.get)(r)
                .iter()
                .map(|child| child as &dyn Entity)
                .collect(),
            None => Vec::new(),
        }
    }

    fn append(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity)) {
        let mut child = T::default();
        fill(&mut child);
        if let Some(r) = downcast_mut::<R>(record) {
            (self.get_mut)(r).push(child);
        }
    }
}

pub(crate) struct RelationRefListBinding<R, T> {
    pub(crate) get: fn(&R) -> &Vec<Box<T>>,
    pub(crate) get_mut: fn(&mut R) -> &mut Vec<Box<T>>,
}

impl<R: Record, T: Record> RelationListAccess for RelationRefListBinding<R, T> {
    fn target(&self) -> &'static Schema {
        T::schema()
    }

    fn items<'a>(&self, record: &'a dyn Entity) -> Vec<&'a dyn Entity> {
        match downcast::<R>(record) {
            Some(r) => (self.get)(r)
                .iter()
                .map(|child| &**child as &dyn Entity)
                .collect(),
            None => Vec::new(),
        }
    }

    fn append(&self, record: &mut dyn Entity, fill: &mut dyn FnMut(&mut dyn Entity)) {
        let mut child = Box::new(T::default());
        fill(&mut *child);
        if let Some(r) = downcast_mut::<R>(record) {
            (self.get_mut)(r).push(child);
        }
    }
}
