#![forbid(unsafe_code)]

//! Conversion between native scalars and the store's typed value
//! representation.
//!
//! Writes go through [`to_store`], reads through [`from_store`]. Primitive
//! collections travel as one JSON array string ([`encode_list`] /
//! [`decode_list`]).

mod geo;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::schema::ScalarKind;
use crate::types::{GraftError, Result};

pub use geo::{GeoGeometry, GeoPoint};

/// Fixed textual layout of datetime values, e.g.
/// `2017-09-01 10:04:05.000000123 +0530`.
pub const DATETIME_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:9] [offset_hour sign:mandatory][offset_minute]"
);

/// Typed value as the store sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float; also carries unsigned integers.
    Double(f64),
    /// String with embedded quotes escaped as `\"`.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// Datetime text in [`DATETIME_FORMAT`].
    DateTime(String),
    /// GeoJSON text.
    Geo(String),
    /// Store-assigned vertex id (only ever read, e.g. `_uid_`).
    Uid(u64),
    /// Untyped value, read back as a string.
    Default(String),
}

/// Native scalar value extracted from, or assigned into, a record field.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Any signed integer width.
    Int(i64),
    /// Any unsigned integer width.
    Uint(u64),
    /// `f32` or `f64`.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Byte sequence.
    Bytes(Vec<u8>),
    /// Timestamp with offset.
    DateTime(OffsetDateTime),
    /// Geographic feature.
    Geo(GeoPoint),
}

impl Scalar {
    /// Kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Uint(_) => ScalarKind::Uint,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::String(_) => ScalarKind::String,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Bytes(_) => ScalarKind::Bytes,
            Scalar::DateTime(_) => ScalarKind::DateTime,
            Scalar::Geo(_) => ScalarKind::Geo,
        }
    }

    /// Whether the value is its type's zero value. Zero-valued fields are
    /// never written. Timestamps and geo features have no zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Int(v) => *v == 0,
            Scalar::Uint(v) => *v == 0,
            Scalar::Float(v) => *v == 0.0,
            Scalar::String(v) => v.is_empty(),
            Scalar::Bool(v) => !*v,
            Scalar::Bytes(v) => v.is_empty(),
            Scalar::DateTime(_) | Scalar::Geo(_) => false,
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Uint(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

/// Encodes a native scalar for a write.
///
/// Empty strings fail with [`GraftError::EmptyValue`]; callers treat that as
/// "absent" rather than as a failed mutation.
pub fn to_store(scalar: &Scalar) -> Result<Value> {
    Ok(match scalar {
        Scalar::Int(v) => Value::Int(*v),
        Scalar::Uint(v) => Value::Double(*v as f64),
        Scalar::Float(v) => Value::Double(*v),
        Scalar::String(v) => {
            if v.is_empty() {
                return Err(GraftError::EmptyValue);
            }
            Value::Str(v.replace('"', "\\\""))
        }
        Scalar::Bool(v) => Value::Bool(*v),
        Scalar::Bytes(v) => Value::Bytes(v.clone()),
        Scalar::DateTime(v) => Value::DateTime(
            v.format(DATETIME_FORMAT)
                .map_err(|err| GraftError::unsupported(format!("datetime {v}: {err}")))?,
        ),
        Scalar::Geo(v) => Value::Geo(v.to_json()?),
    })
}

/// Decodes a store value into its native scalar.
pub fn from_store(value: &Value) -> Result<Scalar> {
    Ok(match value {
        Value::Int(v) => Scalar::Int(*v),
        Value::Double(v) => Scalar::Float(*v),
        Value::Str(v) => Scalar::String(v.replace("\\\"", "\"")),
        Value::Bool(v) => Scalar::Bool(*v),
        Value::Bytes(v) => Scalar::Bytes(v.clone()),
        Value::DateTime(text) => Scalar::DateTime(
            OffsetDateTime::parse(text, DATETIME_FORMAT)
                .map_err(|err| GraftError::Decode(format!("datetime '{text}': {err}")))?,
        ),
        Value::Geo(text) => Scalar::Geo(GeoPoint::from_json(text)?),
        Value::Uid(v) => Scalar::Uint(*v),
        Value::Default(v) => Scalar::String(v.clone()),
    })
}

/// Converts a primitive scalar into a JSON collection element.
pub fn scalar_to_json(scalar: &Scalar) -> Result<serde_json::Value> {
    Ok(match scalar {
        Scalar::Int(v) => serde_json::Value::from(*v),
        Scalar::Uint(v) => serde_json::Value::from(*v),
        Scalar::Float(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .ok_or_else(|| GraftError::unsupported(format!("non-finite float {v} in collection")))?,
        Scalar::String(v) => serde_json::Value::String(v.clone()),
        Scalar::Bool(v) => serde_json::Value::Bool(*v),
        other => {
            return Err(GraftError::unsupported(format!(
                "{} elements in a primitive collection",
                other.kind()
            )))
        }
    })
}

/// Reads a JSON collection element as a scalar of the requested kind.
///
/// Returns `None` when the element does not fit the kind (or is `null`).
pub fn scalar_from_json(kind: ScalarKind, value: &serde_json::Value) -> Option<Scalar> {
    match kind {
        ScalarKind::Int => value.as_i64().map(Scalar::Int),
        ScalarKind::Uint => value.as_u64().map(Scalar::Uint),
        ScalarKind::Float => value.as_f64().map(Scalar::Float),
        ScalarKind::String => value.as_str().map(|s| Scalar::String(s.to_owned())),
        ScalarKind::Bool => value.as_bool().map(Scalar::Bool),
        ScalarKind::Bytes | ScalarKind::DateTime | ScalarKind::Geo => None,
    }
}

/// Encodes collection elements as one JSON array string.
pub fn encode_list(items: Vec<serde_json::Value>) -> Result<String> {
    Ok(serde_json::to_string(&serde_json::Value::Array(items))?)
}

/// Decodes a JSON array string into its elements.
pub fn decode_list(text: &str) -> Result<Vec<serde_json::Value>> {
    Ok(serde_json::from_str(text)?)
}
