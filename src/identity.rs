//! Identity resolution: record → XID → UID.
//!
//! Resolution order is the record's custom identity, then the field named
//! `uid` (formatted `"<value>_<lowercased type>"`), then a random v4 UUID.
//! The UID is always the FNV-1a hash of the XID, so equal XIDs land on the
//! same vertex. Collisions are not detected.

use tracing::{debug, warn};

use crate::codec::Scalar;
use crate::schema::{Access, Entity, Schema};
use crate::types::{GraftError, Result, Uid, Xid};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Where an [`Identity`] came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IdentitySource {
    /// [`crate::Record::identity`].
    Method,
    /// The field resolved to `uid`.
    Field,
    /// Freshly generated; differs on every call.
    Random,
}

/// Resolved identity of one record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// External identity written to `_xid_`.
    pub xid: Xid,
    /// Vertex key, `hash_to_vertex_id(&xid)`.
    pub uid: Uid,
    /// Resolution tier that produced `xid`.
    pub source: IdentitySource,
}

impl Identity {
    /// Builds the identity for an already formatted XID.
    pub fn from_xid(xid: Xid, source: IdentitySource) -> Self {
        let uid = hash_to_vertex_id(&xid);
        Identity { xid, uid, source }
    }

    /// XID `"<value>_<lowercased type>"` for an explicit id value.
    pub fn for_value(value: &str, schema: &Schema) -> Self {
        Identity::from_xid(
            Xid::new(format!("{value}_{}", schema.identity_suffix())),
            IdentitySource::Field,
        )
    }
}

/// 64-bit FNV-1a hash of the XID bytes.
pub fn hash_to_vertex_id(xid: &Xid) -> Uid {
    let hash = xid
        .as_str()
        .bytes()
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        });
    Uid(hash)
}

/// Canonical text of an identity value: decimal integers, six fractional
/// digits for floats, `true`/`false`, strings verbatim. Other kinds have no
/// canonical form.
pub fn format_identity(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Int(v) => Some(v.to_string()),
        Scalar::Uint(v) => Some(v.to_string()),
        Scalar::Float(v) => Some(format!("{v:.6}")),
        Scalar::Bool(v) => Some(v.to_string()),
        Scalar::String(v) => Some(v.clone()),
        Scalar::Bytes(_) | Scalar::DateTime(_) | Scalar::Geo(_) => None,
    }
}

/// Identity from the custom method or the `uid` field, if either yields a
/// formattable value.
pub fn stable_identity(record: &dyn Entity) -> Option<Identity> {
    let schema = record.descriptor();
    if let Some(text) = record.custom_identity().as_ref().and_then(format_identity) {
        return Some(Identity::from_xid(Xid::new(text), IdentitySource::Method));
    }
    let field = schema.identity_field()?;
    let Access::Scalar(access) = field.access() else {
        debug!(
            record = schema.type_name(),
            field = field.declared_name(),
            "identity.field_not_scalar"
        );
        return None;
    };
    let text = access.read(record).as_ref().and_then(format_identity)?;
    Some(Identity::for_value(&text, schema))
}

/// Full resolution, falling back to a random identity.
pub fn resolve_identity(record: &dyn Entity) -> Identity {
    stable_identity(record).unwrap_or_else(|| random_identity(record.descriptor()))
}

/// Resolution honoring the mapper's random-identity switch.
pub(crate) fn resolve_with(record: &dyn Entity, allow_random: bool) -> Result<Identity> {
    match stable_identity(record) {
        Some(identity) => Ok(identity),
        None if allow_random => Ok(random_identity(record.descriptor())),
        None => Err(GraftError::invalid(format!(
            "{} has no identity field or identity method",
            record.descriptor().type_name()
        ))),
    }
}

fn random_identity(schema: &Schema) -> Identity {
    let xid = Xid::new(uuid::Uuid::new_v4().to_string());
    warn!(record = schema.type_name(), xid = %xid, "identity.random");
    Identity::from_xid(xid, IdentitySource::Random)
}
