use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by the mapping engine.
///
/// Write-path errors abort the current recursive call; read-path shape
/// problems are absorbed into [`crate::Diagnostics`] and never appear here.
#[derive(Debug, Error)]
pub enum GraftError {
    /// A caller-supplied argument cannot be mapped.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A field or element kind the codec or classifier cannot handle.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// Identity-based fetch returned no node.
    #[error("{0} not found")]
    NotFound(String),
    /// Attempt to write an empty string scalar.
    #[error("empty value")]
    EmptyValue,
    /// A store value could not be converted back into a native scalar.
    #[error("decode error: {0}")]
    Decode(String),
    /// JSON encoding of a primitive collection or geo value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Opaque transport failure, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraftError>;

impl GraftError {
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        GraftError::UnsupportedType(what.into())
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        GraftError::InvalidArgument(what.into())
    }
}
