#![forbid(unsafe_code)]

//! Identifier newtypes and the crate-wide error type.

mod error;

use std::fmt;

pub use error::{GraftError, Result};

/// Internal vertex identifier assigned by hashing an [`Xid`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Uid(pub u64);

/// External, human-derived vertex identity (`"<id>_<type>"`, a custom value,
/// or a random UUID).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Xid(String);

impl Uid {
    /// Parses the `0x`-prefixed hex form produced by [`fmt::Display`].
    pub fn parse_hex(text: &str) -> Option<Uid> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))?;
        u64::from_str_radix(digits, 16).ok().map(Uid)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for Uid {
    fn from(value: u64) -> Self {
        Uid(value)
    }
}

impl From<Uid> for u64 {
    fn from(value: Uid) -> Self {
        value.0
    }
}

impl Xid {
    /// Wraps an already-formatted identity string.
    pub fn new(value: impl Into<String>) -> Self {
        Xid(value.into())
    }

    /// Borrows the identity text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the identity text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Xid {
    fn from(value: String) -> Self {
        Xid(value)
    }
}

impl From<&str> for Xid {
    fn from(value: &str) -> Self {
        Xid(value.to_owned())
    }
}

impl AsRef<str> for Xid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
