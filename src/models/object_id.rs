//! 12-byte document identifiers rendered as 24 lowercase hex characters.
//!
//! Generation and parsing are delegated to `bson::oid::ObjectId`; the id is
//! kept as its hex text so it binds to a SQLite TEXT column as is.

use bson::oid;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a 24 character hex identifier")]
pub struct ObjectIdError(pub String);

/// Opaque identifier, stored as TEXT and sent over the wire as a hex string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(oid::ObjectId::new().to_hex())
    }

    /// Parse a 24 digit hex string. Upper-case digits are accepted; the
    /// stored form is always lowercase so both spellings are the same id.
    pub fn parse_str(value: &str) -> Result<Self, ObjectIdError> {
        oid::ObjectId::parse_str(value)
            .map(|id| Self(id.to_hex()))
            .map_err(|_| ObjectIdError(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<oid::ObjectId> for ObjectId {
    fn from(id: oid::ObjectId) -> Self {
        Self(id.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Accepts either the plain hex string or the extended JSON form
/// `{"$oid": "<hex>"}`.
impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Extended {
                #[serde(rename = "$oid")]
                oid: String,
            },
        }

        let raw = match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => s,
            Repr::Extended { oid } => oid,
        };
        ObjectId::parse_str(&raw).map_err(de::Error::custom)
    }
}
