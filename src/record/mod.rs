//! Record model: the value types handed between the store, the service
//! and the HTTP layer.
//!
//! A record is a flat map of string fields addressed by a positive integer
//! id. Every append produces an immutable `VersionedRecord`; reads always
//! hand back owned copies so callers can mutate them freely.

mod codec;
mod update;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use codec::{decode_fields, encode_fields};
pub use update::{FieldUpdate, Update};

use crate::error::RecordError;

/// A record's payload. Ordered so the stored JSON is canonical.
pub type FieldMap = BTreeMap<String, String>;

/// Version number assigned by the store at append time.
pub type Version = i64;

/// Identifier of a record. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    /// Validate a raw id.
    pub fn new(raw: i64) -> Result<Self, RecordError> {
        if raw <= 0 {
            return Err(RecordError::InvalidId);
        }
        Ok(RecordId(raw))
    }

    /// Parse an id from a URL path segment.
    ///
    /// Ids are 32-bit on the wire; anything non-numeric, out of range or
    /// not positive is rejected.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let value: i32 = raw.trim().parse().map_err(|_| RecordError::InvalidId)?;
        Self::new(i64::from(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RecordId {
    type Error = RecordError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unversioned record, used by the legacy create path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub data: FieldMap,
}

impl Record {
    pub fn new(id: RecordId, data: FieldMap) -> Self {
        Record { id, data }
    }
}

/// One immutable version of a record.
///
/// Serializes as `{"id": .., "version": .., "data": {..}}`. Placeholders
/// (see [`VersionedRecord::placeholder`]) serialize with `id` and
/// `version` of `0` and empty `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRecord {
    #[serde(with = "id_or_zero")]
    pub id: Option<RecordId>,
    pub version: Version,
    pub data: FieldMap,
}

impl VersionedRecord {
    pub fn new(id: RecordId, version: Version, data: FieldMap) -> Self {
        VersionedRecord {
            id: Some(id),
            version,
            data,
        }
    }

    /// Empty stand-in for a requested version that does not exist.
    pub fn placeholder() -> Self {
        VersionedRecord {
            id: None,
            version: 0,
            data: FieldMap::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }

    /// Drop the version, keeping id and data.
    pub fn into_record(self) -> Option<Record> {
        let id = self.id?;
        Some(Record { id, data: self.data })
    }
}

mod id_or_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::RecordId;

    pub fn serialize<S>(id: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(id.map(RecordId::get).unwrap_or(0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        if raw == 0 {
            return Ok(None);
        }
        RecordId::new(raw)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
