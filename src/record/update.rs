//! Partial updates: the parsed form of a POST body.
//!
//! A body maps each key to either a string (set the field) or `null`
//! (delete the field). Keys not mentioned keep their current value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FieldMap;
use crate::error::RecordError;

/// What to do with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Set(String),
    Delete,
}

impl From<Option<String>> for FieldUpdate {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Delete,
        }
    }
}

impl From<FieldUpdate> for Option<String> {
    fn from(update: FieldUpdate) -> Self {
        match update {
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Delete => None,
        }
    }
}

/// A set of field updates keyed by field name.
///
/// Deserializes from `{"<k>": "<v>" | null, ...}`. A `null` value is kept
/// as [`FieldUpdate::Delete`] rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<String>>",
    into = "BTreeMap<String, Option<String>>"
)]
pub struct Update {
    fields: BTreeMap<String, FieldUpdate>,
}

impl From<BTreeMap<String, Option<String>>> for Update {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        Update {
            fields: raw
                .into_iter()
                .map(|(key, value)| (key, FieldUpdate::from(value)))
                .collect(),
        }
    }
}

impl From<Update> for BTreeMap<String, Option<String>> {
    fn from(update: Update) -> Self {
        update
            .fields
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect()
    }
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request body.
    pub fn from_json(body: &[u8]) -> Result<Self, RecordError> {
        serde_json::from_slice(body).map_err(|e| RecordError::MalformedBody(e.to_string()))
    }

    /// Set `key` to `value`. Builder style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.into(), FieldUpdate::Set(value.into()));
        self
    }

    /// Delete `key`. Builder style.
    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.fields.insert(key.into(), FieldUpdate::Delete);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldUpdate> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldUpdate)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The fields of a brand-new record: every `Set`, with deletions
    /// discarded since there is nothing to delete yet.
    pub fn upserts(&self) -> FieldMap {
        self.fields
            .iter()
            .filter_map(|(key, value)| match value {
                FieldUpdate::Set(value) => Some((key.clone(), value.clone())),
                FieldUpdate::Delete => None,
            })
            .collect()
    }

    /// Apply this update in place.
    pub fn apply_to(&self, fields: &mut FieldMap) {
        for (key, value) in &self.fields {
            match value {
                FieldUpdate::Set(value) => {
                    fields.insert(key.clone(), value.clone());
                }
                FieldUpdate::Delete => {
                    fields.remove(key);
                }
            }
        }
    }

    /// Merge onto a copy of `base`, leaving `base` untouched.
    pub fn merge(&self, base: &FieldMap) -> FieldMap {
        let mut merged = base.clone();
        self.apply_to(&mut merged);
        merged
    }
}
