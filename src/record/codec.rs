//! Canonical JSON encoding of a field map, as stored by the backends.

use super::FieldMap;

/// Encode fields as a JSON object with keys in sorted order.
pub fn encode_fields(fields: &FieldMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(fields)
}

/// Decode a stored JSON object back into fields.
///
/// Only string values are accepted; anything else is a decode error.
pub fn decode_fields(raw: &str) -> Result<FieldMap, serde_json::Error> {
    serde_json::from_str(raw)
}
