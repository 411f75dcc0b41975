//! Webhook record types.
//!
//! A [`Record`] is the decoded payload of one inbound event: a JSON object
//! with arbitrarily nested values. A [`FlatRecord`] is the ingestion-ready
//! form produced by the transform pipeline: no nested objects remain, and
//! the reserved [`RAW_KEY`] entry carries the exact serialization of the
//! original payload so downstream consumers can recover its structure.
//!
//! Records are transient request-scoped values and are never persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved flat-record key holding the serialized pre-transform payload.
pub const RAW_KEY: &str = "__raw";

/// Decoded webhook payload: string keys mapped to nested JSON values.
///
/// Backed by `serde_json::Map`, which iterates keys in lexicographic order.
/// That order is what makes flat-key collisions deterministic (see
/// [`crate::transform::flatten`]).
pub type Record = Map<String, Value>;

/// A flattened record ready for stream delivery.
///
/// Values are scalars or arrays; nested objects have been decomposed into
/// underscore-joined composite keys by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    /// Wraps an already-flattened map.
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// Returns the value bound to `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries, including the raw-payload field.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The serialized original payload, when the pipeline attached it.
    pub fn raw(&self) -> Option<&str> {
        self.0.get(RAW_KEY).and_then(Value::as_str)
    }

    /// Iterates over entries in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Encodes the record for the wire: one JSON object, newline-terminated.
    pub fn to_wire(&self) -> serde_json::Result<Vec<u8>> {
        let mut frame = serde_json::to_vec(&self.0)?;
        frame.push(b'\n');
        Ok(frame)
    }
}

impl From<Map<String, Value>> for FlatRecord {
    fn from(entries: Map<String, Value>) -> Self {
        Self(entries)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> FlatRecord {
        let mut entries = Map::new();
        entries.insert("a_b".to_string(), json!(1));
        entries.insert(RAW_KEY.to_string(), json!(r#"{"a":{"b":1}}"#));
        FlatRecord::new(entries)
    }

    #[test]
    fn wire_frame_is_newline_terminated_json() {
        let frame = sample().to_wire().expect("encode frame");

        assert_eq!(frame.last(), Some(&b'\n'));

        let decoded: Value =
            serde_json::from_slice(&frame[..frame.len() - 1]).expect("frame body is JSON");
        assert_eq!(decoded["a_b"], json!(1));
    }

    #[test]
    fn raw_accessor_reads_reserved_key() {
        assert_eq!(sample().raw(), Some(r#"{"a":{"b":1}}"#));
        assert_eq!(FlatRecord::default().raw(), None);
    }
}
