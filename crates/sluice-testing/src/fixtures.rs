//! Canonical webhook payloads used across integration tests.

use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(entries) => entries,
        other => panic!("fixture must be an object, got {other}"),
    }
}

/// A flat, single-level payload.
pub fn simple_payload() -> Map<String, Value> {
    object(json!({"event": "ping", "attempt": 1}))
}

/// A deeply nested payload with scalar, array, and string leaves.
///
/// Flattens to five leaves: `hello_world_a`, `hello_world_b`,
/// `hello_world_c`, `goodbye_this_that`, and `goodbye_foo_bar`.
pub fn nested_order_payload() -> Map<String, Value> {
    object(json!({
        "hello": {"world": {"a": 1, "b": 2, "c": 3}},
        "goodbye": {"this": {"that": [0, 1]}, "foo": {"bar": "whoops"}}
    }))
}
