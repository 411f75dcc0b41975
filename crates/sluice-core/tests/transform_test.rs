//! Integration tests for the normalization pipeline.
//!
//! Exercises the full flatten-and-attach-raw contract on representative
//! webhook payloads, including the totality property: every leaf of the
//! input is reachable in the output under its composite key.

use serde_json::{json, Value};
use sluice_core::{Pipeline, Record, RAW_KEY};

fn record(value: Value) -> Record {
    match value {
        Value::Object(entries) => entries,
        other => panic!("test payload must be an object, got {other}"),
    }
}

/// Counts values that flattening treats as leaves: anything that is not an
/// object, at any depth.
fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(entries) => entries.values().map(count_leaves).sum(),
        _ => 1,
    }
}

#[test]
fn output_has_one_entry_per_leaf_plus_raw() {
    let payloads = [
        json!({"a": 1}),
        json!({"a": {"b": "x", "c": {"d": null}}, "e": [1, 2, 3]}),
        json!({"order": {"id": 42, "customer": {"name": "Ada", "tags": ["vip"]}}}),
    ];

    let pipeline = Pipeline::new().flatten();

    for payload in payloads {
        let leaves = count_leaves(&payload);
        let flat = pipeline.apply(&record(payload)).expect("apply pipeline");

        assert_eq!(flat.len(), leaves + 1);
    }
}

#[test]
fn empty_record_yields_raw_only() {
    let flat = Pipeline::new().flatten().apply(&Record::new()).expect("apply pipeline");

    assert_eq!(flat.len(), 1);
    assert_eq!(flat.raw(), Some("{}"));
}

#[test]
fn array_values_are_never_decomposed() {
    let flat = Pipeline::new()
        .flatten()
        .apply(&record(json!({"a": {"b": [1, 2]}})))
        .expect("apply pipeline");

    assert_eq!(flat.get("a_b"), Some(&json!([1, 2])));
    assert!(flat.get("a_b_0").is_none());
}

#[test]
fn raw_field_round_trips_to_original_input() {
    let input = record(json!({
        "Session": {"User": {"Id": 7, "Roles": ["admin", "ops"]}},
        "source": "checkout"
    }));

    let flat = Pipeline::new().flatten().apply(&input).expect("apply pipeline");

    let recovered: Value =
        serde_json::from_str(flat.raw().expect("raw field present")).expect("raw is JSON");
    assert_eq!(recovered, Value::Object(input));
}

#[test]
fn end_to_end_nested_scenario() {
    let input = record(json!({
        "hello": {"world": {"a": 1, "b": 2, "c": 3}},
        "goodbye": {"this": {"that": [0, 1]}, "foo": {"bar": "whoops"}}
    }));

    let flat = Pipeline::new().flatten().apply(&input).expect("apply pipeline");

    assert_eq!(flat.len(), 6);
    assert_eq!(flat.get("hello_world_a"), Some(&json!(1)));
    assert_eq!(flat.get("hello_world_b"), Some(&json!(2)));
    assert_eq!(flat.get("hello_world_c"), Some(&json!(3)));
    assert_eq!(flat.get("goodbye_this_that"), Some(&json!([0, 1])));
    assert_eq!(flat.get("goodbye_foo_bar"), Some(&json!("whoops")));
    assert!(flat.get(RAW_KEY).is_some());
}

#[test]
fn mixed_case_keys_normalize_to_lowercase_paths() {
    let flat = Pipeline::new()
        .flatten()
        .apply(&record(json!({"Payment": {"Amount": {"USD": 10.5}}})))
        .expect("apply pipeline");

    assert_eq!(flat.get("payment_amount_usd"), Some(&json!(10.5)));
}
