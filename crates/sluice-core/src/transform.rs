//! Flattening transform and the pipeline that composes it.
//!
//! The pipeline is configured once at process start and is immutable
//! afterwards; applying it never mutates the caller's record. Steps run in
//! the order they were appended, and the serialized original payload is
//! attached under [`RAW_KEY`] after the last step.

use serde_json::Value;

use crate::{
    error::Result,
    record::{FlatRecord, Record, RAW_KEY},
};

/// Flattens a nested record into underscore-joined composite keys.
///
/// Objects are descended recursively; each key segment is lowercased and
/// joined to its parent path with `_`. Scalars, nulls, and arrays are
/// leaves and are bound verbatim — array contents are never decomposed.
/// An empty input yields an empty output.
///
/// Two distinct paths that lowercase-and-join to the same composite key
/// overwrite one another: traversal follows the map's lexicographic key
/// order, so the collision outcome is deterministic (last write wins), but
/// callers should treat colliding paths as undefined behavior.
pub fn flatten(record: &Record) -> Record {
    let mut flat = Record::new();
    for (key, value) in record {
        flatten_into(value, key.to_lowercase(), &mut flat);
    }
    flat
}

fn flatten_into(current: &Value, key: String, flat: &mut Record) {
    match current {
        Value::Object(entries) => {
            for (child, value) in entries {
                flatten_into(value, format!("{key}_{}", child.to_lowercase()), flat);
            }
        },
        leaf => {
            flat.insert(key, leaf.clone());
        },
    }
}

/// A named transform step applied to a record.
type Step = fn(&Record) -> Record;

/// Ordered chain of transform steps terminated by raw-payload attachment.
///
/// Built once at startup:
///
/// ```
/// use sluice_core::Pipeline;
///
/// let pipeline = Pipeline::new().flatten();
/// ```
///
/// Invocation runs the steps in append order, then unconditionally binds
/// [`RAW_KEY`] to the serialization of the *original* input record.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<(&'static str, Step)>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the flattening step to the chain.
    #[must_use]
    pub fn flatten(mut self) -> Self {
        self.steps.push(("flatten", flatten));
        self
    }

    /// Names of the configured steps, in application order.
    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|(name, _)| *name)
    }

    /// Runs the configured steps over `record` and attaches the raw field.
    ///
    /// The input is left untouched; steps operate on a working copy. The
    /// pipeline performs no I/O, so the only failure mode is serializing
    /// the original payload into the raw field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TransformError::RawEncode`] if the original record
    /// cannot be serialized.
    pub fn apply(&self, record: &Record) -> Result<FlatRecord> {
        let mut result = record.clone();
        for (_, step) in &self.steps {
            result = step(&result);
        }

        let raw = serde_json::to_string(record)?;
        result.insert(RAW_KEY.to_string(), Value::String(raw));

        Ok(FlatRecord::new(result))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(entries) => entries,
            other => panic!("test payload must be an object, got {other}"),
        }
    }

    #[test]
    fn top_level_keys_pass_through_lowercased() {
        let flat = flatten(&record(json!({"Alpha": 1, "beta": "two"})));

        assert_eq!(flat.get("alpha"), Some(&json!(1)));
        assert_eq!(flat.get("beta"), Some(&json!("two")));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn nested_objects_join_with_underscores() {
        let flat = flatten(&record(json!({"Outer": {"Inner": {"Leaf": true}}})));

        assert_eq!(flat.get("outer_inner_leaf"), Some(&json!(true)));
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn arrays_and_nulls_are_leaves() {
        let flat = flatten(&record(json!({"a": {"b": [1, 2], "c": null}})));

        assert_eq!(flat.get("a_b"), Some(&json!([1, 2])));
        assert_eq!(flat.get("a_c"), Some(&json!(null)));
    }

    #[test]
    fn empty_record_flattens_to_empty() {
        assert!(flatten(&Record::new()).is_empty());
    }

    #[test]
    fn empty_nested_object_contributes_no_entries() {
        let flat = flatten(&record(json!({"a": {}})));
        assert!(flat.is_empty());
    }

    #[test]
    fn colliding_paths_resolve_deterministically() {
        // "A.b" and "a_b" both flatten to "a_b"; lexicographic traversal
        // visits "A" before "a_b", so the top-level entry wins.
        let flat = flatten(&record(json!({"A": {"b": "nested"}, "a_b": "flat"})));

        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("a_b"), Some(&json!("flat")));
    }

    #[test]
    fn pipeline_leaves_input_untouched() {
        let input = record(json!({"a": {"b": 1}}));
        let before = input.clone();

        let pipeline = Pipeline::new().flatten();
        pipeline.apply(&input).expect("apply pipeline");

        assert_eq!(input, before);
    }

    #[test]
    fn pipeline_attaches_raw_after_steps() {
        let input = record(json!({"a": {"b": 1}}));

        let flat = Pipeline::new().flatten().apply(&input).expect("apply pipeline");

        assert_eq!(flat.get("a_b"), Some(&json!(1)));
        let raw: Value = serde_json::from_str(flat.raw().expect("raw field")).expect("raw JSON");
        assert_eq!(raw, json!({"a": {"b": 1}}));
    }

    #[test]
    fn empty_pipeline_still_attaches_raw() {
        let flat = Pipeline::new().apply(&Record::new()).expect("apply pipeline");

        assert_eq!(flat.len(), 1);
        assert_eq!(flat.raw(), Some("{}"));
    }

    #[test]
    fn steps_run_in_append_order() {
        let names: Vec<_> = Pipeline::new().flatten().step_names().collect();
        assert_eq!(names, vec!["flatten"]);
    }
}
