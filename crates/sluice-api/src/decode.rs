//! Request body decoding with content-type dispatch.
//!
//! Maps an inbound body to a [`Record`] before the pipeline runs. JSON is
//! the default decoder for unknown or missing content types; form-encoded
//! bodies decode to string-valued records.

use serde_json::Value;
use sluice_core::Record;
use thiserror::Error;

/// Errors raised while decoding a request body.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body is not a valid form-urlencoded payload.
    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// The body decoded to something other than a key-value object.
    #[error("decoded body is not an object")]
    NotAnObject,
}

/// Decodes a request body into a nested record.
///
/// `application/x-www-form-urlencoded` bodies decode into a single-level
/// record of string values. Everything else, including a missing content
/// type, goes through the JSON decoder.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the body does not parse under the
/// selected decoder, or parses to a non-object value.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<Record, DecodeError> {
    if is_form_encoded(content_type) {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        return Ok(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect());
    }

    match serde_json::from_slice(body)? {
        Value::Object(entries) => Ok(entries),
        _ => Err(DecodeError::NotAnObject),
    }
}

fn is_form_encoded(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            ct.split(';').next().unwrap_or_default().trim().eq_ignore_ascii_case(
                "application/x-www-form-urlencoded",
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_body_decodes_to_nested_record() {
        let record = decode_body(Some("application/json"), br#"{"a": {"b": 1}}"#)
            .expect("JSON body decodes");

        assert_eq!(record.get("a"), Some(&json!({"b": 1})));
    }

    #[test]
    fn missing_content_type_defaults_to_json() {
        let record = decode_body(None, br#"{"event": "ping"}"#).expect("body decodes");
        assert_eq!(record.get("event"), Some(&json!("ping")));
    }

    #[test]
    fn unknown_content_type_defaults_to_json() {
        let record =
            decode_body(Some("text/plain"), br#"{"event": "ping"}"#).expect("body decodes");
        assert_eq!(record.get("event"), Some(&json!("ping")));
    }

    #[test]
    fn form_body_decodes_to_string_values() {
        let record = decode_body(
            Some("application/x-www-form-urlencoded"),
            b"event=ping&count=3",
        )
        .expect("form body decodes");

        assert_eq!(record.get("event"), Some(&json!("ping")));
        assert_eq!(record.get("count"), Some(&json!("3")));
    }

    #[test]
    fn form_content_type_with_charset_still_matches() {
        let record = decode_body(
            Some("application/x-www-form-urlencoded; charset=utf-8"),
            b"a=1",
        )
        .expect("form body decodes");

        assert_eq!(record.get("a"), Some(&json!("1")));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = decode_body(Some("application/json"), b"{not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let result = decode_body(Some("application/json"), b"[1, 2, 3]");
        assert!(matches!(result, Err(DecodeError::NotAnObject)));
    }
}
