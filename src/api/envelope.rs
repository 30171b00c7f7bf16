//! Response body normalization.
//!
//! List endpoints answer either with a bare array or with an object that
//! carries the array under `data`, `results` or `items`. Single-record
//! endpoints may wrap the record under `data`. Both shapes are resolved
//! here, once, before anything reaches the typed models.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Fetched, Record};
use crate::error::ClientError;

const LIST_KEYS: [&str; 3] = ["data", "results", "items"];

/// Extracts the record array from a list response.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if the body is neither an array nor an
/// object carrying one under a known key.
pub fn unwrap_list(body: Value) -> Result<Vec<Value>, ClientError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                ClientError::Decode(format!(
                    "expected a list or an object with one of {LIST_KEYS:?}"
                ))
            }),
        other => Err(ClientError::Decode(format!(
            "expected a list, got {}",
            kind(&other)
        ))),
    }
}

/// Extracts a single record from a response, unwrapping a `data` envelope
/// when the top-level object has no `id` of its own.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if the body is not an object.
pub fn unwrap_record(body: Value) -> Result<Value, ClientError> {
    match body {
        Value::Object(mut map) => {
            if !map.contains_key("id") && matches!(map.get("data"), Some(Value::Object(_))) {
                if let Some(inner) = map.remove("data") {
                    return Ok(inner);
                }
            }
            Ok(Value::Object(map))
        }
        other => Err(ClientError::Decode(format!(
            "expected a record object, got {}",
            kind(&other)
        ))),
    }
}

/// Decodes every element of a list, keeping each element's document and
/// reporting the first failing index.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] naming the element that failed.
pub fn decode_list<R: Record>(items: Vec<Value>) -> Result<Vec<Fetched<R>>, ClientError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, document)| match R::deserialize(&document) {
            Ok(record) => Ok(Fetched { record, document }),
            Err(e) => Err(ClientError::Decode(format!("record #{index}: {e}"))),
        })
        .collect()
}

/// Pulls a human-readable message out of an error response body.
///
/// Recognized shapes: `{"error": {"message": ..}}`, `{"message": ..}`,
/// `{"detail": ..}` and `{"error": ".."}`.
#[must_use]
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("message"),
        value.get("detail"),
        value.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
        .filter(|msg| !msg.trim().is_empty())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_and_wrapped_lists() {
        assert_eq!(unwrap_list(json!([1, 2])).ok().map(|v| v.len()), Some(2));
        assert_eq!(
            unwrap_list(json!({ "results": [1], "count": 1 }))
                .ok()
                .map(|v| v.len()),
            Some(1)
        );
        assert_eq!(
            unwrap_list(json!({ "data": [], "page": 1 }))
                .ok()
                .map(|v| v.len()),
            Some(0)
        );
    }

    #[test]
    fn unexpected_list_shapes_are_decode_errors() {
        assert!(matches!(
            unwrap_list(json!({ "total": 3 })),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            unwrap_list(json!("ok")),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            unwrap_list(json!({ "data": "nope" })),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn record_envelope_only_unwrapped_without_id() {
        assert_eq!(
            unwrap_record(json!({ "data": { "id": 1 } })).ok(),
            Some(json!({ "id": 1 }))
        );
        let own = json!({ "id": 2, "data": { "id": 9 } });
        assert_eq!(unwrap_record(own.clone()).ok(), Some(own));
        assert!(unwrap_record(json!([])).is_err());
    }

    #[test]
    fn decode_list_names_failing_index() {
        let result = decode_list::<crate::domain::Client>(vec![json!({ "id": 1 }), json!({})]);
        let Err(ClientError::Decode(msg)) = result else {
            panic!("second record has no id");
        };
        assert!(msg.contains("#1"));
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(
            error_message(br#"{"error":{"code":2001,"message":"record 4 not found"}}"#),
            Some("record 4 not found".to_string())
        );
        assert_eq!(
            error_message(br#"{"detail":"Token invalido"}"#),
            Some("Token invalido".to_string())
        );
        assert_eq!(error_message(br#"{"error":"boom"}"#), Some("boom".to_string()));
        assert_eq!(error_message(b"<html>502</html>"), None);
    }
}
