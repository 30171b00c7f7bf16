//! The [`Record`] trait shared by every resource model, and the JSON
//! merge used to rebuild a full backend document from a partial edit.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{InsertPosition, RecordId, Resource};
use crate::error::ClientError;

/// One item of a remote resource collection.
///
/// Implementors describe which of their fields take part in the
/// filter-sort view. Every accessor returns borrowed data so deriving a
/// view never allocates per field.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection this record belongs to.
    const RESOURCE: Resource;

    /// Where a newly created record is placed in the local collection.
    const INSERT_AT: InsertPosition = InsertPosition::Prepend;

    /// Backend identifier.
    fn id(&self) -> &RecordId;

    /// Values matched by the free-text search. Absent fields are skipped.
    fn search_fields(&self) -> Vec<&str>;

    /// Value matched by the categorical filter (usually a status).
    fn category(&self) -> Option<&str> {
        None
    }

    /// Raw date string used by the date-range filter and the date sort.
    fn date(&self) -> Option<&str> {
        None
    }

    /// Numeric value used by the amount sort.
    fn amount(&self) -> Option<f64> {
        None
    }
}

/// A decoded record paired with the backend document it was decoded from.
///
/// Edits are merged into `document` rather than into a re-serialization of
/// `record`, so values the model normalizes on the way in (string
/// decimals, explicit nulls) go back to the backend untouched.
#[derive(Debug, Clone)]
pub struct Fetched<R> {
    /// Typed view used by the filter-sort view and by callers.
    pub record: R,
    /// Backend document exactly as received.
    pub document: Value,
}

impl<R: Record> Fetched<R> {
    /// Decodes `document` into `R`, keeping the document alongside.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if the document does not fit `R`.
    pub fn decode(document: Value) -> Result<Self, ClientError> {
        let record = serde_json::from_value(document.clone())?;
        Ok(Self { record, document })
    }
}

/// Applies `patch` on top of `target` following JSON merge-patch rules.
///
/// Objects merge key by key and recursively, a `null` in the patch removes
/// the key, and any other value replaces the target wholesale.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Value::Object(target_map) = target else {
        return;
    };
    for (key, value) in patch_map {
        if value.is_null() {
            target_map.remove(key);
        } else {
            merge_patch(
                target_map.entry(key.clone()).or_insert(Value::Null),
                value,
            );
        }
    }
}
