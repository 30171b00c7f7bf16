//! Type-safe record identifier.
//!
//! Backends disagree on whether `id` is a JSON number or a JSON string.
//! [`RecordId`] accepts both on the way in and keeps the textual form, so
//! identifiers compare equal no matter how a given endpoint encodes them.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a record in a remote collection.
///
/// Serializes back as a JSON number when the identifier is purely
/// numeric, and as a string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an identifier from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice, ready for URL paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value when the identifier is an unsigned integer
    /// in canonical form (no sign, no leading zeros).
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

struct RecordIdVisitor;

impl Visitor<'_> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty string or an integer identifier")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RecordId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(RecordId::from(v))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let Ok(from_number) = serde_json::from_str::<RecordId>("17") else {
            panic!("numeric id should decode");
        };
        let Ok(from_string) = serde_json::from_str::<RecordId>("\"17\"") else {
            panic!("string id should decode");
        };
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn numeric_id_serializes_as_number() {
        let json = serde_json::to_string(&RecordId::from(5_u64)).ok();
        assert_eq!(json.as_deref(), Some("5"));
    }

    #[test]
    fn opaque_id_serializes_as_string() {
        let json = serde_json::to_string(&RecordId::from("64f1c0ffee")).ok();
        assert_eq!(json.as_deref(), Some("\"64f1c0ffee\""));
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(serde_json::from_str::<RecordId>("\"\"").is_err());
    }

    #[test]
    fn null_is_rejected() {
        assert!(serde_json::from_str::<RecordId>("null").is_err());
    }
}
