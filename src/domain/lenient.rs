//! Tolerant field decoders used by the resource models.
//!
//! Decimal columns arrive as JSON numbers from some endpoints and as
//! strings (`"150.00"`) from others; blank strings mean "no value".

use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;
use serde_json::Value;

/// Decodes an optional amount from a number, a numeric string, a blank
/// string or `null`.
///
/// # Errors
///
/// Fails on booleans, arrays, objects and non-numeric strings.
pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a decimal number"))
        }
        Some(other) => Err(de::Error::invalid_type(
            unexpected(&other),
            &"a number or a numeric string",
        )),
    }
}

/// Decodes an optional count from a non-negative integer or its string form.
///
/// # Errors
///
/// Fails on negative or fractional values and non-numeric strings.
pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid quantity: {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a whole number")),
        Some(other) => Err(de::Error::invalid_type(
            unexpected(&other),
            &"an integer or a numeric string",
        )),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
        _ => Unexpected::Other("value"),
    }
}
