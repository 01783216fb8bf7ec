//! Detection and parsing of JSON embedded in textual wire values (`?arg={"a":1}`).

use super::CoercedValue;
use crate::error::CoercionError;
use crate::value::Value;
use tracing::debug;

/// `{...}` text
#[must_use]
pub fn looks_like_json_object(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with('{') && s.ends_with('}'))
}

/// `[...]` text
#[must_use]
pub fn looks_like_json_array(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with('[') && s.ends_with(']'))
}

/// String that should be parsed as JSON before coercion
#[must_use]
pub fn looks_like_json(value: &Value) -> bool {
    looks_like_json_object(value) || looks_like_json_array(value)
}

/// Parse JSON text into a [`Value`].
///
/// A parse failure is a client error, so the result is a 400 `CoercionError`.
pub fn parse_json(text: &str) -> CoercedValue {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(parsed) => {
            debug!(input = %text, "Parsed JSON-encoded argument value");
            Ok(Value::from(parsed))
        }
        Err(err) => {
            debug!(input = %text, error = %err, "Cannot parse JSON-encoded argument value");
            Err(CoercionError::new("Cannot parse JSON-encoded object value."))
        }
    }
}
