//! # Wire Value Model
//!
//! Every converter receives a [`Value`]: the already-parsed, loosely-typed shape a transport
//! hands over (query-string parser, JSON body parser, socket message decoder).
//!
//! `Value` mirrors JSON with two additions that matter for argument binding:
//!
//! - [`Value::Undefined`] marks an argument that was not sent at all. It is distinct from
//!   [`Value::Null`], which the client sent explicitly.
//! - Numbers are `f64` and may be non-finite, so a `NaN` that slipped through a transport can
//!   still be rejected by validation instead of being silently dropped.
//!
//! Converters may also produce [`Value::Date`] and [`Value::Buffer`]; transports never do.

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Keyed object value
pub type Object = BTreeMap<String, Value>;

/// A loosely-typed value as delivered by a transport, or as produced by a converter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Not sent at all
    #[default]
    Undefined,
    /// Explicitly empty
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    /// Produced by the `date` converter
    Date(DateTime<Utc>),
    /// Produced by the `buffer` converter
    Buffer(Vec<u8>),
}

/// Finite, without fraction, and exactly representable as an integer
fn is_safe_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0
}

impl Value {
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Undefined` or `Null`
    #[inline]
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// An object without keys or an array without items
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is an object
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in log fields
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Date(_) => "date",
            Value::Buffer(_) => "buffer",
        }
    }

    /// Convert to a `serde_json::Value` for the wire.
    ///
    /// `Undefined` and non-finite numbers become `null`, object entries holding `Undefined`
    /// are dropped, dates become RFC 3339 strings and buffers become base64 strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) if is_safe_integral(*n) => Json::Number((*n as i64).into()),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Date(dt) => Json::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Buffer(bytes) => {
                Json::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Integral values go out as integers so `3` does not become `3.0`
            Value::Number(n) if is_safe_integral(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let present = map.iter().filter(|(_, v)| !v.is_undefined());
                let mut out = serializer.serialize_map(None)?;
                for (k, v) in present {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Date(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Buffer(bytes) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            other => {
                let text = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                write!(f, "{text}")
            }
        }
    }
}

/// Build a [`Value::Object`] from `(key, value)` pairs
#[must_use]
pub fn object<K, I>(pairs: I) -> Value
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_null_distinct_from_undefined() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_ne!(Value::from(json!(null)), Value::Undefined);
        assert!(Value::Undefined.is_nullish());
    }

    #[test]
    fn test_to_json_drops_undefined_fields() {
        let v = object([("a", Value::Number(1.0)), ("b", Value::Undefined)]);
        assert_eq!(v.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_serialize_integral_numbers_as_integers() {
        let v = object([("lat", Value::Number(2.5)), ("lng", Value::Number(3.0))]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"lat":2.5,"lng":3}"#);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        assert_eq!(serde_json::to_string(&Value::Number(f64::NAN)).unwrap(), "null");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }
}
