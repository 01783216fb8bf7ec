//! # Coercion Module
//!
//! Turns loosely-typed wire values into the canonical shape of a declared argument type.
//!
//! ## Overview
//!
//! Each declared type has one [`TypeConverter`]. A converter exposes three pure operations:
//!
//! - [`TypeConverter::from_typed_value`] - the value is already in the converter's native
//!   shape (e.g. it came from a JSON body), so only normalization and validation run
//! - [`TypeConverter::from_sloppy_value`] - the value came from a textual source such as a
//!   query string and may use any of several encodings; the converter detects the encoding,
//!   normalizes it and then delegates to `from_typed_value`
//! - [`TypeConverter::validate`] - the shared predicate both entry points end with
//!
//! Converters never panic on bad input. Every failure is a [`CoercionError`] (HTTP 400).
//!
//! ## Absent and Null
//!
//! For sloppy input, `Undefined` and `""` both mean "not sent" and coerce to
//! `Ok(Value::Undefined)`; `Null` and `"null"` coerce to `Ok(Value::Null)`. Whether an absent
//! value is acceptable is decided by the binding layer, not by the converter.
//!
//! ## Example
//!
//! ```rust
//! use brrtremoting::coercion::{CoercionRegistry, ConvertOptions, TypeTag};
//! use brrtremoting::Value;
//!
//! let registry = CoercionRegistry::with_builtin();
//! let geopoint = registry.resolve(&TypeTag::GeoPoint).unwrap();
//! let point = geopoint
//!     .from_sloppy_value(Value::from("2.5,3"), &ConvertOptions::default())
//!     .unwrap();
//! assert_eq!(point.get("lat"), Some(&Value::Number(2.5)));
//! ```

mod any;
mod array;
mod boolean;
mod buffer;
mod date;
mod geopoint;
mod json;
mod number;
mod object;
mod registry;
mod string;

pub use any::AnyConverter;
pub use array::ArrayConverter;
pub use boolean::BooleanConverter;
pub use buffer::BufferConverter;
pub use date::DateConverter;
pub use geopoint::{GeoPoint, GeoPointConverter};
pub use json::{looks_like_json, looks_like_json_array, looks_like_json_object, parse_json};
pub use number::{parse_number, IntegerConverter, NumberConverter};
pub use object::ObjectConverter;
pub use registry::{CoercionRegistry, TypeTag};
pub use string::StringConverter;

use crate::error::CoercionError;
use crate::value::Value;
use std::fmt;

/// Outcome of one coercion: the normalized value, or why it was rejected
pub type CoercedValue = Result<Value, CoercionError>;

/// Per-argument knobs passed to every converter operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Let the `object` converter accept arrays as well
    pub allow_array: bool,
}

/// Converter for one declared argument type.
///
/// Implementations are stateless and shared between concurrent calls.
pub trait TypeConverter: Send + Sync + fmt::Debug {
    /// Type name used in log fields and error context
    fn name(&self) -> &'static str;

    /// Normalize and validate a value that is already in native shape
    fn from_typed_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        match self.validate(&value, options) {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// Detect the wire encoding of `value`, normalize it, then validate
    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue;

    /// Check a value without transforming it
    fn validate(&self, value: &Value, options: &ConvertOptions) -> Option<CoercionError>;

    /// Whether a coerced value counts as "present" for a required argument
    fn satisfies_required(&self, value: &Value) -> bool {
        !value.is_nullish()
    }
}

/// Shared sloppy-value prelude: `Undefined`/`""` are absent, `Null`/`"null"` are null.
///
/// Returns `None` when the value carries actual content.
pub(crate) fn absent_or_null(value: &Value) -> Option<Value> {
    match value {
        Value::Undefined => Some(Value::Undefined),
        Value::Null => Some(Value::Null),
        Value::String(s) if s.is_empty() => Some(Value::Undefined),
        Value::String(s) if s == "null" => Some(Value::Null),
        _ => None,
    }
}

/// Coerce a scalar string the way nested query-string values are coerced:
/// numeric text becomes a number, everything else (including `"true"`) is kept.
pub(crate) fn coerce_numeric_string(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_null_prelude() {
        assert_eq!(absent_or_null(&Value::Undefined), Some(Value::Undefined));
        assert_eq!(absent_or_null(&Value::from("")), Some(Value::Undefined));
        assert_eq!(absent_or_null(&Value::from("null")), Some(Value::Null));
        assert_eq!(absent_or_null(&Value::Null), Some(Value::Null));
        assert_eq!(absent_or_null(&Value::from("0")), None);
    }

    #[test]
    fn test_coerce_numeric_string_leaves_booleans() {
        assert_eq!(coerce_numeric_string(Value::from("2.5")), Value::Number(2.5));
        assert_eq!(coerce_numeric_string(Value::from("true")), Value::from("true"));
        assert_eq!(coerce_numeric_string(Value::from("text")), Value::from("text"));
    }
}
