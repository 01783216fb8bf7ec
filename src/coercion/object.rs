use super::any::coerce_all;
use super::{absent_or_null, looks_like_json, parse_json, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;

/// `object` arguments
///
/// Nested text from bracketed query keys is typed the same way `any` types it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectConverter;

impl TypeConverter for ObjectConverter {
    fn name(&self) -> &'static str {
        "object"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        if let Value::String(text) = &value {
            if looks_like_json(&value) {
                let parsed = parse_json(text)?;
                return self.from_typed_value(parsed, options);
            }
        }
        let value = match value {
            Value::Object(_) | Value::Array(_) => coerce_all(value),
            other => other,
        };
        self.from_typed_value(value, options)
    }

    fn validate(&self, value: &Value, options: &ConvertOptions) -> Option<CoercionError> {
        match value {
            Value::Undefined | Value::Null | Value::Object(_) => None,
            Value::Array(_) if options.allow_array => None,
            _ => Some(CoercionError::new("Value is not an object.")),
        }
    }
}
