use super::{absent_or_null, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;

/// `boolean` arguments
///
/// Sloppy text accepts `true`/`false` in any case plus `1`/`0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanConverter;

impl TypeConverter for BooleanConverter {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        let value = match value {
            Value::String(text) => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => Value::String(text),
            },
            other => other,
        };
        self.from_typed_value(value, options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        match value {
            Value::Undefined | Value::Null | Value::Bool(_) => None,
            _ => Some(CoercionError::new("Value is not a boolean.")),
        }
    }
}
