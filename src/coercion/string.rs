use super::{absent_or_null, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;

/// `string` arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct StringConverter;

impl TypeConverter for StringConverter {
    fn name(&self) -> &'static str {
        "string"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        let value = match value {
            Value::Number(_) | Value::Bool(_) => Value::String(value.to_string()),
            other => other,
        };
        self.from_typed_value(value, options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        match value {
            Value::Undefined | Value::Null | Value::String(_) => None,
            _ => Some(CoercionError::new("Value is not a string.")),
        }
    }
}
