use super::{absent_or_null, parse_json, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;
use base64::Engine;

fn invalid_buffer() -> CoercionError {
    CoercionError::new("Value is not a valid buffer.")
}

fn to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Buffer(bytes) => Some(bytes.clone()),
        Value::String(text) => base64::engine::general_purpose::STANDARD.decode(text).ok(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(n) => Some(*n as u8),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// `buffer` arguments: base64 text or an array of octets, coerced to [`Value::Buffer`]
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferConverter;

impl TypeConverter for BufferConverter {
    fn name(&self) -> &'static str {
        "buffer"
    }

    fn from_typed_value(&self, value: Value, _options: &ConvertOptions) -> CoercedValue {
        if value.is_nullish() {
            return Ok(value);
        }
        to_bytes(&value).map(Value::Buffer).ok_or_else(invalid_buffer)
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        match value {
            Value::String(text) if text.starts_with('[') && text.ends_with(']') => {
                let parsed = parse_json(&text)?;
                self.from_typed_value(parsed, options)
            }
            other => self.from_typed_value(other, options),
        }
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        if value.is_nullish() || to_bytes(value).is_some() {
            return None;
        }
        Some(invalid_buffer())
    }
}
