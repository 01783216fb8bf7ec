use super::{absent_or_null, looks_like_json, parse_json, parse_number, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;

/// Best-effort typing of query-string text: numbers, booleans and `null`
pub(crate) fn coerce_scalar_text(text: String) -> Value {
    if let Some(n) = parse_number(&text) {
        return Value::Number(n);
    }
    match text.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(text),
    }
}

/// Apply [`coerce_scalar_text`] to every string nested in objects and arrays
pub(crate) fn coerce_all(value: Value) -> Value {
    match value {
        Value::String(text) => coerce_scalar_text(text),
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_all).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, coerce_all(v))).collect()),
        other => other,
    }
}

/// `any` arguments: no validation, best-effort typing of text
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyConverter;

impl TypeConverter for AnyConverter {
    fn name(&self) -> &'static str {
        "any"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        if let Value::String(text) = &value {
            if looks_like_json(&value) {
                // Text that merely looks like JSON stays text
                if let Ok(parsed) = parse_json(text) {
                    return self.from_typed_value(parsed, options);
                }
                return self.from_typed_value(value, options);
            }
        }
        self.from_typed_value(coerce_all(value), options)
    }

    fn validate(&self, _value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_types_text() {
        let opts = ConvertOptions::default();
        assert_eq!(AnyConverter.from_sloppy_value(Value::from("12"), &opts), Ok(Value::Number(12.0)));
        assert_eq!(AnyConverter.from_sloppy_value(Value::from("true"), &opts), Ok(Value::Bool(true)));
        assert_eq!(AnyConverter.from_sloppy_value(Value::from("{bad}"), &opts), Ok(Value::from("{bad}")));
        assert_eq!(AnyConverter.from_sloppy_value(Value::from("text"), &opts), Ok(Value::from("text")));
    }
}
