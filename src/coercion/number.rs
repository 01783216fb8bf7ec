use super::{absent_or_null, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

/// Largest integer an `f64` represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("number regex should be valid")
});

/// Parse decimal or scientific-notation text.
///
/// Unlike `str::parse::<f64>` this rejects `inf`, `NaN` and friends, and surrounding
/// whitespace is ignored.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if !NUMBER_REGEX.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Generic numeric check shared by every converter that embeds numbers.
///
/// Rejects anything but a finite number, including `Null`, booleans and numeric-looking text.
pub(crate) fn check_number(value: &Value) -> Option<CoercionError> {
    match value {
        Value::Number(n) if n.is_finite() => None,
        _ => Some(CoercionError::new("Value is not a number.")),
    }
}

fn sloppy_number(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        other => other,
    }
}

/// `number` arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberConverter;

impl TypeConverter for NumberConverter {
    fn name(&self) -> &'static str {
        "number"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        self.from_typed_value(sloppy_number(value), options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        if value.is_nullish() {
            return None;
        }
        check_number(value)
    }
}

/// `integer` arguments: numbers without a fractional part, within the safe range
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerConverter;

impl TypeConverter for IntegerConverter {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        self.from_typed_value(sloppy_number(value), options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        if value.is_nullish() {
            return None;
        }
        if let Some(err) = check_number(value) {
            return Some(err);
        }
        match value {
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => None,
            _ => Some(CoercionError::new("Value is not a safe integer.")),
        }
    }
}
