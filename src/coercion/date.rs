use super::{absent_or_null, parse_number, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

fn invalid_date() -> CoercionError {
    CoercionError::new("Value is not a valid date.")
}

/// RFC 3339, zone-less ISO date-time (taken as UTC) or a plain `YYYY-MM-DD`
fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(dt) => Some(*dt),
        Value::String(text) => parse_date_text(text),
        // Epoch milliseconds
        Value::Number(ms) if ms.is_finite() && ms.fract() == 0.0 => {
            DateTime::from_timestamp_millis(*ms as i64)
        }
        _ => None,
    }
}

/// `date` arguments, coerced to [`Value::Date`]
#[derive(Debug, Default, Clone, Copy)]
pub struct DateConverter;

impl TypeConverter for DateConverter {
    fn name(&self) -> &'static str {
        "date"
    }

    fn from_typed_value(&self, value: Value, _options: &ConvertOptions) -> CoercedValue {
        if value.is_nullish() {
            return Ok(value);
        }
        to_date(&value).map(Value::Date).ok_or_else(invalid_date)
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        let value = match value {
            Value::String(text) => match parse_number(&text) {
                Some(ms) => Value::Number(ms),
                None => Value::String(text),
            },
            other => other,
        };
        self.from_typed_value(value, options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        if value.is_nullish() || to_date(value).is_some() {
            return None;
        }
        Some(invalid_date())
    }
}
