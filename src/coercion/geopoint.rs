//! `geopoint` arguments: a latitude/longitude pair.
//!
//! Accepted encodings for an argument named `arg`:
//!
//! | Wire form | Example |
//! |---|---|
//! | nested query keys | `arg[lat]=2.5&arg[lng]=3` |
//! | Google-API pair | `arg=2.5,3` |
//! | JSON text | `arg={"lat":2.0,"lng":3.0}` or `arg=[1,2]` |
//! | JSON body | `{"lat":2.5,"lng":3.2}` or `[2.5,3.2]` |
//!
//! Every successful coercion of a non-empty point yields `{ "lat": n, "lng": n }`.
//! `{}` and `[]` coerce to `{}` so an optional argument can be sent "present but empty";
//! [`GeoPointConverter::satisfies_required`] rejects that for required arguments.

use super::number::{check_number, parse_number};
use super::{
    absent_or_null, coerce_numeric_string, looks_like_json, parse_json, CoercedValue,
    ConvertOptions, TypeConverter,
};
use crate::error::CoercionError;
use crate::value::{object, Object, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;
pub const LNG_MIN: f64 = -180.0;
pub const LNG_MAX: f64 = 180.0;

static COMMA_DELIMITED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("comma regex should be valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Lat,
    Lng,
}

impl Axis {
    fn key(self) -> &'static str {
        match self {
            Axis::Lat => "lat",
            Axis::Lng => "lng",
        }
    }

    fn bounds(self) -> (f64, f64) {
        match self {
            Axis::Lat => (LAT_MIN, LAT_MAX),
            Axis::Lng => (LNG_MIN, LNG_MAX),
        }
    }
}

/// Typed view of a coerced geopoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoercionError> {
        if let Some(err) = validate_pair(&Value::Number(lat), &Value::Number(lng)) {
            return Err(err);
        }
        Ok(GeoPoint { lat, lng })
    }
}

impl From<GeoPoint> for Value {
    fn from(point: GeoPoint) -> Self {
        object([("lat", Value::Number(point.lat)), ("lng", Value::Number(point.lng))])
    }
}

impl TryFrom<&Value> for GeoPoint {
    type Error = CoercionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value
            .as_object()
            .ok_or_else(|| CoercionError::new("Value is not a valid geopoint"))?;
        if let Some(err) = validate_object(map) {
            return Err(err);
        }
        match (map.get("lat"), map.get("lng")) {
            (Some(Value::Number(lat)), Some(Value::Number(lng))) => Ok(GeoPoint {
                lat: *lat,
                lng: *lng,
            }),
            _ => Err(CoercionError::new("Value is not a valid geopoint")),
        }
    }
}

/// Converter for `geopoint` arguments
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoPointConverter;

impl TypeConverter for GeoPointConverter {
    fn name(&self) -> &'static str {
        "geopoint"
    }

    fn from_typed_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(err) = self.validate(&value, options) {
            return Err(err);
        }
        Ok(normalize(value))
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

        // Nested values from `?arg[lat]=2&arg[lng]=3` or `?arg[0]=2&arg[1]=3` arrive as text
        let value = match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, coerce_numeric_string(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(coerce_numeric_string).collect())
            }
            other => other,
        };
        self.from_typed_value(value, options)
    }

    fn validate(&self, value: &Value, _options: &ConvertOptions) -> Option<CoercionError> {
        if value.is_nullish() || value.is_empty_container() {
            return None;
        }
        match value {
            // "lat,lng"
            Value::String(text) if COMMA_DELIMITED_REGEX.is_match(text) => {
                let tokens = split_pair(text);
                if tokens.len() != 2 {
                    return Some(CoercionError::new(
                        "Value is not of correct \"lat,lng\" format",
                    ));
                }
                validate_pair(&tokens[0], &tokens[1])
            }
            // [lat, lng]
            Value::Array(items) => {
                if items.len() != 2 {
                    return Some(CoercionError::new(
                        "Value is not of correct [lat,lng] format",
                    ));
                }
                validate_pair(&items[0], &items[1])
            }
            // {lat: x, lng: y}
            Value::Object(map) => validate_object(map),
            _ => Some(CoercionError::new("Value is not a valid geopoint")),
        }
    }

    fn satisfies_required(&self, value: &Value) -> bool {
        !value.is_nullish() && !value.is_empty_container()
    }
}

/// Split `"lat,lng"` text, turning numeric tokens into numbers
fn split_pair(text: &str) -> Vec<Value> {
    COMMA_DELIMITED_REGEX
        .split(text)
        .map(|token| match parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::String(token.to_string()),
        })
        .collect()
}

fn validate_object(map: &Object) -> Option<CoercionError> {
    for axis in [Axis::Lat, Axis::Lng] {
        if !map.contains_key(axis.key()) {
            return Some(CoercionError::new(format!(
                "Missing \"{}\" from geopoint object",
                axis.key()
            )));
        }
    }
    validate_pair(&map[Axis::Lat.key()], &map[Axis::Lng.key()])
}

/// Latitude is checked first; the first failure wins
fn validate_pair(lat: &Value, lng: &Value) -> Option<CoercionError> {
    validate_component(lat, Axis::Lat).or_else(|| validate_component(lng, Axis::Lng))
}

fn validate_component(value: &Value, axis: Axis) -> Option<CoercionError> {
    if let Some(err) = check_number(value) {
        return Some(err.with_prefix(axis.key()));
    }
    let (min, max) = axis.bounds();
    match value {
        Value::Number(n) if (min..=max).contains(n) => None,
        _ => Some(CoercionError::new(format!(
            "Value {value} of \"{}\" is out of range ({min} to {max})",
            axis.key()
        ))),
    }
}

/// Canonical shape of a validated value
fn normalize(value: Value) -> Value {
    match value {
        Value::Array(items) if items.is_empty() => Value::Object(Object::new()),
        Value::Array(mut items) if items.len() == 2 => {
            let lng = items.pop().unwrap_or_default();
            let lat = items.pop().unwrap_or_default();
            object([("lat", lat), ("lng", lng)])
        }
        Value::String(text) if COMMA_DELIMITED_REGEX.is_match(&text) => {
            let mut tokens = split_pair(&text).into_iter();
            let lat = tokens.next().unwrap_or_default();
            let lng = tokens.next().unwrap_or_default();
            object([("lat", lat), ("lng", lng)])
        }
        other => other,
    }
}
