//! Geopoint arguments that are the whole JSON request body
//!
//! JSON bodies are already typed, so only `{lat, lng}` objects and `[lat, lng]` arrays of real
//! numbers are accepted. Numeric-looking strings are rejected here even though the same text
//! is fine in a query string.

mod common;

use brrtremoting::method::ArgSource;
use brrtremoting::server::{RestBody, RestRequest};
use brrtremoting::value::object;
use brrtremoting::Value;
use common::{call, check, geopoint_invoker, Expect};
use serde_json::json;

fn body(value: impl Into<Value>) -> RestRequest {
    RestRequest {
        body: RestBody::Json(value.into()),
        ..RestRequest::default()
    }
}

fn verify(required: bool, cases: Vec<(RestRequest, Expect)>) {
    let invoker = geopoint_invoker("anyname", required, ArgSource::Body);
    for (req, expect) in cases {
        let label = format!("json body {:?}", req.body);
        check(&label, call(&invoker, &req), &expect);
    }
}

fn ok(value: serde_json::Value) -> (RestRequest, Expect) {
    (body(value.clone()), Expect::Json(json!({ "lat": value[0], "lng": value[1] })))
}

fn same(value: serde_json::Value) -> (RestRequest, Expect) {
    (body(value.clone()), Expect::Json(value))
}

fn bad(value: serde_json::Value) -> (RestRequest, Expect) {
    (body(value), Expect::BadRequest)
}

#[test]
fn test_required_geopoint_body() {
    verify(
        true,
        vec![
            same(json!({ "lat": 2.5, "lng": 3.2 })),
            // arrays are allowed
            ok(json!([2.5, 3.2])),
            bad(json!(null)),
            (RestRequest::default(), Expect::BadRequest),
            bad(json!({})),
            bad(json!([])),
        ],
    );
}

#[test]
fn test_optional_geopoint_body_empty_values() {
    verify(
        false,
        vec![
            (RestRequest::default(), Expect::Undefined),
            same(json!(null)),
            same(json!({})),
            (body(json!([])), Expect::Json(json!({}))),
        ],
    );
}

#[test]
fn test_optional_geopoint_body_valid_values() {
    verify(
        false,
        vec![
            same(json!({ "lat": 0, "lng": 3.2 })),
            same(json!({ "lat": -1, "lng": 3.2 })),
            same(json!({ "lat": 1, "lng": 3.2 })),
            same(json!({ "lat": 2.5, "lng": 0 })),
            same(json!({ "lat": 2.5, "lng": -1 })),
            same(json!({ "lat": 1.234e+1, "lng": -1.234e+1 })),
        ],
    );
}

#[test]
fn test_optional_geopoint_body_invalid_values() {
    let nan = object([("lat", Value::Number(f64::NAN)), ("lng", Value::Number(3.2))]);
    let undefined_lat = object([("lat", Value::Undefined), ("lng", Value::Number(3.2))]);
    verify(
        false,
        vec![
            // missing values
            bad(json!({ "lat": 2.5 })),
            bad(json!({ "lng": 3.2 })),
            bad(json!([2.5])),
            // empty components
            bad(json!({ "lat": null, "lng": 3.2 })),
            bad(json!({ "lat": 2.5, "lng": null })),
            (body(undefined_lat), Expect::BadRequest),
            (body(nan), Expect::BadRequest),
            // out of range
            bad(json!({ "lat": -91, "lng": 3.2 })),
            bad(json!({ "lat": 90.521, "lng": 3.2 })),
            bad(json!({ "lat": 2.5, "lng": -181 })),
            bad(json!({ "lat": 2.5, "lng": 180.45 })),
            // strings are not numbers in a typed body
            bad(json!({ "lat": "text", "lng": 3.2 })),
            bad(json!({ "lat": 2.5, "lng": "text" })),
            bad(json!({ "lat": "", "lng": 3.2 })),
            bad(json!({ "lat": "1.234e+1", "lng": 3.2 })),
            // booleans
            bad(json!({ "lat": true, "lng": 3.2 })),
            bad(json!({ "lat": -9.5, "lng": false })),
            // arity
            bad(json!([2, 3, 5])),
            bad(json!([{}, {}])),
        ],
    );
}
