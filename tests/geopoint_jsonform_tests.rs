//! Geopoint arguments sent as a field of a JSON body: `{"arg": ...}`

mod common;

use brrtremoting::method::ArgSource;
use brrtremoting::server::RestRequest;
use common::{call, check, geopoint_invoker, Expect};
use serde_json::json;

fn verify(required: bool, cases: Vec<(serde_json::Value, Expect)>) {
    for source in [ArgSource::Auto, ArgSource::Form] {
        let invoker = geopoint_invoker("arg", required, source);
        for (body, expect) in &cases {
            let req = RestRequest::default().json_body(body.clone());
            check(&format!("json form {body} ({source})"), call(&invoker, &req), expect);
        }
    }
}

fn point(lat: f64, lng: f64) -> Expect {
    Expect::Json(json!({ "lat": lat, "lng": lng }))
}

#[test]
fn test_required_geopoint_field() {
    verify(
        true,
        vec![
            (json!({ "arg": { "lat": 2.5, "lng": 3.2 } }), point(2.5, 3.2)),
            (json!({ "arg": [2.5, 3.2] }), point(2.5, 3.2)),
            (json!({}), Expect::BadRequest),
            (json!({ "arg": null }), Expect::BadRequest),
            (json!({ "arg": "" }), Expect::BadRequest),
            (json!({ "arg": {} }), Expect::BadRequest),
            (json!({ "arg": [] }), Expect::BadRequest),
        ],
    );
}

#[test]
fn test_optional_geopoint_field() {
    verify(
        false,
        vec![
            // empty values
            (json!({}), Expect::Undefined),
            (json!({ "arg": null }), Expect::Json(json!(null))),
            (json!({ "arg": {} }), Expect::Json(json!({}))),
            (json!({ "arg": [] }), Expect::Json(json!({}))),
            // valid values
            (json!({ "arg": { "lat": 0, "lng": 3.2 } }), point(0.0, 3.2)),
            (json!({ "arg": { "lat": -1, "lng": 3.2 } }), point(-1.0, 3.2)),
            (json!({ "arg": { "lat": 1, "lng": 3.2 } }), point(1.0, 3.2)),
            (json!({ "arg": { "lat": 2.5, "lng": 0 } }), point(2.5, 0.0)),
            (json!({ "arg": { "lat": 2.5, "lng": -1 } }), point(2.5, -1.0)),
            (json!({ "arg": { "lat": 1.234e+1, "lng": -1.234e+1 } }), point(12.34, -12.34)),
        ],
    );
}

#[test]
fn test_optional_geopoint_field_invalid_values() {
    let cases = [
        json!({ "arg": { "lat": 2.5 } }),
        json!({ "arg": { "lng": 3.2 } }),
        json!({ "arg": [2.5] }),
        json!({ "arg": { "lat": null, "lng": 3.2 } }),
        json!({ "arg": { "lat": 2.5, "lng": null } }),
        json!({ "arg": { "lat": -91, "lng": 3.2 } }),
        json!({ "arg": { "lat": 90.521, "lng": 3.2 } }),
        json!({ "arg": { "lat": 2.5, "lng": -181 } }),
        json!({ "arg": { "lat": 2.5, "lng": 180.45 } }),
        json!({ "arg": { "lat": "text", "lng": 3.2 } }),
        json!({ "arg": { "lat": 2.5, "lng": "text" } }),
        json!({ "arg": { "lat": "", "lng": 3.2 } }),
        json!({ "arg": { "lat": "1.234e+1", "lng": 3.2 } }),
        json!({ "arg": { "lat": true, "lng": 3.2 } }),
        json!({ "arg": { "lat": -9.5, "lng": false } }),
        json!({ "arg": [2, 3, 5] }),
        json!({ "arg": [{}, {}] }),
    ];
    verify(
        false,
        cases.into_iter().map(|body| (body, Expect::BadRequest)).collect(),
    );
}
