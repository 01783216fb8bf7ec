//! Geopoint arguments sent URL-encoded, in the query string and as a form body
//!
//! Every case runs twice: once as `?query` (values read from the query string) and once as an
//! `application/x-www-form-urlencoded` body. Both are sloppy sources, so the geopoint
//! converter has to recognise nested keys, inline JSON, `lat,lng` pairs and bare arrays.

mod common;

use brrtremoting::method::ArgSource;
use brrtremoting::server::RestRequest;
use common::{call, check, encode_query, geopoint_invoker, Expect};
use serde_json::json;

fn verify(required: bool, cases: &[(&str, Expect)]) {
    let invoker = geopoint_invoker("arg", required, ArgSource::Auto);
    for (query, expect) in cases {
        let encoded = encode_query(query);

        let req = RestRequest::from_query(&encoded);
        check(&format!("query string {query:?}"), call(&invoker, &req), expect);

        let req = RestRequest::default().form_body(&encoded);
        check(&format!("form data {query:?}"), call(&invoker, &req), expect);
    }
}

fn point(lat: f64, lng: f64) -> Expect {
    Expect::Json(json!({ "lat": lat, "lng": lng }))
}

#[test]
fn test_required_geopoint() {
    verify(
        true,
        &[
            // nested keys
            ("arg[lat]=2.5&arg[lng]=3", point(2.5, 3.0)),
            // JSON encoding
            (r#"arg={"lat":2.0, "lng": 3.0}"#, point(2.0, 3.0)),
            // "lat,lng" pair
            ("arg=2.5,3", point(2.5, 3.0)),
            // [lat,lng] array
            ("arg=[1,2]", point(1.0, 2.0)),
            // empty values
            ("", Expect::BadRequest),
            ("arg", Expect::BadRequest),
            ("arg=", Expect::BadRequest),
            // empty-like values
            ("arg=null", Expect::BadRequest),
            ("arg=undefined", Expect::BadRequest),
            ("arg=[]", Expect::BadRequest),
            ("arg={}", Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=null", Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=undefined", Expect::BadRequest),
            ("arg[lat]=undefined&arg[lng]=4.4", Expect::BadRequest),
            ("arg[lat]=null&arg[lng]=5.5", Expect::BadRequest),
        ],
    );
}

#[test]
fn test_optional_geopoint_empty_values() {
    verify(
        false,
        &[
            ("", Expect::Undefined),
            ("arg", Expect::Undefined),
            ("arg=", Expect::Undefined),
            ("arg=null", Expect::Json(json!(null))),
            ("arg={}", Expect::Json(json!({}))),
            ("arg=[]", Expect::Json(json!({}))),
        ],
    );
}

#[test]
fn test_optional_geopoint_valid_values() {
    verify(
        false,
        &[
            ("arg[lat]=0&arg[lng]=3.2", point(0.0, 3.2)),
            ("arg[lat]=-1&arg[lng]=3.2", point(-1.0, 3.2)),
            ("arg[lat]=1&arg[lng]=3.2", point(1.0, 3.2)),
            ("arg[lat]=2.5&arg[lng]=0", point(2.5, 0.0)),
            ("arg[lat]=2.5&arg[lng]=-1", point(2.5, -1.0)),
            ("arg=[2.5, 3.2]", point(2.5, 3.2)),
            ("arg=2.5,3.2", point(2.5, 3.2)),
            (r#"arg={"lat":2.0, "lng": 3.0}"#, point(2.0, 3.0)),
            (r#"arg={"lat": 1.234e+1, "lng":-1.234e+1}"#, point(12.34, -12.34)),
            // range bounds are inclusive
            ("arg=90,180", point(90.0, 180.0)),
            ("arg=-90,-180", point(-90.0, -180.0)),
        ],
    );
}

#[test]
fn test_optional_geopoint_missing_components() {
    verify(
        false,
        &[
            ("arg[lat]=2.3", Expect::BadRequest),
            ("arg[lng]=3", Expect::BadRequest),
            ("arg[latt]=2.5&arg[lng]=3.3", Expect::BadRequest),
            ("arg[lat]=2.5&arg[lang]=3.3", Expect::BadRequest),
            (r#"arg={"lat": 2.3}"#, Expect::BadRequest),
            (r#"arg={"lng":3.5}"#, Expect::BadRequest),
            ("arg=2.3", Expect::BadRequest),
            ("arg=[2]", Expect::BadRequest),
        ],
    );
}

#[test]
fn test_optional_geopoint_out_of_range() {
    verify(
        false,
        &[
            ("arg[lat]=-95&arg[lng]=3.5", Expect::BadRequest),
            ("arg[lat]=95&arg[lng]=3.5", Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=181.5", Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=-181.5", Expect::BadRequest),
            ("arg=95,3", Expect::BadRequest),
            ("arg=5,-181", Expect::BadRequest),
            ("arg=[95,3]", Expect::BadRequest),
            ("arg=[5,181]", Expect::BadRequest),
            (r#"arg={"lat":-91,"lng":3}"#, Expect::BadRequest),
            (r#"arg={"lat":1,"lng":180.5}"#, Expect::BadRequest),
            // NaN is not JSON
            (r#"arg={"lat": NaN, "lng": 3.2}"#, Expect::BadRequest),
        ],
    );
}

#[test]
fn test_range_message_is_the_same_in_every_encoding() {
    let invoker = geopoint_invoker("arg", false, ArgSource::Query);
    let lat = r#"Value 95 of "lat" is out of range (-90 to 90)"#;
    let lng = r#"Value -181 of "lng" is out of range (-180 to 180)"#;
    let cases = [
        ("arg[lat]=95&arg[lng]=3", lat),
        ("arg=95,3", lat),
        ("arg=[95,3]", lat),
        (r#"arg={"lat":95,"lng":3}"#, lat),
        ("arg[lat]=5&arg[lng]=-181", lng),
        ("arg=5,-181", lng),
        ("arg=[5,-181]", lng),
        (r#"arg={"lat":5,"lng":-181}"#, lng),
    ];
    for (query, message) in cases {
        let req = RestRequest::from_query(&encode_query(query));
        let err = call(&invoker, &req).unwrap_err();
        assert!(
            err.to_string().ends_with(message),
            "{query}: {err} does not end with {message}"
        );
    }
}

#[test]
fn test_optional_geopoint_rejects_text_and_booleans() {
    verify(
        false,
        &[
            (r#"arg[lat]=5&arg[lng]="null""#, Expect::BadRequest),
            (r#"arg[lat]="lattitude"&arg[lng]="""#, Expect::BadRequest),
            (r#"arg={"lat": "text", "lng": 3.5}"#, Expect::BadRequest),
            (r#"arg={"lat": 2.3, "lng": "text"}"#, Expect::BadRequest),
            (r#"arg=2.3,"text""#, Expect::BadRequest),
            (r#"arg=[2.4, "text"]"#, Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=true", Expect::BadRequest),
            ("arg[lat]=5&arg[lng]=false", Expect::BadRequest),
            ("arg=true,false", Expect::BadRequest),
            (r#"arg={"lat": true, "lng": false}"#, Expect::BadRequest),
            ("arg=[true, false]", Expect::BadRequest),
        ],
    );
}

#[test]
fn test_optional_geopoint_wrong_arity() {
    verify(
        false,
        &[
            ("arg=[2,3,4]", Expect::BadRequest),
            ("arg=[{}]", Expect::BadRequest),
            ("arg=2,4,5", Expect::BadRequest),
        ],
    );
}

#[test]
fn test_error_messages_name_the_problem() {
    let invoker = geopoint_invoker("arg", false, ArgSource::Query);
    let cases = [
        ("arg=2,4,5", r#"Value is not of correct "lat,lng" format"#),
        ("arg=[2,3,4]", "Value is not of correct [lat,lng] format"),
        ("arg[lng]=3", r#"Missing "lat" from geopoint object"#),
        ("arg[lat]=95&arg[lng]=3", r#"Value 95 of "lat" is out of range (-90 to 90)"#),
        ("arg[lat]=5&arg[lng]=true", "lng: Value is not a number."),
        (r#"arg={"lat": NaN}"#, "Cannot parse JSON-encoded object value."),
        ("arg=2.3", "Value is not a valid geopoint"),
    ];
    for (query, message) in cases {
        let req = RestRequest::from_query(&encode_query(query));
        let err = call(&invoker, &req).unwrap_err();
        assert!(
            err.to_string().ends_with(message),
            "{query}: {err} does not end with {message}"
        );
    }
}
