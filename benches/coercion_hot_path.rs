use brrtremoting::coercion::{CoercionRegistry, ConvertOptions, TypeTag};
use brrtremoting::context::{CallInput, InvocationContext, RawArg};
use brrtremoting::method::{ArgumentDescriptor, MethodDescriptor};
use brrtremoting::server::parse_query_string;
use brrtremoting::{CallId, Value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;

/// Geopoint coercion for each sloppy encoding a query string can carry
fn bench_geopoint_encodings(c: &mut Criterion) {
    let registry = CoercionRegistry::with_builtin();
    let geopoint = registry.resolve(&TypeTag::GeoPoint).unwrap();
    let opts = ConvertOptions::default();
    let mut group = c.benchmark_group("geopoint_sloppy");

    let inputs = [
        ("pair", Value::from("2.5,3.2")),
        ("array", Value::from("[2.5,3.2]")),
        ("json", Value::from(r#"{"lat":2.5,"lng":3.2}"#)),
        (
            "nested",
            brrtremoting::value::object([("lat", Value::from("2.5")), ("lng", Value::from("3.2"))]),
        ),
    ];
    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::new("encoding", name), &input, |b, input| {
            b.iter(|| geopoint.from_sloppy_value(black_box(input.clone()), &opts));
        });
    }
    group.finish();
}

/// Full binding of a method with several arguments, from query text to bound context
fn bench_bind_from_query(c: &mut Criterion) {
    let registry = CoercionRegistry::with_builtin();
    let method = MethodDescriptor::new("nearby")
        .accepts(ArgumentDescriptor::new("here", TypeTag::GeoPoint).required())
        .accepts(ArgumentDescriptor::new("limit", TypeTag::Integer))
        .accepts(ArgumentDescriptor::new("tags", TypeTag::array_of(TypeTag::String)))
        .accepts(ArgumentDescriptor::new("open", TypeTag::Boolean));
    let query = "here[lat]=2.5&here[lng]=3.2&limit=20&tags=cafe,bar&open=true";

    c.bench_function("bind_from_query", |b| {
        b.iter(|| {
            let parsed = parse_query_string(black_box(query));
            let input = parsed
                .into_iter()
                .fold(CallInput::new(), |input, (name, value)| input.arg(name, RawArg::sloppy(value)));
            InvocationContext::bind(CallId::new(), &method, input, &registry)
        });
    });
}

/// Typed JSON payloads skip encoding detection
fn bench_bind_typed(c: &mut Criterion) {
    let registry = CoercionRegistry::with_builtin();
    let method = MethodDescriptor::new("nearby")
        .accepts(ArgumentDescriptor::new("here", TypeTag::GeoPoint).required())
        .accepts(ArgumentDescriptor::new("limit", TypeTag::Integer));
    let payload = Value::from(json!({ "here": { "lat": 2.5, "lng": 3.2 }, "limit": 20 }))
        .as_object()
        .cloned()
        .unwrap_or_default();

    c.bench_function("bind_typed", |b| {
        b.iter(|| {
            let input = CallInput::typed_from_object(black_box(payload.clone()));
            InvocationContext::bind(CallId::new(), &method, input, &registry)
        });
    });
}

criterion_group!(
    benches,
    bench_geopoint_encodings,
    bench_bind_from_query,
    bench_bind_typed
);
criterion_main!(benches);
