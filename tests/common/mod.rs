#![allow(dead_code)]

use brrtremoting::coercion::{CoercionRegistry, TypeTag};
use brrtremoting::context::ArgVec;
use brrtremoting::invoker::{Completion, MethodInvoker, RemoteTarget};
use brrtremoting::method::{ArgSource, ArgumentDescriptor, MethodDescriptor};
use brrtremoting::server::RestRequest;
use brrtremoting::{CallId, InvokeError, Value};
use std::sync::Arc;

/// Resolves with the bound argument values, in declaration order
pub struct EchoTarget;

impl RemoteTarget for EchoTarget {
    fn invoke(&self, _method: &MethodDescriptor, args: &ArgVec, completion: Completion) {
        completion.succeed(args.iter().map(|(_, v)| v.clone()).collect());
    }
}

/// What a test case expects back from the echo method
#[derive(Debug, Clone)]
pub enum Expect {
    /// The argument was not sent
    Undefined,
    /// The coerced value, given in wire shape
    Json(serde_json::Value),
    /// The call fails with 400
    BadRequest,
}

pub fn geopoint_invoker(name: &str, required: bool, source: ArgSource) -> MethodInvoker {
    let mut arg = ArgumentDescriptor::new(name, TypeTag::GeoPoint).from_source(source);
    arg.required = required;
    MethodInvoker::new(
        Arc::new(CoercionRegistry::with_builtin()),
        Arc::new(MethodDescriptor::new("echo").accepts(arg)),
    )
}

pub fn call(invoker: &MethodInvoker, req: &RestRequest) -> Result<Value, InvokeError> {
    let input = req.to_call_input(invoker.descriptor());
    invoker
        .call(CallId::new(), input, &EchoTarget)
        .map(|ctx| ctx.into_result())
}

pub fn check(label: &str, outcome: Result<Value, InvokeError>, expect: &Expect) {
    match (expect, outcome) {
        (Expect::BadRequest, Err(err)) => {
            assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST, "{label}: {err}");
        }
        (Expect::BadRequest, Ok(value)) => {
            panic!("{label}: expected 400, got {value}");
        }
        (Expect::Undefined, outcome) => {
            assert_eq!(outcome.ok(), Some(Value::Undefined), "{label}");
        }
        (Expect::Json(json), outcome) => match outcome {
            Ok(value) => assert_eq!(value, Value::from(json.clone()), "{label}"),
            Err(err) => panic!("{label}: expected {json}, got error {err}"),
        },
    }
}

/// Percent-encode each key and value of `a=1&b[c]=2` the way an HTTP client would
pub fn encode_query(raw: &str) -> String {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (pair, None),
            };
            let key: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
            match value {
                Some(v) => {
                    let v: String = url::form_urlencoded::byte_serialize(v.as_bytes()).collect();
                    format!("{key}={v}")
                }
                None => key,
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
