use super::request::parse_query_string;
use crate::context::{CallInput, RawArg};
use crate::error::InvokeError;
use crate::method::{ArgSource, ArgumentDescriptor, MethodDescriptor};
use crate::value::{Object, Value};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// Request body as the HTTP layer decoded it
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RestBody {
    #[default]
    Empty,
    /// `application/json`; values are already native
    Json(Value),
    /// `application/x-www-form-urlencoded`; values are text
    Form(Object),
}

/// The parts of an HTTP request that carry call arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestRequest {
    pub path_params: HashMap<String, String>,
    pub query: Object,
    pub body: RestBody,
}

impl RestRequest {
    /// Request with the given query string (`a=1&b[c]=2`, with or without leading path)
    pub fn from_query(query: &str) -> Self {
        RestRequest {
            query: parse_query_string(query),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = RestBody::Json(Value::from(body));
        self
    }

    #[must_use]
    pub fn form_body(mut self, body: &str) -> Self {
        self.body = RestBody::Form(parse_query_string(body));
        self
    }

    fn body_field(&self, name: &str) -> Option<RawArg> {
        match &self.body {
            RestBody::Json(Value::Object(map)) => map.get(name).cloned().map(RawArg::typed),
            RestBody::Form(map) => map.get(name).cloned().map(RawArg::sloppy),
            _ => None,
        }
    }

    fn whole_body(&self) -> Option<RawArg> {
        match &self.body {
            RestBody::Empty => None,
            RestBody::Json(value) => Some(RawArg::typed(value.clone())),
            RestBody::Form(map) => Some(RawArg::sloppy(Value::Object(map.clone()))),
        }
    }

    fn lookup(&self, arg: &ArgumentDescriptor) -> Option<RawArg> {
        let path = || {
            self.path_params
                .get(&arg.name)
                .map(|v| RawArg::sloppy(v.as_str()))
        };
        let query = || self.query.get(&arg.name).cloned().map(RawArg::sloppy);
        match arg.source {
            ArgSource::Path => path(),
            ArgSource::Query => query(),
            ArgSource::Body => self.whole_body(),
            ArgSource::Form => self.body_field(&arg.name),
            ArgSource::Auto => path()
                .or_else(query)
                .or_else(|| self.body_field(&arg.name)),
        }
    }

    /// Collect the raw values `method` declares, each from its argument source
    pub fn to_call_input(&self, method: &MethodDescriptor) -> CallInput {
        let collect = |accepts: &[ArgumentDescriptor]| {
            accepts
                .iter()
                .filter_map(|arg| self.lookup(arg).map(|raw| (arg.name.clone(), raw)))
                .collect()
        };
        CallInput {
            ctor_args: collect(&method.ctor_accepts),
            args: collect(&method.accepts),
        }
    }
}

/// Transport-neutral response: status code plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl RemoteResponse {
    #[must_use]
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        RemoteResponse { status, body }
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(
            status,
            json!({ "error": { "status": status, "message": message } }),
        )
    }

    /// Map the end of a call to a response.
    ///
    /// Binding errors are 400 (config faults 500), method errors keep the status of an
    /// attached [`RemoteError`](crate::error::RemoteError) or become 500. A mapped result is
    /// 200, an `Undefined` result 204.
    #[must_use]
    pub fn from_outcome(outcome: Result<Value, InvokeError>) -> Self {
        match outcome {
            Ok(Value::Undefined) => Self::json(204, serde_json::Value::Null),
            Ok(result) => Self::json(200, result.to_json()),
            Err(err) => Self::error(err.status_code().as_u16(), &err.to_string()),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Message of an error response
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
    }
}
