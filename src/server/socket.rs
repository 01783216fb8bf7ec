use super::rest::RemoteResponse;
use crate::context::{CallInput, RawArg};
use crate::dispatcher::Dispatcher;
use crate::ids::CallId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One call received over the event socket.
///
/// Socket payloads are JSON, so every argument is bound as a typed value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocketMessage {
    /// Correlation id echoed in the reply; a ULID is reused as the call id
    #[serde(default)]
    pub id: Option<String>,
    /// Qualified method name, `Class.method`
    pub method: String,
    #[serde(default, rename = "ctorArgs", alias = "ctor_args")]
    pub ctor_args: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl SocketMessage {
    #[must_use]
    pub fn to_call_input(&self) -> CallInput {
        let typed = |map: &serde_json::Map<String, serde_json::Value>| {
            map.iter()
                .map(|(name, value)| (name.clone(), RawArg::typed(value.clone())))
                .collect()
        };
        CallInput {
            ctor_args: typed(&self.ctor_args),
            args: typed(&self.args),
        }
    }

    #[must_use]
    pub fn call_id(&self) -> CallId {
        CallId::parse_or_new(self.id.as_deref())
    }
}

/// Error part of a socket reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketError {
    pub status: u16,
    pub message: String,
}

/// Reply to a [`SocketMessage`]: either `error` or `result` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SocketError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl SocketReply {
    #[must_use]
    pub fn from_response(id: Option<String>, response: RemoteResponse) -> Self {
        if response.is_error() {
            let message = response
                .error_message()
                .unwrap_or("Remote call failed")
                .to_string();
            SocketReply {
                id,
                error: Some(SocketError {
                    status: response.status,
                    message,
                }),
                result: None,
            }
        } else {
            let result = match response.body {
                serde_json::Value::Null => None,
                body => Some(body),
            };
            SocketReply {
                id,
                error: None,
                result,
            }
        }
    }
}

/// Serve one socket frame: decode the message, dispatch it and encode the reply
pub fn handle_socket_frame(dispatcher: &Dispatcher, frame: &str) -> String {
    let reply = match serde_json::from_str::<SocketMessage>(frame) {
        Ok(message) => {
            let call_id = message.call_id();
            let response =
                dispatcher.dispatch_with_call_id(call_id, &message.method, message.to_call_input());
            SocketReply::from_response(message.id, response)
        }
        Err(err) => {
            warn!(error = %err, "Malformed socket message");
            SocketReply::from_response(
                None,
                RemoteResponse::error(400, &format!("Malformed socket message: {err}")),
            )
        }
    };
    serde_json::to_string(&reply).unwrap_or_else(|err| {
        format!(r#"{{"error":{{"status":500,"message":"{err}"}}}}"#)
    })
}
