//! # Transport Adapters
//!
//! Thin adapters between wire requests and [`CallInput`](crate::context::CallInput):
//!
//! - [`parse_query_string`] turns URL-encoded text into nested values
//! - [`RestRequest`] picks each declared argument from path, query or body and
//!   [`RemoteResponse`] carries the status and JSON body back
//! - [`SocketMessage`] / [`SocketReply`] are the JSON frames of the event socket
//!
//! HTTP framing and socket connection handling live outside this crate.

pub mod request;
pub mod rest;
pub mod socket;

pub use request::parse_query_string;
pub use rest::{RemoteResponse, RestBody, RestRequest};
pub use socket::{handle_socket_frame, SocketError, SocketMessage, SocketReply};
