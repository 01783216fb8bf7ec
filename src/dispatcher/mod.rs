//! # Dispatcher Module
//!
//! Coroutine-based dispatch of remote calls to shared classes.
//!
//! Each registered [`SharedClass`] is served by its own `may` coroutine fed through an mpsc
//! channel. A call travels as a [`RemoteCall`] carrying its raw input and a reply channel;
//! the class coroutine binds, invokes and maps it, and sends back a
//! [`RemoteResponse`](crate::server::RemoteResponse).
//!
//! ```rust,no_run
//! use brrtremoting::context::{CallInput, RawArg};
//! use brrtremoting::coercion::TypeTag;
//! use brrtremoting::dispatcher::{Dispatcher, SharedClass};
//! use brrtremoting::method::{ArgumentDescriptor, MethodDescriptor};
//!
//! let mut dispatcher = Dispatcher::default();
//! dispatcher
//!     .register_class(SharedClass::new("Geo").method_sync(
//!         MethodDescriptor::new("echo")
//!             .accepts(ArgumentDescriptor::new("here", TypeTag::GeoPoint).required()),
//!         |args| Ok(vec![args[0].1.clone()]),
//!     ))
//!     .expect("register Geo");
//!
//! let input = CallInput::new().arg("here", RawArg::sloppy("2.5,3"));
//! let response = dispatcher.dispatch("Geo.echo", input);
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Error Handling
//!
//! - Unknown classes or methods return 404
//! - Methods that do not resolve within `RuntimeConfig::call_timeout` return 504
//! - Panics inside a method are caught and return 500
//! - A class coroutine that is gone returns 503

mod class;
mod core;

pub use class::{MethodFn, SharedClass};
pub use core::{CallSender, Dispatcher, RemoteCall};
