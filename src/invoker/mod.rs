//! # Invoker Module
//!
//! Drives one remote call from bound arguments to a mapped result:
//!
//! 1. [`MethodInvoker::bind`] coerces raw input into an [`InvocationContext`](crate::context::InvocationContext)
//! 2. [`MethodInvoker::invoke`] consumes the context and hands the arguments to a
//!    [`RemoteTarget`] together with a one-shot [`Completion`]
//! 3. [`PendingCall::wait`] receives the outcome and maps positional results onto the
//!    method's declared returns
//!
//! Errors reported by the target are forwarded unchanged as
//! [`InvokeError::Method`](crate::error::InvokeError::Method).

mod completion;
#[allow(clippy::module_inception)]
mod invoker;
mod target;

pub use completion::{Completion, EventPayload, Outcome};
pub use invoker::{
    map_results, InvocationKind, InvocationState, MethodInvoker, PendingCall,
};
pub use target::RemoteTarget;
