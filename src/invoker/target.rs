use super::Completion;
use crate::context::ArgVec;
use crate::method::MethodDescriptor;

/// Something remote methods can be invoked on.
///
/// `invoke` may resolve the completion before returning or hand it to another coroutine
/// and resolve it later.
pub trait RemoteTarget: Send + Sync {
    fn invoke(&self, method: &MethodDescriptor, args: &ArgVec, completion: Completion);

    /// Targets that emit events turn an `on` method into a subscription.
    ///
    /// A subscription's event arrives through the error slot: resolve it with
    /// [`Completion::emit`] to keep a structured payload, or with
    /// [`Completion::succeed`] to pass it as a plain result.
    fn is_event_emitter(&self) -> bool {
        false
    }
}
