use super::completion::{Completion, EventPayload, Outcome};
use super::target::RemoteTarget;
use crate::coercion::CoercionRegistry;
use crate::context::{CallInput, InvocationContext};
use crate::error::InvokeError;
use crate::ids::CallId;
use crate::method::{MethodDescriptor, ReturnDescriptor};
use crate::value::{Object, Value};
use may::sync::mpsc;
use std::fmt;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifecycle of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Idle,
    Binding,
    Invoking,
    Mapping,
    Done,
    Failed,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvocationState::Idle => "idle",
            InvocationState::Binding => "binding",
            InvocationState::Invoking => "invoking",
            InvocationState::Mapping => "mapping",
            InvocationState::Done => "done",
            InvocationState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

fn transition(call_id: CallId, method: &str, from: InvocationState, to: InvocationState) {
    debug!(
        call_id = %call_id,
        method = %method,
        from = %from,
        to = %to,
        "Invocation state change"
    );
}

/// How the completion of a call is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// Regular call: the error slot fails the call, results are mapped by the return descriptors
    Call,
    /// `on` against an event-emitting target: the error slot carries the event payload
    Subscription,
}

impl InvocationKind {
    #[must_use]
    pub fn detect(method: &MethodDescriptor, target: &dyn RemoteTarget) -> Self {
        if method.name == "on" && target.is_event_emitter() {
            InvocationKind::Subscription
        } else {
            InvocationKind::Call
        }
    }
}

/// Map positional results onto the declared returns.
///
/// Several declared returns give an object keyed by each return's `name`, else `arg`, else
/// its position. Zero or one declared return gives the first result itself, `Undefined`
/// when there is none.
#[must_use]
pub fn map_results(returns: &[ReturnDescriptor], results: Vec<Value>) -> Value {
    if returns.len() > 1 {
        let mut results = results.into_iter();
        let mapped: Object = returns
            .iter()
            .enumerate()
            .map(|(idx, ret)| (ret.key(idx), results.next().unwrap_or_default()))
            .collect();
        Value::Object(mapped)
    } else {
        results.into_iter().next().unwrap_or_default()
    }
}

/// Binds, invokes and maps calls of one method
#[derive(Debug, Clone)]
pub struct MethodInvoker {
    registry: Arc<CoercionRegistry>,
    method: Arc<MethodDescriptor>,
}

impl MethodInvoker {
    pub fn new(registry: Arc<CoercionRegistry>, method: Arc<MethodDescriptor>) -> Self {
        MethodInvoker { registry, method }
    }

    #[must_use]
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Coerce raw input into a fresh context
    pub fn bind(&self, call_id: CallId, input: CallInput) -> Result<InvocationContext, InvokeError> {
        let name = self.method.name.as_str();
        transition(call_id, name, InvocationState::Idle, InvocationState::Binding);
        InvocationContext::bind(call_id, &self.method, input, &self.registry).map_err(|err| {
            transition(call_id, name, InvocationState::Binding, InvocationState::Failed);
            InvokeError::Binding(err)
        })
    }

    /// Hand the bound arguments to `target`.
    ///
    /// Shared-constructor methods receive the constructor arguments, all others their own.
    pub fn invoke(&self, ctx: InvocationContext, target: &dyn RemoteTarget) -> PendingCall {
        let call_id = ctx.call_id();
        let kind = InvocationKind::detect(&self.method, target);
        transition(
            call_id,
            &self.method.name,
            InvocationState::Binding,
            InvocationState::Invoking,
        );
        let (completion, rx) = Completion::channel(call_id);
        let args = if self.method.is_shared_ctor {
            ctx.ctor_args()
        } else {
            ctx.args()
        };
        target.invoke(&self.method, args, completion);
        PendingCall {
            ctx,
            kind,
            method: Arc::clone(&self.method),
            rx,
        }
    }

    /// Bind, invoke and wait without a deadline
    pub fn call(
        &self,
        call_id: CallId,
        input: CallInput,
        target: &dyn RemoteTarget,
    ) -> Result<InvocationContext, InvokeError> {
        let ctx = self.bind(call_id, input)?;
        self.invoke(ctx, target).wait()
    }
}

/// A call handed to its target and not yet completed
pub struct PendingCall {
    ctx: InvocationContext,
    kind: InvocationKind,
    method: Arc<MethodDescriptor>,
    rx: mpsc::Receiver<Outcome>,
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("call_id", &self.ctx.call_id())
            .field("method", &self.method.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PendingCall {
    #[must_use]
    pub fn kind(&self) -> InvocationKind {
        self.kind
    }

    /// Block the current coroutine until the target resolves
    pub fn wait(self) -> Result<InvocationContext, InvokeError> {
        match self.rx.recv() {
            Ok(outcome) => self.finish(outcome),
            Err(_) => self.fail(InvokeError::Abandoned),
        }
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`.
    ///
    /// A target resolving after the deadline is ignored.
    pub fn wait_timeout(self, timeout: Duration) -> Result<InvocationContext, InvokeError> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => self.finish(outcome),
            Err(RecvTimeoutError::Timeout) => self.fail(InvokeError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => self.fail(InvokeError::Abandoned),
        }
    }

    fn fail(self, err: InvokeError) -> Result<InvocationContext, InvokeError> {
        warn!(
            call_id = %self.ctx.call_id(),
            method = %self.method.name,
            error = %err,
            "Remote call failed"
        );
        transition(
            self.ctx.call_id(),
            &self.method.name,
            InvocationState::Invoking,
            InvocationState::Failed,
        );
        Err(err)
    }

    fn finish(self, outcome: Outcome) -> Result<InvocationContext, InvokeError> {
        let results = match (self.kind, outcome) {
            (_, Ok(results)) => results,
            (InvocationKind::Subscription, Err(err)) => match err.downcast::<EventPayload>() {
                Ok(EventPayload(payload)) => vec![payload],
                Err(other) => vec![Value::String(other.to_string())],
            },
            (InvocationKind::Call, Err(err)) => {
                return self.fail(InvokeError::Method(err));
            }
        };
        let PendingCall { mut ctx, method, .. } = self;
        let call_id = ctx.call_id();
        transition(call_id, &method.name, InvocationState::Invoking, InvocationState::Mapping);
        ctx.set_result(map_results(&method.returns, results));
        transition(call_id, &method.name, InvocationState::Mapping, InvocationState::Done);
        Ok(ctx)
    }
}
