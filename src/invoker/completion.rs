use crate::ids::CallId;
use crate::value::Value;
use may::sync::mpsc;
use std::fmt;
use tracing::debug;

/// What a target reports when it finishes: positional results, or its own error
pub type Outcome = Result<Vec<Value>, anyhow::Error>;

/// Event delivered through the error slot of a subscription.
///
/// Sent with [`Completion::emit`]; the subscriber receives the payload with its shape intact.
/// Any other error in a subscription's error slot reaches the subscriber as its message text.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload(pub Value);

impl fmt::Display for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => write!(f, "{text}"),
            other => write!(f, "{other}"),
        }
    }
}

impl std::error::Error for EventPayload {}

/// One-shot handle a target uses to report the end of a call.
///
/// `resolve` consumes the handle, so a call resolves at most once. Dropping it without
/// resolving makes the waiting side fail with [`InvokeError::Abandoned`](crate::error::InvokeError::Abandoned).
#[derive(Debug)]
pub struct Completion {
    call_id: CallId,
    tx: mpsc::Sender<Outcome>,
}

impl Completion {
    pub(crate) fn channel(call_id: CallId) -> (Completion, mpsc::Receiver<Outcome>) {
        let (tx, rx) = mpsc::channel();
        (Completion { call_id, tx }, rx)
    }

    #[must_use]
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Report the outcome of the call
    pub fn resolve(self, outcome: Outcome) {
        if self.tx.send(outcome).is_err() {
            // the caller gave up waiting
            debug!(call_id = %self.call_id, "Late completion ignored");
        }
    }

    /// Shorthand for `resolve(Ok(results))`
    pub fn succeed(self, results: Vec<Value>) {
        self.resolve(Ok(results));
    }

    /// Deliver `payload` through the error slot.
    ///
    /// Subscriptions get the payload as their result; regular calls fail with it.
    pub fn emit(self, payload: impl Into<Value>) {
        self.resolve(Err(EventPayload(payload.into()).into()));
    }

    /// Shorthand for `resolve(Err(err))`; the error reaches the caller unchanged
    pub fn fail(self, err: impl Into<anyhow::Error>) {
        self.resolve(Err(err.into()));
    }
}
