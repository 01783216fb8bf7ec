use super::class::SharedClass;
use crate::coercion::CoercionRegistry;
use crate::context::{CallInput, InvocationContext};
use crate::ids::CallId;
use crate::invoker::MethodInvoker;
use crate::method::{check_methods, MethodDescriptor};
use crate::runtime_config::RuntimeConfig;
use crate::server::RemoteResponse;
use may::coroutine;
use may::sync::mpsc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// One call on its way to a class coroutine
#[derive(Debug)]
pub struct RemoteCall {
    pub call_id: CallId,
    /// Method name within the class
    pub method: String,
    pub input: CallInput,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<RemoteResponse>,
}

pub type CallSender = mpsc::Sender<RemoteCall>;

#[derive(Clone)]
struct ClassHandle {
    sender: CallSender,
    methods: Vec<String>,
}

/// Routes `Class.method` calls to the coroutine serving the class
#[derive(Clone)]
pub struct Dispatcher {
    classes: HashMap<String, ClassHandle>,
    registry: Arc<CoercionRegistry>,
    config: RuntimeConfig,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(CoercionRegistry::with_builtin()), RuntimeConfig::from_env())
    }
}

fn serve_call(
    class: &SharedClass,
    invokers: &HashMap<String, MethodInvoker>,
    call_id: CallId,
    method: &str,
    input: CallInput,
    timeout: Duration,
) -> RemoteResponse {
    let Some(invoker) = invokers.get(method) else {
        return RemoteResponse::error(404, &format!("Unknown remote method '{method}'"));
    };
    let outcome = invoker
        .bind(call_id, input)
        .and_then(|ctx| invoker.invoke(ctx, class).wait_timeout(timeout))
        .map(InvocationContext::into_result);
    RemoteResponse::from_outcome(outcome)
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Arc<CoercionRegistry>, config: RuntimeConfig) -> Self {
        Dispatcher {
            classes: HashMap::new(),
            registry,
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CoercionRegistry> {
        &self.registry
    }

    /// Check the class's method descriptors and spawn the coroutine that serves it.
    ///
    /// Replaces a class registered under the same name; its old coroutine exits once the
    /// last sender is dropped.
    pub fn register_class(&mut self, class: SharedClass) -> anyhow::Result<()> {
        let descriptors: Vec<MethodDescriptor> =
            class.descriptors().map(|d| d.as_ref().clone()).collect();
        check_methods(&descriptors, &self.registry)?;

        let invokers: HashMap<String, MethodInvoker> = class
            .descriptors()
            .map(|d| {
                (
                    d.name.clone(),
                    MethodInvoker::new(Arc::clone(&self.registry), Arc::clone(d)),
                )
            })
            .collect();

        let (tx, rx) = mpsc::channel::<RemoteCall>();
        let class_name = class.name().to_string();
        let coroutine_name = class_name.clone();
        let methods: Vec<String> = class.method_names().into_iter().map(str::to_string).collect();
        let stack_size = self.config.stack_size;
        let timeout = self.config.call_timeout;

        // SAFETY: may::coroutine::Builder::spawn() is marked unsafe by the may runtime.
        // The closure owns everything it touches (Send + 'static) and reports failures
        // through the reply channel instead of unwinding across the coroutine boundary.
        #[allow(unsafe_code)]
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .name(format!("class-{class_name}"))
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(
                        class_name = %coroutine_name,
                        stack_size = stack_size,
                        "Class coroutine start"
                    );

                    for call in rx.iter() {
                        let RemoteCall {
                            call_id,
                            method,
                            input,
                            reply_tx,
                        } = call;
                        let started = Instant::now();
                        debug!(
                            call_id = %call_id,
                            class_name = %coroutine_name,
                            method = %method,
                            queued_ms = call_id.age().as_millis() as u64,
                            "Remote call picked up"
                        );

                        let response = match std::panic::catch_unwind(
                            std::panic::AssertUnwindSafe(|| {
                                serve_call(&class, &invokers, call_id, &method, input, timeout)
                            }),
                        ) {
                            Ok(response) => response,
                            Err(panic) => {
                                let panic_message = format!("{panic:?}");
                                error!(
                                    call_id = %call_id,
                                    class_name = %coroutine_name,
                                    method = %method,
                                    panic_message = %panic_message,
                                    "Remote method panicked - CRITICAL"
                                );
                                RemoteResponse::error(500, "Remote method panicked")
                            }
                        };

                        debug!(
                            call_id = %call_id,
                            class_name = %coroutine_name,
                            method = %method,
                            status = response.status,
                            execution_time_ms = started.elapsed().as_millis() as u64,
                            "Remote call served"
                        );
                        if reply_tx.send(response).is_err() {
                            warn!(call_id = %call_id, "Caller went away before the reply");
                        }
                    }

                    debug!(class_name = %coroutine_name, "Class coroutine exit");
                })
        };

        if let Err(e) = spawn_result {
            error!(
                class_name = %class_name,
                error = %e,
                stack_size = stack_size,
                "Failed to spawn class coroutine - CRITICAL"
            );
            return Err(e.into());
        }

        let handle = ClassHandle {
            sender: tx,
            methods,
        };
        if self.classes.insert(class_name.clone(), handle).is_some() {
            warn!(
                class_name = %class_name,
                "Replaced existing class - old coroutine will exit"
            );
        }
        info!(
            class_name = %class_name,
            total_classes = self.classes.len(),
            "Class registered successfully"
        );
        Ok(())
    }

    /// Qualified names of every registered method, sorted
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .classes
            .iter()
            .flat_map(|(class, handle)| handle.methods.iter().map(move |m| format!("{class}.{m}")))
            .collect();
        names.sort_unstable();
        names
    }

    /// Call `Class.method` with a fresh call id
    #[must_use]
    pub fn dispatch(&self, qualified: &str, input: CallInput) -> RemoteResponse {
        self.dispatch_with_call_id(CallId::new(), qualified, input)
    }

    /// Call `Class.method` and wait for its response.
    ///
    /// Unknown classes and methods are 404, a class whose coroutine is gone is 503.
    #[must_use]
    pub fn dispatch_with_call_id(
        &self,
        call_id: CallId,
        qualified: &str,
        input: CallInput,
    ) -> RemoteResponse {
        let Some((class_name, method)) = qualified.split_once('.') else {
            warn!(call_id = %call_id, method = %qualified, "Method name is not qualified");
            return RemoteResponse::error(404, &format!("Unknown remote method '{qualified}'"));
        };

        let handle = match self.classes.get(class_name) {
            Some(handle) if handle.methods.iter().any(|m| m == method) => handle,
            _ => {
                let available = self.method_names();
                error!(
                    call_id = %call_id,
                    method = %qualified,
                    available_methods = ?available,
                    "Remote method not found"
                );
                return RemoteResponse::error(404, &format!("Unknown remote method '{qualified}'"));
            }
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let call = RemoteCall {
            call_id,
            method: method.to_string(),
            input,
            reply_tx,
        };

        info!(call_id = %call_id, method = %qualified, "Remote call dispatched");
        let start = Instant::now();

        if let Err(e) = handle.sender.send(call) {
            error!(
                call_id = %call_id,
                method = %qualified,
                error = %e,
                "Failed to send call to class coroutine"
            );
            return RemoteResponse::error(503, "Remote class is unavailable");
        }

        match reply_rx.recv() {
            Ok(response) => {
                info!(
                    call_id = %call_id,
                    method = %qualified,
                    status = response.status,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Remote call complete"
                );
                response
            }
            Err(e) => {
                error!(
                    call_id = %call_id,
                    method = %qualified,
                    error = %e,
                    "Class coroutine dropped the call"
                );
                RemoteResponse::error(503, "Remote class is unavailable")
            }
        }
    }
}
