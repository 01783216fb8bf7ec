use crate::context::ArgVec;
use crate::error::RemoteError;
use crate::invoker::{Completion, Outcome, RemoteTarget};
use crate::method::MethodDescriptor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Implementation of one remote method
pub type MethodFn = Arc<dyn Fn(&ArgVec, Completion) + Send + Sync>;

/// A named group of remote methods served by one coroutine.
///
/// ```rust
/// use brrtremoting::coercion::TypeTag;
/// use brrtremoting::dispatcher::SharedClass;
/// use brrtremoting::method::{ArgumentDescriptor, MethodDescriptor};
///
/// let geo = SharedClass::new("Geo").method_sync(
///     MethodDescriptor::new("echo").accepts(ArgumentDescriptor::new("here", TypeTag::GeoPoint)),
///     |args| Ok(vec![args[0].1.clone()]),
/// );
/// assert_eq!(geo.method_names(), vec!["echo"]);
/// ```
#[derive(Clone)]
pub struct SharedClass {
    name: String,
    methods: HashMap<String, (Arc<MethodDescriptor>, MethodFn)>,
    event_emitter: bool,
}

impl fmt::Debug for SharedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedClass")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .field("event_emitter", &self.event_emitter)
            .finish()
    }
}

impl SharedClass {
    pub fn new(name: impl Into<String>) -> Self {
        SharedClass {
            name: name.into(),
            methods: HashMap::new(),
            event_emitter: false,
        }
    }

    /// Add a method that resolves its completion itself, possibly later
    #[must_use]
    pub fn method<F>(mut self, descriptor: MethodDescriptor, f: F) -> Self
    where
        F: Fn(&ArgVec, Completion) + Send + Sync + 'static,
    {
        self.methods
            .insert(descriptor.name.clone(), (Arc::new(descriptor), Arc::new(f)));
        self
    }

    /// Add a method that produces its outcome before returning
    #[must_use]
    pub fn method_sync<F>(self, descriptor: MethodDescriptor, f: F) -> Self
    where
        F: Fn(&ArgVec) -> Outcome + Send + Sync + 'static,
    {
        self.method(descriptor, move |args, completion| completion.resolve(f(args)))
    }

    /// Instances of this class emit events; `on` becomes a subscription
    #[must_use]
    pub fn event_emitter(mut self) -> Self {
        self.event_emitter = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn descriptor(&self, method: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(method).map(|(desc, _)| desc)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        self.methods.values().map(|(desc, _)| desc)
    }

    /// Sorted method names
    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl RemoteTarget for SharedClass {
    fn invoke(&self, method: &MethodDescriptor, args: &ArgVec, completion: Completion) {
        match self.methods.get(&method.name) {
            Some((_, f)) => f(args, completion),
            None => completion.fail(RemoteError::not_found(format!(
                "Method '{}.{}' is not implemented",
                self.name, method.name
            ))),
        }
    }

    fn is_event_emitter(&self) -> bool {
        self.event_emitter
    }
}
