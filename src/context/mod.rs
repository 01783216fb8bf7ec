//! # Invocation Context
//!
//! One [`InvocationContext`] exists per remote call. It is created by binding raw call input
//! against a method's declared arguments, handed to the invoker, and finally carries the
//! mapped result back to the transport. It is never reused or shared between calls.
//!
//! Binding walks the constructor arguments and then the method arguments in declaration
//! order. Each raw value goes through the converter of its declared type: sloppy values
//! (query strings, path segments) through `from_sloppy_value`, already-native values
//! (JSON bodies, socket payloads) through `from_typed_value`. The first argument that fails
//! stops the binding and its error is the call's error.

use crate::coercion::{CoercionRegistry, ConvertOptions};
use crate::error::{BindError, CoercionError, ContextError};
use crate::ids::CallId;
use crate::method::{ArgumentDescriptor, MethodDescriptor};
use crate::value::{Object, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bound arguments in declaration order.
///
/// Methods rarely declare more than a handful of arguments, so these stay on the stack.
pub type ArgVec = SmallVec<[(Arc<str>, Value); 8]>;

/// How a raw value reached us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Text from a query string, path segment or form field
    Sloppy,
    /// Already in native shape, e.g. a JSON body field
    Typed,
}

/// A raw argument value and its wire encoding
#[derive(Debug, Clone, PartialEq)]
pub struct RawArg {
    pub value: Value,
    pub encoding: Encoding,
}

impl RawArg {
    pub fn sloppy(value: impl Into<Value>) -> Self {
        RawArg {
            value: value.into(),
            encoding: Encoding::Sloppy,
        }
    }

    pub fn typed(value: impl Into<Value>) -> Self {
        RawArg {
            value: value.into(),
            encoding: Encoding::Typed,
        }
    }
}

/// Raw call input keyed by argument name, as a transport extracted it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallInput {
    pub ctor_args: HashMap<String, RawArg>,
    pub args: HashMap<String, RawArg>,
}

impl CallInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, raw: RawArg) -> Self {
        self.args.insert(name.into(), raw);
        self
    }

    #[must_use]
    pub fn ctor_arg(mut self, name: impl Into<String>, raw: RawArg) -> Self {
        self.ctor_args.insert(name.into(), raw);
        self
    }

    /// Every field of a JSON-like object becomes a typed argument
    pub fn typed_from_object(args: Object) -> Self {
        CallInput {
            ctor_args: HashMap::new(),
            args: args
                .into_iter()
                .map(|(name, value)| (name, RawArg::typed(value)))
                .collect(),
        }
    }
}

/// Per-call state: bound constructor and method arguments, and the result once mapped
#[derive(Debug)]
pub struct InvocationContext {
    call_id: CallId,
    method: Arc<str>,
    ctor_args: ArgVec,
    args: ArgVec,
    result: Value,
}

impl InvocationContext {
    /// Coerce `input` against the arguments `method` declares.
    ///
    /// Fails with the first argument error: a coercion error (also for optional arguments)
    /// or a required argument that is absent. Unregistered declared types are a
    /// [`BindError::Config`].
    pub fn bind(
        call_id: CallId,
        method: &MethodDescriptor,
        mut input: CallInput,
        registry: &CoercionRegistry,
    ) -> Result<Self, BindError> {
        let ctor_args = bind_all(call_id, &method.ctor_accepts, &mut input.ctor_args, registry)?;
        let args = bind_all(call_id, &method.accepts, &mut input.args, registry)?;
        debug!(
            call_id = %call_id,
            method = %method.name,
            ctor_arg_count = ctor_args.len(),
            arg_count = args.len(),
            "Arguments bound"
        );
        Ok(InvocationContext {
            call_id,
            method: Arc::from(method.name.as_str()),
            ctor_args,
            args,
            result: Value::Undefined,
        })
    }

    #[must_use]
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn args(&self) -> &ArgVec {
        &self.args
    }

    #[must_use]
    pub fn ctor_args(&self) -> &ArgVec {
        &self.ctor_args
    }

    /// Coerced method argument; `None` when the method declares no such argument
    #[must_use]
    pub fn get_arg_by_name(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|(arg, _)| arg.as_ref() == name)
            .map(|(_, value)| value)
    }

    /// Arguments are fixed once bound
    pub fn set_arg_by_name(&mut self, _name: &str, _value: Value) -> Result<(), ContextError> {
        Err(ContextError::NotImplemented)
    }

    /// Field of the mapped result; the whole result when it is not an object
    #[must_use]
    pub fn get_result_by_name(&self, name: &str) -> Option<&Value> {
        match &self.result {
            Value::Object(map) => map.get(name),
            Value::Undefined => None,
            other => Some(other),
        }
    }

    /// Set one field of the result, turning the result into an object if needed
    pub fn set_result_by_name(&mut self, name: &str, value: Value) {
        if !matches!(self.result, Value::Object(_)) {
            self.result = Value::Object(Object::new());
        }
        if let Value::Object(map) = &mut self.result {
            map.insert(name.to_string(), value);
        }
    }

    /// The mapped result; `Undefined` until the call completed
    #[must_use]
    pub fn result(&self) -> &Value {
        &self.result
    }

    pub(crate) fn set_result(&mut self, result: Value) {
        self.result = result;
    }

    #[must_use]
    pub fn into_result(self) -> Value {
        self.result
    }
}

fn bind_all(
    call_id: CallId,
    accepts: &[ArgumentDescriptor],
    raw: &mut HashMap<String, RawArg>,
    registry: &CoercionRegistry,
) -> Result<ArgVec, BindError> {
    let mut bound = ArgVec::new();
    for desc in accepts {
        let value = bind_one(desc, raw.remove(&desc.name), registry).map_err(|err| {
            warn!(
                call_id = %call_id,
                arg = %desc.name,
                declared_type = %desc.declared_type,
                error = %err,
                "Argument binding failed"
            );
            err
        })?;
        bound.push((Arc::from(desc.name.as_str()), value));
    }
    Ok(bound)
}

fn bind_one(
    desc: &ArgumentDescriptor,
    raw: Option<RawArg>,
    registry: &CoercionRegistry,
) -> Result<Value, BindError> {
    let converter = registry.resolve(&desc.declared_type)?;
    let options = ConvertOptions {
        allow_array: desc.allow_array,
    };
    let coerced = match raw {
        None => Ok(Value::Undefined),
        Some(RawArg {
            value,
            encoding: Encoding::Sloppy,
        }) => converter.from_sloppy_value(value, &options),
        Some(RawArg {
            value,
            encoding: Encoding::Typed,
        }) => converter.from_typed_value(value, &options),
    };
    let value = coerced.map_err(|error| BindError::Input {
        arg: desc.name.clone(),
        error,
    })?;
    if desc.required && !converter.satisfies_required(&value) {
        return Err(BindError::Input {
            arg: desc.name.clone(),
            error: CoercionError::new(format!("{} is a required argument", desc.name)),
        });
    }
    Ok(value)
}
