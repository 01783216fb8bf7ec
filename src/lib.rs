//! # brrtremoting
//!
//! **brrtremoting** exposes programmatic methods as remote-callable operations on the `may`
//! coroutine runtime. It turns loosely typed wire input into strongly typed method arguments,
//! invokes the target method, and maps the method's positional results back into named
//! response fields.
//!
//! ## Overview
//!
//! The same logical value reaches a method in many shapes. A geopoint argument `arg` may
//! arrive as `arg[lat]=2.5&arg[lng]=3`, `arg=2.5,3`, `arg={"lat":2.5,"lng":3}`, `arg=[2.5,3]`
//! or as a JSON body. Converters recognise each encoding, normalize it and validate the
//! result, so neither the transport nor the method needs to know which one was used.
//!
//! ## Architecture
//!
//! - **[`value`]** - The wire value model; `Undefined` is distinct from `Null`
//! - **[`coercion`]** - One converter per declared type and the [`CoercionRegistry`]
//! - **[`method`]** - Argument and return descriptors, loadable from YAML/TOML/JSON
//! - **[`context`]** - Per-call binding of raw input to declared arguments
//! - **[`invoker`]** - Invocation state machine, one-shot completion, result mapping
//! - **[`dispatcher`]** - Coroutine per shared class, request/reply channels
//! - **[`server`]** - Query string, REST and event-socket adapters
//!
//! ### Call Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Transport
//!     participant Dispatcher
//!     participant Class as SharedClass<br/>(Coroutine)
//!     participant Context as InvocationContext
//!     participant Registry as CoercionRegistry
//!     participant Target as Method
//!
//!     Transport->>Transport: parse query / body into Values
//!     Transport->>Dispatcher: dispatch("Geo.nearby", CallInput)
//!     Dispatcher->>Class: RemoteCall (mpsc)
//!     Class->>Context: bind(descriptor, input)
//!     Context->>Registry: resolve(declared type)
//!     Registry-->>Context: TypeConverter
//!     Context->>Context: from_sloppy_value / from_typed_value
//!     alt Coercion failed
//!         Class-->>Transport: 400 Bad Request
//!     end
//!     Class->>Target: invoke(args, Completion)
//!     Target-->>Class: resolve(Ok(results) | Err(e))
//!     Class->>Class: map results onto declared returns
//!     Class-->>Dispatcher: RemoteResponse
//!     Dispatcher-->>Transport: status + JSON body
//! ```
//!
//! ## Error Classes
//!
//! - Input errors ([`CoercionError`]) are always HTTP 400
//! - Method errors are forwarded unchanged; a [`RemoteError`] chooses its own status
//! - Setup faults ([`ConfigError`]) are HTTP 500 and surface at registration time
//!
//! ## Configuration
//!
//! - `BRREM_STACK_SIZE`, `BRREM_CALL_TIMEOUT_MS` - see [`runtime_config`]
//! - `BRREM_LOG_LEVEL`, `BRREM_LOG_FORMAT` - see [`logging`]

pub mod coercion;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod invoker;
pub mod logging;
pub mod method;
pub mod runtime_config;
pub mod server;
pub mod value;

pub use coercion::{CoercedValue, CoercionRegistry, ConvertOptions, TypeConverter, TypeTag};
pub use context::{CallInput, InvocationContext, RawArg};
pub use dispatcher::{Dispatcher, SharedClass};
pub use error::{BindError, CoercionError, ConfigError, ContextError, InvokeError, RemoteError};
pub use ids::CallId;
pub use invoker::{Completion, MethodInvoker, RemoteTarget};
pub use method::{ArgumentDescriptor, MethodDescriptor, ReturnDescriptor};
pub use value::{Object, Value};
