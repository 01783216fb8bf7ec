//! # Method Module
//!
//! Static metadata for remotely callable methods: which arguments a method accepts, which
//! values it returns, and how it is invoked.
//!
//! Descriptors are created once when a method is registered and never change afterwards.
//! They can be built in code:
//!
//! ```rust
//! use brrtremoting::coercion::TypeTag;
//! use brrtremoting::method::{ArgumentDescriptor, MethodDescriptor, ReturnDescriptor};
//!
//! let nearby = MethodDescriptor::new("nearby")
//!     .accepts(ArgumentDescriptor::new("here", TypeTag::GeoPoint).required())
//!     .accepts(ArgumentDescriptor::new("limit", TypeTag::Integer))
//!     .returns(ReturnDescriptor::named("places", TypeTag::array_of(TypeTag::Object)));
//! assert_eq!(nearby.accepts.len(), 2);
//! ```
//!
//! or loaded from a YAML, TOML or JSON file with [`load_methods`] and checked against a
//! converter registry with [`check_methods`].

mod load;
mod types;

pub use load::{check_methods, load_methods};
pub use types::{ArgSource, ArgumentDescriptor, MethodDescriptor, ReturnDescriptor};
