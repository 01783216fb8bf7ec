//! Error types for coercion, binding and invocation.
//!
//! The three classes never mix:
//!
//! - [`CoercionError`] is client input that failed validation. Always HTTP 400.
//! - [`ConfigError`] is a setup fault (unknown type name, unregistered converter). HTTP 500,
//!   meant to be caught by tests rather than handled at runtime.
//! - [`InvokeError::Method`] carries whatever error the target method reported, unchanged.

use http::StatusCode;
use std::fmt;

/// A value failed coercion or validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    message: String,
}

impl CoercionError {
    pub fn new(message: impl Into<String>) -> Self {
        CoercionError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Input errors are always client errors
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Prefix the message, e.g. with the index of the failing array item
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> Self {
        CoercionError {
            message: format!("{prefix}: {}", self.message),
        }
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CoercionError {}

/// Programming or setup fault in method metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A declared type name does not name any known type tag
    UnknownType {
        /// The name as written in the descriptor
        name: String,
    },
    /// The type tag is known but no converter was registered for it
    Unregistered {
        /// Tag name
        tag: String,
    },
    /// Two methods with the same qualified name were registered
    DuplicateMethod {
        /// Qualified method name
        name: String,
    },
}

impl ConfigError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownType { name } => {
                write!(f, "Unknown argument type '{name}'")
            }
            ConfigError::Unregistered { tag } => {
                write!(f, "No converter registered for type '{tag}'")
            }
            ConfigError::DuplicateMethod { name } => {
                write!(f, "Method '{name}' is already registered")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Binding of raw call input to declared arguments failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// An argument value was rejected; the call never reaches the target method
    Input {
        /// Argument name
        arg: String,
        /// The converter's error
        error: CoercionError,
    },
    /// An argument declares a type the registry cannot resolve
    Config(ConfigError),
}

impl BindError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            BindError::Input { error, .. } => error.status_code(),
            BindError::Config(err) => err.status_code(),
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Input { arg, error } => {
                write!(f, "Invalid value for argument '{arg}': {error}")
            }
            BindError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Input { error, .. } => Some(error),
            BindError::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BindError {
    fn from(err: ConfigError) -> Self {
        BindError::Config(err)
    }
}

/// Why a call did not produce a result
#[derive(Debug)]
pub enum InvokeError {
    /// Arguments could not be bound
    Binding(BindError),
    /// The target method reported an error; forwarded as-is
    Method(anyhow::Error),
    /// The target dropped its completion handle without resolving it
    Abandoned,
    /// The caller stopped waiting before the target resolved
    TimedOut,
}

impl InvokeError {
    /// HTTP status a transport should answer with.
    ///
    /// Method errors carrying a [`RemoteError`] keep its status; other method errors are 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvokeError::Binding(err) => err.status_code(),
            InvokeError::Method(err) => err
                .downcast_ref::<RemoteError>()
                .map(RemoteError::status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            InvokeError::Abandoned => StatusCode::INTERNAL_SERVER_ERROR,
            InvokeError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Binding(err) => write!(f, "{err}"),
            InvokeError::Method(err) => write!(f, "{err}"),
            InvokeError::Abandoned => {
                write!(f, "Remote method finished without reporting a result")
            }
            InvokeError::TimedOut => write!(f, "Remote method did not complete in time"),
        }
    }
}

impl std::error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokeError::Binding(err) => Some(err),
            InvokeError::Method(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<BindError> for InvokeError {
    fn from(err: BindError) -> Self {
        InvokeError::Binding(err)
    }
}

/// Error a remote method can report when it wants a specific HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    status: StatusCode,
    message: String,
}

impl RemoteError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        RemoteError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Operation the invocation context does not support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    NotImplemented,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::NotImplemented => write!(f, "not implemented"),
        }
    }
}

impl std::error::Error for ContextError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_error_status_passthrough() {
        let err = InvokeError::Method(anyhow::Error::new(RemoteError::not_found("no such pet")));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "no such pet");

        let plain = InvokeError::Method(anyhow::anyhow!("boom"));
        assert_eq!(plain.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_input_errors_stay_400() {
        let err = InvokeError::from(BindError::Input {
            arg: "arg".into(),
            error: CoercionError::new("Value is not a number."),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid value for argument 'arg': Value is not a number."
        );
    }
}
