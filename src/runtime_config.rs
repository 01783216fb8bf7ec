//! # Runtime Configuration
//!
//! Environment-based tuning of the dispatcher runtime.
//!
//! ## Environment Variables
//!
//! ### `BRREM_STACK_SIZE`
//!
//! Stack size of each shared-class coroutine. Decimal (`16384`) or hexadecimal (`0x4000`).
//! Default: `0x10000` (64 KB).
//!
//! ### `BRREM_CALL_TIMEOUT_MS`
//!
//! How long a class coroutine waits for a method to resolve its completion before the
//! call fails with 504. Default: `30000`.
//!
//! ```rust
//! use brrtremoting::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_STACK_SIZE: usize = 0x10000;
const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Upper bound on a single remote call
    pub call_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }
}

fn parse_size(val: &str) -> Option<usize> {
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = env::var("BRREM_STACK_SIZE")
            .ok()
            .and_then(|v| parse_size(&v))
            .unwrap_or(DEFAULT_STACK_SIZE);
        let call_timeout_ms = env::var("BRREM_CALL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CALL_TIMEOUT_MS);
        RuntimeConfig {
            stack_size,
            call_timeout: Duration::from_millis(call_timeout_ms),
        }
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0x4000"), Some(0x4000));
        assert_eq!(parse_size("32768"), Some(32768));
        assert_eq!(parse_size("lots"), None);
    }

    #[test]
    fn test_env_override() {
        env::set_var("BRREM_STACK_SIZE", "0x8000");
        env::set_var("BRREM_CALL_TIMEOUT_MS", "250");
        let config = RuntimeConfig::from_env();
        env::remove_var("BRREM_STACK_SIZE");
        env::remove_var("BRREM_CALL_TIMEOUT_MS");
        assert_eq!(config.stack_size, 0x8000);
        assert_eq!(config.call_timeout, Duration::from_millis(250));
    }
}
