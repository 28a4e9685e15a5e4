//! Runtime configuration
//!
//! Every setting has a working default so the service starts with no
//! environment at all. Environment variables override individual
//! settings; unparsable values are ignored and the default kept.

use std::env;
use std::time::Duration;

use crate::delivery::RetryPolicy;

/// Default TCP port for the HTTP API
pub const DEFAULT_PORT: u16 = 4000;

/// Default per-attempt timeout on outbound webhook requests
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Service configuration resolved at startup
#[derive(Debug, Clone, PartialEq)]
pub struct BusConfig {
    /// TCP port the HTTP API listens on
    pub port: u16,

    /// Retry policy for every delivery cycle
    pub retry: RetryPolicy,

    /// Per-attempt timeout on outbound webhook requests
    pub request_timeout: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl BusConfig {
    /// Build a configuration from the environment
    ///
    /// Recognized variables:
    /// - `EVENT_BUS_PORT`: HTTP listen port
    /// - `EVENT_BUS_MAX_ATTEMPTS`: delivery attempts per event (min 1)
    /// - `EVENT_BUS_RETRY_DELAY_MS`: pause between attempts
    /// - `EVENT_BUS_REQUEST_TIMEOUT_MS`: outbound request timeout
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = env::var("EVENT_BUS_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            }
        }

        if let Ok(attempts) = env::var("EVENT_BUS_MAX_ATTEMPTS") {
            if let Ok(attempts) = attempts.parse::<u32>() {
                config.retry.max_attempts = attempts.max(1);
            }
        }

        if let Ok(delay) = env::var("EVENT_BUS_RETRY_DELAY_MS") {
            if let Ok(delay) = delay.parse::<u64>() {
                config.retry.retry_delay = Duration::from_millis(delay);
            }
        }

        if let Ok(timeout) = env::var("EVENT_BUS_REQUEST_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                config.request_timeout = Duration::from_millis(timeout);
            }
        }

        config
    }
}
