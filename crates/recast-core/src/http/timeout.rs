//! Timeout configuration for provider requests
//!
//! The request timeout bounds the single outbound call of a conversion.

use std::time::Duration;

/// Connect timeout applied when none is configured
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request timeout applied when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect and whole-request bounds of one provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time allowed to establish the connection
    pub connect_timeout: Duration,
    /// Time allowed for the whole exchange, body included
    pub request_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl TimeoutConfig {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            request_timeout,
        }
    }

    /// Same connect bound, different request bound
    pub fn with_request_timeout(&self, request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..*self
        }
    }

    /// Both bounds non-zero, and the request bound covers the connect bound
    pub fn validate(&self) -> Result<(), String> {
        match (self.connect_timeout, self.request_timeout) {
            (connect, _) if connect.is_zero() => Err("connect timeout must be positive".to_string()),
            (_, request) if request.is_zero() => Err("request timeout must be positive".to_string()),
            (connect, request) if request < connect => Err(format!(
                "request timeout ({}s) is shorter than connect timeout ({}s)",
                request.as_secs_f64(),
                connect.as_secs_f64()
            )),
            _ => Ok(()),
        }
    }

    /// Whole seconds of the request timeout, rounded up
    pub fn request_timeout_secs(&self) -> u64 {
        ceil_secs(self.request_timeout)
    }

    /// Whole seconds of the connect timeout, rounded up
    pub fn connect_timeout_secs(&self) -> u64 {
        ceil_secs(self.connect_timeout)
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
