//! Error types for the Recast core library
//!
//! Every failure a conversion can produce collapses into [`Error`]. The
//! `Display` output of each variant is the exact user-facing message, so a
//! caller can surface `err.to_string()` verbatim.

use crate::types::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Recast operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No credential is stored for the preset's provider
    #[error("ERROR: API key not set for provider: {provider}")]
    MissingCredential { provider: Provider },

    /// Provider key is not one of the supported backends
    #[error("ERROR: unsupported provider: {name}")]
    UnsupportedProvider { name: String },

    /// Provider rejected the credential (HTTP 401)
    #[error("ERROR: 401 — API key invalid")]
    HttpAuthFailed,

    /// Provider throttled the request (HTTP 429)
    #[error("ERROR: 429 — rate limit exceeded")]
    HttpRateLimited,

    /// Any other non-success status
    #[error("ERROR: {status}{}", provider_suffix(.message))]
    HttpOther {
        status: u16,
        message: Option<String>,
    },

    /// Provider returned nothing usable
    #[error("ERROR: empty response")]
    EmptyResponse,

    /// Declared JSON output did not parse
    #[error("ERROR: invalid JSON returned\n\n{raw}")]
    InvalidFormat { raw: String },

    /// Connection-level failure before a status was received
    #[error("ERROR: network failure — {message}")]
    Transport { message: String },

    /// Request exceeded the configured timeout
    #[error("ERROR: request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Caller cancelled the in-flight request
    #[error("ERROR: request cancelled")]
    Cancelled,
}

fn provider_suffix(message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => format!(" — {}", msg),
        _ => String::new(),
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Stable tag for each error variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MissingCredential,
    UnsupportedProvider,
    HttpAuthFailed,
    HttpRateLimited,
    HttpOther,
    EmptyResponse,
    InvalidFormat,
    Transport,
    Timeout,
    Cancelled,
}

impl Error {
    /// Tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCredential { .. } => ErrorKind::MissingCredential,
            Error::UnsupportedProvider { .. } => ErrorKind::UnsupportedProvider,
            Error::HttpAuthFailed => ErrorKind::HttpAuthFailed,
            Error::HttpRateLimited => ErrorKind::HttpRateLimited,
            Error::HttpOther { .. } => ErrorKind::HttpOther,
            Error::EmptyResponse => ErrorKind::EmptyResponse,
            Error::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// True for failures detected before any network I/O
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential { .. } | Error::UnsupportedProvider { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ErrorKind::MissingCredential => "MISSING_CREDENTIAL",
            ErrorKind::UnsupportedProvider => "UNSUPPORTED_PROVIDER",
            ErrorKind::HttpAuthFailed => "HTTP_AUTH_FAILED",
            ErrorKind::HttpRateLimited => "HTTP_RATE_LIMITED",
            ErrorKind::HttpOther => "HTTP_OTHER",
            ErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Cancelled => "CANCELLED",
        };
        f.write_str(tag)
    }
}
