//! HTTP layer for provider API communication
//!
//! - Request execution with bounded timeouts and cancellation
//! - Error classification shared by every provider

pub mod client;
pub mod error;
pub mod timeout;

pub use client::{Endpoints, HttpClient, HttpClientConfig};
pub use error::{classify, classify_raw};
pub use timeout::TimeoutConfig;

// Re-export commonly used types
pub use reqwest::StatusCode;
pub use url::Url;
