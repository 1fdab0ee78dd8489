//! HTTP error classification
//!
//! Collapses a non-success reply from any provider into one [`Error`]. The
//! classifier never fails itself: a body that is absent or not JSON simply
//! contributes no provider message.

use crate::error::Error;
use serde_json::Value;

/// Map a non-success status and its parsed body to a classified error
pub fn classify(status: u16, body: Option<&Value>) -> Error {
    match status {
        401 => Error::HttpAuthFailed,
        429 => Error::HttpRateLimited,
        _ => Error::HttpOther {
            status,
            message: body.and_then(provider_message),
        },
    }
}

/// Parse a raw reply body and classify it
pub fn classify_raw(status: u16, raw_body: &str) -> Error {
    let parsed = serde_json::from_str::<Value>(raw_body).ok();
    classify(status, parsed.as_ref())
}

/// Human-readable message from `error.message` or a top-level `message`
fn provider_message(body: &Value) -> Option<String> {
    let nested = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());

    nested
        .or_else(|| {
            body.get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
        })
        .map(str::to_string)
}
