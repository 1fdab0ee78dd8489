//! Reply normalization against the declared output format
//!
//! The normalizer trims and validates; it never reformats. Valid JSON is
//! returned byte-for-byte as the provider produced it, minus surrounding
//! whitespace.

use crate::error::{Error, Result};
use crate::types::{OutputFormat, TransformResult, TransformSpec};
use serde_json::Value;

/// Validate raw reply text against its declared output format
pub fn normalize(raw: &str, spec: &TransformSpec) -> TransformResult {
    normalize_text(raw, spec.output_format).into()
}

/// Result-returning form of [`normalize`]
pub fn normalize_text(raw: &str, format: OutputFormat) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyResponse);
    }

    if format == OutputFormat::Json && serde_json::from_str::<Value>(trimmed).is_err() {
        return Err(Error::InvalidFormat {
            raw: trimmed.to_string(),
        });
    }

    Ok(trimmed.to_string())
}
