//! Diagnostics for the `recast` binary
//!
//! Installs the `tracing` subscriber (compact, full or JSON lines), tags every
//! invocation with a session id, and masks provider credentials before they
//! can reach a log line or a printed report.
//!
//! Logs always go to stderr; stdout carries only command output.

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Environment variable selecting the log line format
const LOG_FORMAT_ENV: &str = "RECAST_LOG_FORMAT";

/// Id shared by every span of one invocation
static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Subscriber settings derived from `-v` flags and the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `recast_core=debug`
    pub level: String,
    pub format: LogFormat,
    /// ANSI colors when stderr is a terminal
    pub console: bool,
    pub thread_ids: bool,
    /// File and line of each event
    pub source_location: bool,
    /// Emit an event when a span closes, with its busy time
    pub span_events: bool,
}

/// Shape of each log line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LogFormat {
    /// One short line per event
    Compact,
    /// Default `tracing_subscriber` layout with span context
    Full,
    /// Newline-delimited JSON objects
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbosity(1)
    }
}

impl LoggingConfig {
    /// Settings for `-v` repeated `verbosity` times
    ///
    /// No flag logs warnings only, so a conversion prints nothing but its
    /// result.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let (level, format) = match verbosity {
            0 => ("warn", LogFormat::Compact),
            1 => ("info", LogFormat::Compact),
            2 => ("debug", LogFormat::Compact),
            _ => ("trace", LogFormat::Full),
        };

        Self {
            level: level.to_string(),
            format,
            console: true,
            thread_ids: verbosity >= 3,
            source_location: verbosity >= 2,
            span_events: verbosity >= 3,
        }
    }

    /// `RUST_LOG` replaces the level; `RECAST_LOG_FORMAT` the format
    pub fn merge_with_env(&mut self) {
        if let Ok(directive) = std::env::var("RUST_LOG") {
            if !directive.trim().is_empty() {
                self.level = directive;
            }
        }

        if let Ok(value) = std::env::var(LOG_FORMAT_ENV) {
            match parse_format(&value) {
                Some(format) => self.format = format,
                None => eprintln!("Ignoring {}={}: expected compact, full or json", LOG_FORMAT_ENV, value),
            }
        }
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.trim().to_lowercase().as_str() {
        "compact" => Some(LogFormat::Compact),
        "full" => Some(LogFormat::Full),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// Install the global subscriber and assign the session id
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| {
        Error::other(format!("Invalid log filter '{}': {}", config.level, e))
    })?;
    let ansi = config.console && std::io::stderr().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(if config.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    // Each format is its own subscriber type
    let installed = match config.format {
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish())
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
        }
        LogFormat::Full => tracing::subscriber::set_global_default(builder.with_ansi(ansi).finish()),
    };
    installed.map_err(|e| Error::other(format!("Failed to install log subscriber: {}", e)))?;

    let session = SESSION_ID.get_or_init(generate_request_id);
    tracing::debug!(session = %session, level = %config.level, format = ?config.format, "Logging ready");

    Ok(())
}

/// Fresh id for one invocation
pub fn generate_request_id() -> String {
    format!("rc_{}", Uuid::new_v4().simple())
}

/// Session id, once logging is installed
pub fn current_request_id() -> Option<&'static str> {
    SESSION_ID.get().map(String::as_str)
}

/// Span for one timed operation, tagged with the session id
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        session = current_request_id().unwrap_or("-"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Credential masking for log lines, URLs and printed JSON
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    const MASK: &str = "***";

    /// Pattern and replacement pairs, applied in order
    fn rules() -> &'static [(Regex, &'static str)] {
        static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
        RULES.get_or_init(|| {
            [
                // key=value and header-style assignments
                (
                    r#"(?i)(x-api-key|api[_-]?key|apikey|token|bearer)[=:\s]+['"]?[A-Za-z0-9_.-]{10,}['"]?"#,
                    "$1=***",
                ),
                // Gemini takes its key in the query string
                (r"([?&]key=)[^&\s#]+", "${1}***"),
                // Bare provider keys: sk-..., sk-ant-..., AIza...
                (r"\b(sk-(?:ant-)?|AIza)[A-Za-z0-9_-]{8,}", "${1}***"),
            ]
            .into_iter()
            .map(|(pattern, replacement)| {
                (Regex::new(pattern).expect("Valid regex pattern"), replacement)
            })
            .collect()
        })
    }

    /// Mask anything in `input` that looks like a credential
    pub fn redact_sensitive(input: &str) -> String {
        rules()
            .iter()
            .fold(input.to_string(), |text, (regex, replacement)| {
                regex.replace_all(&text, *replacement).into_owned()
            })
    }

    /// Mask credential-named fields outright and scrub every other string
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, field) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *field = Value::String(MASK.to_string());
                    } else {
                        redact_json_value(field);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            Value::String(text) => *text = redact_sensitive(text),
            _ => {}
        }
    }

    /// Whether a field name denotes a secret
    ///
    /// `max_tokens` and friends are generation settings, not tokens.
    pub fn is_sensitive_key(key: &str) -> bool {
        let key = key.to_lowercase();
        let token = key.contains("token") && !key.contains("max");
        token
            || ["key", "secret", "credential", "auth"]
                .iter()
                .any(|marker| key.contains(marker))
    }
}

pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::Span;

    /// Logs the duration of an operation at debug level when dropped
    pub struct Timer {
        operation: String,
        span: Span,
        start: Instant,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::start(operation, None)
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::start(operation, Some(details))
        }

        fn start(operation: &str, details: Option<&str>) -> Self {
            Self {
                operation: operation.to_string(),
                span: super::create_operation_span(operation, details),
                start: Instant::now(),
            }
        }

        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let millis = self.start.elapsed().as_millis() as u64;
            self.span.record("duration_ms", millis);
            tracing::debug!(operation = %self.operation, duration_ms = millis, "Finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::redaction::{is_sensitive_key, redact_json_value, redact_sensitive};
    use super::*;

    #[test]
    fn test_assignments_masked() {
        let line = "api_key=sk-1234567890abcdef token=bearer_xyz_123456";
        let masked = redact_sensitive(line);
        assert!(masked.contains("api_key=***"));
        assert!(masked.contains("token=***"));
        assert!(!masked.contains("1234567890abcdef"));
        assert!(!masked.contains("bearer_xyz_123456"));
    }

    #[test]
    fn test_gemini_query_key_masked() {
        let url = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=AIzaSecret&alt=json";
        let masked = redact_sensitive(url);
        assert!(masked.ends_with("?key=***&alt=json"));
        assert!(!masked.contains("AIzaSecret"));
    }

    #[test]
    fn test_bare_provider_keys_masked() {
        let masked = redact_sensitive("failed with sk-ant-api03-abcdefgh1234 and AIzaSyD-abcdefgh123");
        assert_eq!(masked, "failed with sk-ant-*** and AIza***");
    }

    #[test]
    fn test_json_fields_masked() {
        let mut value = serde_json::json!({
            "api_key": "sk-1234567890abcdef",
            "model": "gpt-4o",
            "max_tokens": 500,
            "headers": {
                "Authorization": "Bearer token123",
                "x-api-key": "ant-key"
            },
            "url": "https://example.test/v1?key=secret"
        });

        redact_json_value(&mut value);

        assert_eq!(value["api_key"], "***");
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["headers"]["Authorization"], "***");
        assert_eq!(value["headers"]["x-api-key"], "***");
        assert_eq!(value["url"], "https://example.test/v1?key=***");
    }

    #[test]
    fn test_generation_settings_not_sensitive() {
        assert!(!is_sensitive_key("max_tokens"));
        assert!(!is_sensitive_key("temperature"));
        assert!(is_sensitive_key("refresh_token"));
        assert!(is_sensitive_key("anthropic-api-key"));
    }

    #[test]
    fn test_verbosity_levels() {
        let quiet = LoggingConfig::from_verbosity(0);
        assert_eq!(quiet.level, "warn");
        assert!(!quiet.source_location);

        let debug = LoggingConfig::from_verbosity(2);
        assert_eq!(debug.level, "debug");
        assert!(debug.source_location);
        assert!(!debug.span_events);

        let trace = LoggingConfig::from_verbosity(5);
        assert_eq!(trace.level, "trace");
        assert_eq!(trace.format, LogFormat::Full);
        assert!(trace.thread_ids);
        assert!(trace.span_events);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("JSON"), Some(LogFormat::Json));
        assert_eq!(parse_format(" full "), Some(LogFormat::Full));
        assert_eq!(parse_format("pretty"), None);
    }

    #[test]
    fn test_request_ids_unique() {
        let first = generate_request_id();
        assert!(first.starts_with("rc_"));
        assert_ne!(first, generate_request_id());
    }
}
