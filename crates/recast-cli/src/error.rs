//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use recast_core::ErrorKind;
use std::io;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from recast-core, already phrased for the user
    #[error("{0}")]
    Core(#[from] recast_core::Error),

    /// A conversion reached the provider and failed
    #[error("{message}")]
    Conversion { kind: ErrorKind, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No preset matches the given name or id
    #[error("Preset '{}' not found", key)]
    PresetNotFound { key: String },

    #[error("ERROR: no preset selected")]
    NoPresetSelected,

    #[error("ERROR: missing input text")]
    MissingInput,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) | Self::Conversion { .. } => 2,
            Self::Config(_) => 5,
            Self::PresetNotFound { .. } => 6,
            Self::NoPresetSelected => 7,
            Self::MissingInput => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::MissingInput | Self::NoPresetSelected)
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    // Conversion failures carry their own "ERROR: ..." wording
    if matches!(
        error,
        Error::Core(_) | Error::Conversion { .. } | Error::NoPresetSelected | Error::MissingInput
    ) {
        return error.to_string();
    }

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
