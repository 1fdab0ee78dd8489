//! Core types and data structures for the Recast transform engine
//!
//! This module defines the records the engine consumes (presets, credentials),
//! the compiled [`TransformSpec`] handed to provider adapters, and the uniform
//! [`TransformResult`] returned to callers.

use crate::error::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported text-generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provider {
    Anthropic,
    OpenAi,
    Gemini,
}

impl Provider {
    /// All providers in display order
    pub const ALL: [Provider; 3] = [Provider::Anthropic, Provider::OpenAi, Provider::Gemini];

    /// Storage key of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            _ => Err(Error::UnsupportedProvider {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Provider {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.as_str().to_string()
    }
}

/// Output language of a transformation
///
/// Japanese is the primary language. Any stored value other than `"en"`
/// resolves to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::from(value.as_str())
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("en") {
            Language::En
        } else {
            Language::Ja
        }
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

/// Declared shape of the generated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// A named, persisted bundle of provider, model, mode and generation settings
///
/// Field names follow the camelCase layout presets have always been stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Identity, immutable after creation
    pub id: Uuid,

    pub name: String,

    pub provider: Provider,

    pub model: String,

    /// Key into the mode catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetDraft {
    pub name: String,
    pub provider: Provider,
    pub model: String,
    #[serde(default)]
    pub transform_mode: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl PresetDraft {
    /// Start a draft with the form defaults
    pub fn new(name: impl Into<String>, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider,
            model: model.into(),
            transform_mode: None,
            language: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.transform_mode = Some(mode.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Blank names become "preset" and a zero token budget is dropped
    fn sanitized(mut self) -> Self {
        let trimmed = self.name.trim();
        self.name = if trimmed.is_empty() {
            "preset".to_string()
        } else {
            trimmed.to_string()
        };
        if self.max_tokens == Some(0) {
            self.max_tokens = None;
        }
        self
    }
}

impl Preset {
    /// Create a preset with a fresh id
    pub fn create(draft: PresetDraft, now: DateTime<Utc>) -> Self {
        let draft = draft.sanitized();
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            provider: draft.provider,
            model: draft.model,
            transform_mode: draft.transform_mode,
            language: draft.language,
            temperature: draft.temperature,
            max_tokens: draft.max_tokens,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every field except `id` and `created_at`
    pub fn overwrite(&mut self, draft: PresetDraft, now: DateTime<Utc>) {
        let draft = draft.sanitized();
        self.name = draft.name;
        self.provider = draft.provider;
        self.model = draft.model;
        self.transform_mode = draft.transform_mode;
        self.language = draft.language;
        self.temperature = draft.temperature;
        self.max_tokens = draft.max_tokens;
        self.updated_at = now;
    }

    /// Current editable fields
    pub fn draft(&self) -> PresetDraft {
        PresetDraft {
            name: self.name.clone(),
            provider: self.provider,
            model: self.model.clone(),
            transform_mode: self.transform_mode.clone(),
            language: self.language,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Generation parameters after defaulting and clamping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Always within `[0, 1]`
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Provider-agnostic instruction object compiled from a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Resolved mode identifier
    pub mode: String,

    /// Fully composed system-level directive
    pub instruction: String,

    pub output_language: Language,

    pub output_format: OutputFormat,

    pub generation: GenerationParams,
}

/// Outcome of one conversion
#[derive(Debug, Clone, PartialEq)]
pub enum TransformResult {
    Success { text: String },
    Failure { kind: ErrorKind, message: String },
}

impl TransformResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, TransformResult::Success { .. })
    }

    /// Generated text, if the conversion succeeded
    pub fn text(&self) -> Option<&str> {
        match self {
            TransformResult::Success { text } => Some(text),
            TransformResult::Failure { .. } => None,
        }
    }

    /// Error message, if the conversion failed
    pub fn message(&self) -> Option<&str> {
        match self {
            TransformResult::Success { .. } => None,
            TransformResult::Failure { message, .. } => Some(message),
        }
    }

    /// Text on success, message on failure
    pub fn display_text(&self) -> &str {
        match self {
            TransformResult::Success { text } => text,
            TransformResult::Failure { message, .. } => message,
        }
    }
}

impl From<Error> for TransformResult {
    fn from(err: Error) -> Self {
        TransformResult::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<crate::Result<String>> for TransformResult {
    fn from(result: crate::Result<String>) -> Self {
        match result {
            Ok(text) => TransformResult::Success { text },
            Err(err) => err.into(),
        }
    }
}

impl Serialize for TransformResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransformResult::Success { text } => {
                let mut state = serializer.serialize_struct("TransformResult", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("text", text)?;
                state.end()
            }
            TransformResult::Failure { kind, message } => {
                let mut state = serializer.serialize_struct("TransformResult", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("kind", kind)?;
                state.serialize_field("message", message)?;
                state.end()
            }
        }
    }
}

/// Opaque API secret for one provider
///
/// Neither `Debug` nor `Display` reveal the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for the single authorization value of a request
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
