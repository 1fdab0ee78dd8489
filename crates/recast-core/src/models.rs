//! Known model identifiers per provider
//!
//! Presets may name any model; this list only drives suggestions and the
//! warning for an unrecognised id.

use crate::types::Provider;

const ANTHROPIC_MODELS: &[&str] = &[
    "claude-opus-4-5",
    "claude-sonnet-4-5",
    "claude-haiku-4-5-20251001",
];

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];

const GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
];

pub fn known_models(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Anthropic => ANTHROPIC_MODELS,
        Provider::OpenAi => OPENAI_MODELS,
        Provider::Gemini => GEMINI_MODELS,
    }
}

/// First listed model of a provider
pub fn default_model(provider: Provider) -> &'static str {
    known_models(provider)[0]
}

pub fn is_known_model(provider: Provider, model: &str) -> bool {
    known_models(provider).contains(&model)
}
