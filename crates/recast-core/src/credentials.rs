//! Credential resolution
//!
//! The core never stores secrets on its own: callers hand in a
//! [`CredentialSource`] and the converter asks it for exactly one credential
//! per conversion. A missing key surfaces as [`Error::MissingCredential`]
//! before any request is built.

use crate::error::{Error, Result};
use crate::types::{Credential, Provider};
use std::collections::HashMap;

/// Anything that can hand out a credential per provider
pub trait CredentialSource: Send + Sync {
    fn credential(&self, provider: Provider) -> Result<Credential>;
}

/// Environment variable consulted for a provider's key
pub fn env_var_name(provider: Provider) -> &'static str {
    match provider {
        Provider::Anthropic => "ANTHROPIC_API_KEY",
        Provider::OpenAi => "OPENAI_API_KEY",
        Provider::Gemini => "GEMINI_API_KEY",
    }
}

/// In-memory per-provider key store
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    keys: HashMap<Provider, Credential>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every provider key present in the environment
    pub fn from_env() -> Self {
        let mut store = Self::new();
        for provider in Provider::ALL {
            if let Ok(value) = std::env::var(env_var_name(provider)) {
                store.insert(provider, value);
            }
        }
        store
    }

    /// Store a key; blank values are ignored
    pub fn insert(&mut self, provider: Provider, secret: impl Into<String>) {
        let secret = secret.into();
        let trimmed = secret.trim();
        if !trimmed.is_empty() {
            self.keys.insert(provider, Credential::new(trimmed));
        }
    }

    pub fn with_key(mut self, provider: Provider, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.keys.contains_key(&provider)
    }

    /// Keys in `other` take precedence
    pub fn merge(&mut self, other: KeyStore) {
        self.keys.extend(other.keys);
    }
}

impl CredentialSource for KeyStore {
    fn credential(&self, provider: Provider) -> Result<Credential> {
        self.keys
            .get(&provider)
            .cloned()
            .ok_or(Error::MissingCredential { provider })
    }
}

impl CredentialSource for Credential {
    fn credential(&self, _provider: Provider) -> Result<Credential> {
        Ok(self.clone())
    }
}
