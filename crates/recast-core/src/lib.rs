//! Recast Core - preset-driven text transformation through LLM providers
//!
//! This crate turns a user-selected [`Preset`] into a provider-agnostic
//! [`TransformSpec`], projects it onto one of three provider wire protocols,
//! and normalizes the reply into a uniform [`TransformResult`].
//!
//! # Main Components
//!
//! - **Mode Catalog**: instruction fragment and output format per transform mode
//! - **Spec Compiler**: pure `Preset → TransformSpec` mapping
//! - **Provider Adapters**: Anthropic, OpenAI and Gemini request projections
//! - **HTTP Client**: one bounded, cancellable request per conversion
//! - **Response Normalization**: trimming and JSON validation of replies
//!
//! # Example
//!
//! ```no_run
//! use recast_core::{Converter, KeyStore, Preset, PresetDraft, Provider};
//!
//! # async fn example() -> recast_core::Result<()> {
//! let preset = Preset::create(
//!     PresetDraft::new("summary", Provider::OpenAi, "gpt-4o").with_mode("summarize"),
//!     chrono::Utc::now(),
//! );
//! let converter = Converter::with_default_config()?;
//! let result = converter.convert(&preset, "long paragraph", &KeyStore::from_env()).await;
//! println!("{}", result.display_text());
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod http;
pub mod models;
pub mod modes;
pub mod normalizer;
pub mod providers;
pub mod types;

// Re-export main types for convenience
pub use compiler::compile;
pub use convert::Converter;
pub use credentials::{CredentialSource, KeyStore};
pub use error::{Error, ErrorKind, Result};
pub use http::{HttpClient, HttpClientConfig, TimeoutConfig};
pub use modes::{lookup, ModeDefinition};
pub use normalizer::normalize;
pub use providers::{adapter_for, ProviderAdapter, ProviderRequest};
pub use types::{
    Credential, GenerationParams, Language, OutputFormat, Preset, PresetDraft, Provider,
    TransformResult, TransformSpec,
};

pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
