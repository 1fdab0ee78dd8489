//! One conversion, end to end
//!
//! credential → compile → adapter projection → one HTTP call → text
//! extraction → normalization. Every failure along the way becomes a
//! [`TransformResult::Failure`]; nothing panics and nothing is retried.

use crate::compiler::compile;
use crate::credentials::CredentialSource;
use crate::error::Result;
use crate::http::HttpClient;
use crate::normalizer::normalize_text;
use crate::providers::{adapter_for, ProviderRequest};
use crate::types::{Credential, Preset, TransformResult, TransformSpec};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Applies presets to text through the configured providers
///
/// Cloning is cheap and clones share the connection pool, so independent
/// conversions may run concurrently.
#[derive(Debug, Clone)]
pub struct Converter {
    client: HttpClient,
}

impl Converter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Converter with default timeouts and endpoints
    pub fn with_default_config() -> Result<Self> {
        Ok(Self::new(HttpClient::with_default_config()?))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Compile and project a request without sending it
    pub fn prepare(
        &self,
        preset: &Preset,
        input: &str,
        credential: &Credential,
    ) -> (TransformSpec, ProviderRequest) {
        let spec = compile(preset);
        let request = adapter_for(preset.provider).build_request(
            &spec,
            input,
            credential,
            &preset.model,
            self.client.base_url(preset.provider),
        );
        (spec, request)
    }

    /// Apply `preset` to `input`
    pub async fn convert<C>(&self, preset: &Preset, input: &str, credentials: &C) -> TransformResult
    where
        C: CredentialSource + ?Sized,
    {
        self.run(preset, input, credentials, None).await.into()
    }

    /// Apply `preset` to `input`, giving up when `token` is cancelled
    pub async fn convert_with_cancel<C>(
        &self,
        preset: &Preset,
        input: &str,
        credentials: &C,
        token: &CancellationToken,
    ) -> TransformResult
    where
        C: CredentialSource + ?Sized,
    {
        self.run(preset, input, credentials, Some(token)).await.into()
    }

    #[instrument(
        skip_all,
        fields(
            preset = %preset.name,
            provider = %preset.provider,
            model = %preset.model,
        )
    )]
    async fn run<C>(
        &self,
        preset: &Preset,
        input: &str,
        credentials: &C,
        token: Option<&CancellationToken>,
    ) -> Result<String>
    where
        C: CredentialSource + ?Sized,
    {
        let started = Instant::now();
        let credential = credentials.credential(preset.provider)?;
        let (spec, request) = self.prepare(preset, input, &credential);

        info!(
            mode = %spec.mode,
            format = %spec.output_format,
            input_chars = input.chars().count(),
            "Starting conversion"
        );

        let reply = match token {
            Some(token) => self.client.execute_with_cancel(&request, token).await,
            None => self.client.execute(&request).await,
        };

        let outcome = reply.and_then(|body| {
            let raw = adapter_for(preset.provider).extract_text(&body);
            normalize_text(&raw, spec.output_format)
        });

        match &outcome {
            Ok(text) => info!(
                duration_ms = started.elapsed().as_millis() as u64,
                output_chars = text.chars().count(),
                "Conversion completed"
            ),
            Err(err) => warn!(
                duration_ms = started.elapsed().as_millis() as u64,
                kind = %err.kind(),
                "Conversion failed"
            ),
        }

        outcome
    }
}
