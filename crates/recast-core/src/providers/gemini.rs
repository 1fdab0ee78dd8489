//! Gemini generateContent projection
//!
//! The API key is sent as the `key` query parameter. That puts the secret in
//! the request URL, a weaker boundary than the header-based schemes of the
//! other providers; `ProviderRequest::redacted_url` and the transport error
//! mapping strip it before anything is logged.

use super::{endpoint, string_at, ProviderAdapter, ProviderRequest};
use crate::types::{Credential, OutputFormat, Provider, TransformSpec};
use serde_json::{json, Value};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// `systemInstruction` + single-turn `contents`, key in the query string
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn build_request(
        &self,
        spec: &TransformSpec,
        input: &str,
        credential: &Credential,
        model: &str,
        base_url: &Url,
    ) -> ProviderRequest {
        let mut generation_config = json!({
            "temperature": spec.generation.temperature,
            "maxOutputTokens": spec.generation.max_tokens,
        });
        if spec.output_format == OutputFormat::Json {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": spec.instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": input }]
            }],
            "generationConfig": generation_config,
        });

        let mut url = endpoint(
            base_url,
            &format!("/v1beta/models/{}:generateContent", model),
        );
        url.query_pairs_mut().append_pair("key", credential.expose());

        ProviderRequest {
            provider: Provider::Gemini,
            url,
            headers: Vec::new(),
            body,
        }
    }

    fn extract_text(&self, body: &Value) -> String {
        string_at(body, "/candidates/0/content/parts/0/text")
    }
}
