//! Anthropic Messages API projection

use super::{endpoint, string_at, ProviderAdapter, ProviderRequest};
use crate::types::{Credential, Provider, TransformSpec};
use serde_json::{json, Value};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

/// Instruction in the top-level `system` field, credential in `x-api-key`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn build_request(
        &self,
        spec: &TransformSpec,
        input: &str,
        credential: &Credential,
        model: &str,
        base_url: &Url,
    ) -> ProviderRequest {
        let body = json!({
            "model": model,
            "max_tokens": spec.generation.max_tokens,
            "temperature": spec.generation.temperature,
            "system": spec.instruction,
            "messages": [
                { "role": "user", "content": input }
            ],
        });

        ProviderRequest {
            provider: Provider::Anthropic,
            url: endpoint(base_url, "/v1/messages"),
            headers: vec![
                ("x-api-key", credential.expose().to_string()),
                ("anthropic-version", API_VERSION.to_string()),
            ],
            body,
        }
    }

    fn extract_text(&self, body: &Value) -> String {
        string_at(body, "/content/0/text")
    }
}
