//! Provider adapters
//!
//! Each backend projects one [`TransformSpec`] onto its own wire shape and
//! knows where the generated text lives in its reply. Adapters are pure: the
//! request is executed by [`crate::http::HttpClient`], and adapters never call
//! each other.
//!
//! - Anthropic: instruction in a top-level `system` field, `x-api-key` header
//! - OpenAI: instruction as the first `system` turn, bearer token
//! - Gemini: `systemInstruction` + `contents`, key in the query string

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use crate::types::{Credential, Provider, TransformSpec};
use serde_json::Value;
use std::fmt;
use url::Url;

/// One fully projected outbound request
#[derive(Clone)]
pub struct ProviderRequest {
    pub provider: Provider,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl ProviderRequest {
    /// Header value by name, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// URL with query values and userinfo removed, safe for logs
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        let _ = url.set_password(None);
        let _ = url.set_username("");
        url.to_string()
    }
}

impl fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("ProviderRequest")
            .field("provider", &self.provider)
            .field("url", &self.redacted_url())
            .field("headers", &header_names)
            .field("body", &self.body)
            .finish()
    }
}

/// Wire projection for one text-generation backend
pub trait ProviderAdapter: Send + Sync {
    /// Backend this adapter speaks to
    fn provider(&self) -> Provider;

    /// Project a compiled transform and its input onto exactly one request
    fn build_request(
        &self,
        spec: &TransformSpec,
        input: &str,
        credential: &Credential,
        model: &str,
        base_url: &Url,
    ) -> ProviderRequest;

    /// Primary generated text of a reply, `""` when the field path is absent
    fn extract_text(&self, body: &Value) -> String;
}

static ANTHROPIC: AnthropicAdapter = AnthropicAdapter;
static OPENAI: OpenAiAdapter = OpenAiAdapter;
static GEMINI: GeminiAdapter = GeminiAdapter;

/// Adapter for a provider
pub fn adapter_for(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::Anthropic => &ANTHROPIC,
        Provider::OpenAi => &OPENAI,
        Provider::Gemini => &GEMINI,
    }
}

/// Join a path onto a base URL, keeping any path prefix the base carries
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let joined = format!(
        "{}/{}",
        base_url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}

/// Follow a path of object keys and array indices to a string leaf
pub(crate) fn string_at(body: &Value, pointer: &str) -> String {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
