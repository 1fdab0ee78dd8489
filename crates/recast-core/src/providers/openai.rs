//! OpenAI Chat Completions projection

use super::{endpoint, string_at, ProviderAdapter, ProviderRequest};
use crate::types::{Credential, OutputFormat, Provider, TransformSpec};
use serde_json::{json, Value};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Instruction as the leading `system` turn, bearer authorization
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn build_request(
        &self,
        spec: &TransformSpec,
        input: &str,
        credential: &Credential,
        model: &str,
        base_url: &Url,
    ) -> ProviderRequest {
        let mut body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": spec.instruction },
                { "role": "user", "content": input }
            ],
            "temperature": spec.generation.temperature,
            "max_tokens": spec.generation.max_tokens,
        });

        // Structured output is enforced by the API, not only by the prompt
        if spec.output_format == OutputFormat::Json {
            body["response_format"] = json!({ "type": "json_object" });
        }

        ProviderRequest {
            provider: Provider::OpenAi,
            url: endpoint(base_url, "/v1/chat/completions"),
            headers: vec![(
                "Authorization",
                format!("Bearer {}", credential.expose()),
            )],
            body,
        }
    }

    fn extract_text(&self, body: &Value) -> String {
        string_at(body, "/choices/0/message/content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::spec_for;

    fn request(mode: &str) -> ProviderRequest {
        let spec = spec_for(Provider::OpenAi, mode);
        OpenAiAdapter.build_request(
            &spec,
            "long paragraph",
            &Credential::new("sk-test"),
            "gpt-4o",
            &Url::parse(DEFAULT_BASE_URL).unwrap(),
        )
    }

    #[test]
    fn test_request_shape() {
        let req = request("summarize");
        assert_eq!(req.url.as_str(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(req.body["model"], "gpt-4o");
        assert_eq!(req.body["max_tokens"], 256);

        let messages = req.body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("主要な情報のみを抽出し"));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "long paragraph");
        assert!(req.body.get("response_format").is_none());
    }

    #[test]
    fn test_bearer_header() {
        let req = request("summarize");
        assert_eq!(req.header("authorization"), Some("Bearer sk-test"));
        assert!(req.url.query().is_none());
    }

    #[test]
    fn test_json_mode_requests_json_object() {
        let req = request("json");
        assert_eq!(req.body["response_format"], json!({ "type": "json_object" }));
    }

    #[test]
    fn test_extract_text() {
        let reply = json!({
            "choices": [{ "message": { "role": "assistant", "content": "要約結果" } }]
        });
        assert_eq!(OpenAiAdapter.extract_text(&reply), "要約結果");
        assert_eq!(OpenAiAdapter.extract_text(&json!({ "choices": [] })), "");
        assert_eq!(
            OpenAiAdapter.extract_text(&json!({ "choices": [{ "message": { "content": null } }] })),
            ""
        );
    }
}
