//! End-to-end conversions against mock provider endpoints
//!
//! Each test stands up a mockito server, points the converter's base URL for
//! one provider at it, and checks both the request that went out and the
//! normalized result that came back. Failure modes mockito cannot produce
//! (truncated bodies, unanswered requests) use a bare TCP listener.

use chrono::Utc;
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use recast_core::http::Url;
use recast_core::{
    compile, CancellationToken, Converter, ErrorKind, HttpClient, HttpClientConfig, KeyStore,
    Language, Preset, PresetDraft, Provider, TimeoutConfig, TransformResult,
};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn converter_for(provider: Provider, server: &Server) -> Converter {
    let url = Url::parse(&server.url()).unwrap();
    let config = HttpClientConfig::default().with_base_url(provider, url);
    Converter::new(HttpClient::new(config).unwrap())
}

fn keys() -> KeyStore {
    KeyStore::new()
        .with_key(Provider::Anthropic, "ant-key")
        .with_key(Provider::OpenAi, "sk-test")
        .with_key(Provider::Gemini, "AIza-test")
}

fn preset(provider: Provider, model: &str, mode: &str) -> Preset {
    Preset::create(
        PresetDraft::new("test", provider, model)
            .with_mode(mode)
            .with_language(Language::Ja)
            .with_temperature(0.7)
            .with_max_tokens(500),
        Utc::now(),
    )
}

#[tokio::test]
async fn test_openai_summarize_scenario() {
    let mut server = Server::new_async().await;
    let preset = preset(Provider::OpenAi, "gpt-4o", "summarize");
    let instruction = compile(&preset).instruction;

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("主要な情報のみを抽出し".to_string()),
            Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "temperature": 0.7,
                "max_tokens": 500,
                "messages": [
                    { "role": "system", "content": instruction },
                    { "role": "user", "content": "long paragraph" }
                ]
            })),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"要約結果"}}]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::OpenAi, &server)
        .convert(&preset, "long paragraph", &keys())
        .await;

    mock.assert_async().await;
    assert_eq!(
        result,
        TransformResult::Success {
            text: "要約結果".to_string()
        }
    );
}

#[tokio::test]
async fn test_openai_json_mode_sets_response_format() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":" {\"items\": [1, 2]} "}}]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::OpenAi, &server)
        .convert(&preset(Provider::OpenAi, "gpt-4o", "json"), "a, b", &keys())
        .await;

    mock.assert_async().await;
    assert_eq!(result.text(), Some("{\"items\": [1, 2]}"));
}

#[tokio::test]
async fn test_anthropic_request_and_reply() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "ant-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-sonnet-4-5",
            "max_tokens": 500,
            "messages": [{ "role": "user", "content": "input text" }]
        })))
        .with_status(200)
        .with_body(r#"{"content":[{"type":"text","text":"\n- 項目\n"}]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::Anthropic, &server)
        .convert(
            &preset(Provider::Anthropic, "claude-sonnet-4-5", "bulletize"),
            "input text",
            &keys(),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result.text(), Some("- 項目"));
}

#[tokio::test]
async fn test_gemini_key_travels_in_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::UrlEncoded("key".to_string(), "AIza-test".to_string()))
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "input text" }] }],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 500,
                "responseMimeType": "application/json"
            }
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"{\"ok\":true}"}]}}]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::Gemini, &server)
        .convert(
            &preset(Provider::Gemini, "gemini-2.0-flash", "json"),
            "input text",
            &keys(),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(result.text(), Some("{\"ok\":true}"));
}

#[tokio::test]
async fn test_unauthorized_message_is_fixed_for_every_provider() {
    let cases = [
        (Provider::Anthropic, "claude-opus-4-5", "/v1/messages".to_string()),
        (Provider::OpenAi, "gpt-4o", "/v1/chat/completions".to_string()),
        (
            Provider::Gemini,
            "gemini-1.5-pro",
            "/v1beta/models/gemini-1.5-pro:generateContent".to_string(),
        ),
    ];

    for (provider, model, path) in cases {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", path.as_str())
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"message":"something provider specific"}}"#)
            .create_async()
            .await;

        let result = converter_for(provider, &server)
            .convert(&preset(provider, model, "summarize"), "text", &keys())
            .await;

        assert_eq!(
            result,
            TransformResult::Failure {
                kind: ErrorKind::HttpAuthFailed,
                message: "ERROR: 401 — API key invalid".to_string(),
            },
            "provider {}",
            provider
        );
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_body("")
        .create_async()
        .await;

    let result = converter_for(Provider::Anthropic, &server)
        .convert(
            &preset(Provider::Anthropic, "claude-haiku-4-5-20251001", "compress"),
            "text",
            &keys(),
        )
        .await;

    assert_eq!(result.message(), Some("ERROR: 429 — rate limit exceeded"));
}

#[tokio::test]
async fn test_other_status_carries_provider_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .with_body(r#"{"error":{"message":"The model `gpt-9` does not exist"}}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::OpenAi, &server)
        .convert(&preset(Provider::OpenAi, "gpt-9", "expand"), "text", &keys())
        .await;

    assert_eq!(
        result.message(),
        Some("ERROR: 404 — The model `gpt-9` does not exist")
    );
}

#[tokio::test]
async fn test_server_error_with_html_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("<html>unavailable</html>")
        .create_async()
        .await;

    let result = converter_for(Provider::Gemini, &server)
        .convert(
            &preset(Provider::Gemini, "gemini-2.0-flash", "outline"),
            "text",
            &keys(),
        )
        .await;

    assert_eq!(result.message(), Some("ERROR: 503"));
}

#[tokio::test]
async fn test_missing_field_yields_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::OpenAi, &server)
        .convert(&preset(Provider::OpenAi, "gpt-4o", "summarize"), "text", &keys())
        .await;

    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::EmptyResponse,
            message: "ERROR: empty response".to_string(),
        }
    );
}

#[tokio::test]
async fn test_non_json_success_body_yields_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body("plain text")
        .create_async()
        .await;

    let result = converter_for(Provider::Anthropic, &server)
        .convert(
            &preset(Provider::Anthropic, "claude-opus-4-5", "summarize"),
            "text",
            &keys(),
        )
        .await;

    assert_eq!(result.message(), Some("ERROR: empty response"));
}

#[tokio::test]
async fn test_invalid_json_reply_in_json_mode() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content":[{"type":"text","text":"not json"}]}"#)
        .create_async()
        .await;

    let result = converter_for(Provider::Anthropic, &server)
        .convert(
            &preset(Provider::Anthropic, "claude-opus-4-5", "json"),
            "text",
            &keys(),
        )
        .await;

    assert_eq!(
        result.message(),
        Some("ERROR: invalid JSON returned\n\nnot json")
    );
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = converter_for(Provider::Gemini, &server)
        .convert(
            &preset(Provider::Gemini, "gemini-2.0-flash", "summarize"),
            "text",
            &KeyStore::new().with_key(Provider::OpenAi, "sk-test"),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::MissingCredential,
            message: "ERROR: API key not set for provider: gemini".to_string(),
        }
    );
}

#[tokio::test]
async fn test_connection_failure_is_reclassified() {
    let config = HttpClientConfig::default()
        .with_base_url(Provider::Gemini, Url::parse("http://127.0.0.1:1").unwrap());
    let converter = Converter::new(HttpClient::new(config).unwrap());

    let result = converter
        .convert(
            &preset(Provider::Gemini, "gemini-2.0-flash", "summarize"),
            "text",
            &keys(),
        )
        .await;

    match result {
        TransformResult::Failure { kind, message } => {
            assert_eq!(kind, ErrorKind::Transport);
            assert!(message.starts_with("ERROR: network failure"));
            assert!(!message.contains("AIza-test"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_conversions_are_independent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"done"}}]}"#)
        .expect(4)
        .create_async()
        .await;

    let converter = converter_for(Provider::OpenAi, &server);
    let keys = keys();
    let presets: Vec<Preset> = ["summarize", "expand", "outline", "invert"]
        .iter()
        .map(|mode| preset(Provider::OpenAi, "gpt-4o", mode))
        .collect();

    let results = futures_join(&converter, &presets, &keys).await;
    assert!(results.iter().all(|r| r.text() == Some("done")));
}

async fn futures_join(
    converter: &Converter,
    presets: &[Preset],
    keys: &KeyStore,
) -> Vec<TransformResult> {
    let mut handles = Vec::new();
    for preset in presets {
        let converter = converter.clone();
        let preset = preset.clone();
        let keys = keys.clone();
        handles.push(tokio::spawn(async move {
            converter.convert(&preset, "text", &keys).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

/// Read one HTTP request off `stream`, headers and body
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

/// Serve one connection: read the request, then write `reply` and close
async fn one_shot_server(reply: &'static [u8]) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        stream.write_all(reply).await.unwrap();
        stream.shutdown().await.ok();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// Accept one connection, read the request and never answer
async fn silent_server() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

fn converter_at(provider: Provider, url: Url, timeout: TimeoutConfig) -> Converter {
    let config = HttpClientConfig::default()
        .with_base_url(provider, url)
        .with_timeout(timeout);
    Converter::new(HttpClient::new(config).unwrap())
}

#[tokio::test]
async fn test_401_with_truncated_body_still_classified() {
    let url = one_shot_server(
        b"HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"err",
    )
    .await;

    let result = converter_at(Provider::OpenAi, url, TimeoutConfig::default())
        .convert(&preset(Provider::OpenAi, "gpt-4o", "summarize"), "text", &keys())
        .await;

    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::HttpAuthFailed,
            message: "ERROR: 401 — API key invalid".to_string(),
        }
    );
}

#[tokio::test]
async fn test_500_with_truncated_body_has_no_provider_message() {
    let url = one_shot_server(
        b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 64\r\n\r\n{\"error\":{\"mess",
    )
    .await;

    let result = converter_at(Provider::Anthropic, url, TimeoutConfig::default())
        .convert(
            &preset(Provider::Anthropic, "claude-opus-4-5", "summarize"),
            "text",
            &keys(),
        )
        .await;

    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::HttpOther,
            message: "ERROR: 500".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unanswered_request_times_out() {
    let url = silent_server().await;
    let timeout = TimeoutConfig::new(Duration::from_secs(1), Duration::from_secs(1));

    let result = converter_at(Provider::OpenAi, url, timeout)
        .convert(&preset(Provider::OpenAi, "gpt-4o", "summarize"), "text", &keys())
        .await;

    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::Timeout,
            message: "ERROR: request timed out after 1s".to_string(),
        }
    );
}

#[tokio::test]
async fn test_in_flight_request_cancelled() {
    let url = silent_server().await;
    let converter = converter_at(Provider::Gemini, url, TimeoutConfig::default());

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let result = converter
        .convert_with_cancel(
            &preset(Provider::Gemini, "gemini-2.0-flash", "summarize"),
            "text",
            &keys(),
            &token,
        )
        .await;

    assert_eq!(
        result,
        TransformResult::Failure {
            kind: ErrorKind::Cancelled,
            message: "ERROR: request cancelled".to_string(),
        }
    );
}
