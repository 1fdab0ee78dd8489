//! HTTP client executing projected provider requests
//!
//! One [`HttpClient`] can be shared by any number of concurrent conversions:
//! it holds only the connection pool and immutable configuration.

use crate::error::{Error, Result};
use crate::http::error::classify_raw;
use crate::http::timeout::TimeoutConfig;
use crate::providers::{anthropic, gemini, openai, ProviderRequest};
use crate::types::Provider;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Base URL per provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub anthropic: Url,
    pub openai: Url,
    pub gemini: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            anthropic: default_base_url(Provider::Anthropic),
            openai: default_base_url(Provider::OpenAi),
            gemini: default_base_url(Provider::Gemini),
        }
    }
}

impl Endpoints {
    pub fn base_url(&self, provider: Provider) -> &Url {
        match provider {
            Provider::Anthropic => &self.anthropic,
            Provider::OpenAi => &self.openai,
            Provider::Gemini => &self.gemini,
        }
    }

    pub fn set_base_url(&mut self, provider: Provider, url: Url) {
        match provider {
            Provider::Anthropic => self.anthropic = url,
            Provider::OpenAi => self.openai = url,
            Provider::Gemini => self.gemini = url,
        }
    }
}

fn default_base_url(provider: Provider) -> Url {
    let raw = match provider {
        Provider::Anthropic => anthropic::DEFAULT_BASE_URL,
        Provider::OpenAi => openai::DEFAULT_BASE_URL,
        Provider::Gemini => gemini::DEFAULT_BASE_URL,
    };
    Url::parse(raw).expect("Valid static base URL")
}

/// Configuration for the HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    pub timeout: TimeoutConfig,
    pub endpoints: Endpoints,
}

impl HttpClientConfig {
    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, provider: Provider, url: Url) -> Self {
        self.endpoints.set_base_url(provider, url);
        self
    }
}

/// Executes exactly one request per call
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.timeout.connect_timeout)
            .timeout(config.timeout.request_timeout)
            .build()
            .map_err(|e| Error::Transport {
                message: format!("failed to create HTTP client: {}", e.without_url()),
            })?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    pub fn with_default_config() -> Result<Self> {
        Self::new(HttpClientConfig::default())
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Base URL requests for `provider` are sent to
    pub fn base_url(&self, provider: Provider) -> &Url {
        self.config.endpoints.base_url(provider)
    }

    /// Send a request and return the parsed reply body
    ///
    /// A successful reply whose body is not JSON yields `Value::Null`, which
    /// every adapter reads as an empty reply.
    pub async fn execute(&self, request: &ProviderRequest) -> Result<Value> {
        debug!(
            provider = %request.provider,
            url = %request.redacted_url(),
            "Sending provider request"
        );

        let mut builder = self.client.post(request.url.clone()).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            // An unreadable error body carries no provider message
            let raw_body = response.text().await.unwrap_or_default();
            let error = classify_raw(status.as_u16(), &raw_body);
            warn!(
                provider = %request.provider,
                status = status.as_u16(),
                kind = %error.kind(),
                "Provider returned an error status"
            );
            return Err(error);
        }

        let raw_body = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(
            provider = %request.provider,
            status = status.as_u16(),
            bytes = raw_body.len(),
            "Provider reply received"
        );
        Ok(serde_json::from_str(&raw_body).unwrap_or(Value::Null))
    }

    /// Like [`execute`](Self::execute), abandoning the call when `token` fires
    pub async fn execute_with_cancel(
        &self,
        request: &ProviderRequest,
        token: &CancellationToken,
    ) -> Result<Value> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!(provider = %request.provider, "Provider request cancelled");
                Err(Error::Cancelled)
            }
            result = self.execute(request) => result,
        }
    }

    /// Reclassify a reqwest failure; the URL is dropped so a query credential
    /// never reaches an error message
    fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            self.timeout_error(error.is_connect())
        } else {
            Error::Transport {
                message: error.without_url().to_string(),
            }
        }
    }

    /// Timeout error naming the bound that was exceeded
    fn timeout_error(&self, while_connecting: bool) -> Error {
        let timeout = &self.config.timeout;
        Error::Timeout {
            seconds: if while_connecting {
                timeout.connect_timeout_secs()
            } else {
                timeout.request_timeout_secs()
            },
        }
    }
}
