//! Anthropic Provider
//!
//! Messages API adapter. Authenticates with the `x-api-key` header and reads
//! the answer from `content[0].text`.

use async_trait::async_trait;
use tracing::debug;

use super::http_client::build_http_client;
use super::provider::{required_api_key, required_endpoint, send_json, str_at, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderKind};

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        if config.provider != ProviderKind::Anthropic {
            return Err(LlmError::InvalidConfig {
                message: format!("{} is not an Anthropic provider", config.provider),
            });
        }
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }

    /// Build the request body for the API
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let api_key = required_api_key(&self.config, self.name())?;
        let endpoint = required_endpoint(&self.config, self.name())?;
        debug!(provider = self.name(), model = %self.config.model, endpoint, "sending messages request");

        let request = self
            .client
            .post(endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let response = send_json(request, &self.build_request_body(prompt), self.name()).await?;

        str_at(&response, "/content/0/text")
            .map(str::to_string)
            .ok_or_else(|| LlmError::MissingField {
                field: "content[0].text".to_string(),
            })
    }
}
