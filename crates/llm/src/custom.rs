//! Custom Provider
//!
//! Any self-hosted or third-party endpoint that accepts the OpenAI request
//! shape. Response shapes vary between such servers, so extraction walks a
//! fixed fallback list.

use async_trait::async_trait;
use tracing::debug;

use super::http_client::build_http_client;
use super::openai::CHOICES_CONTENT;
use super::provider::{chat_completion_body, required_api_key, required_endpoint, send_json, str_at, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderKind};

/// Response fields tried in order; the first non-empty string wins.
const EXTRACTION_ORDER: [&str; 3] = [CHOICES_CONTENT, "/response", "/text"];

/// Provider for a user-supplied endpoint
pub struct CustomProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl CustomProvider {
    /// Create a new custom provider; the config must carry an endpoint
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        if config.provider != ProviderKind::Custom {
            return Err(LlmError::InvalidConfig {
                message: format!("{} is not a custom provider", config.provider),
            });
        }
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }
}

/// Pull the answer out of a custom provider response.
pub(crate) fn extract_custom_text(body: &serde_json::Value) -> Option<&str> {
    EXTRACTION_ORDER
        .iter()
        .filter_map(|pointer| str_at(body, pointer))
        .find(|text| !text.is_empty())
}

#[async_trait]
impl LlmProvider for CustomProvider {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let api_key = required_api_key(&self.config, self.name())?;
        let endpoint = required_endpoint(&self.config, self.name())?;
        debug!(provider = self.name(), model = %self.config.model, endpoint, "sending custom completion");

        let body = chat_completion_body(&self.config.model, prompt);
        let request = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", api_key));
        let response = send_json(request, &body, self.name()).await?;

        extract_custom_text(&response)
            .map(str::to_string)
            .ok_or_else(|| LlmError::MissingField {
                field: "choices[0].message.content | response | text".to_string(),
            })
    }
}
