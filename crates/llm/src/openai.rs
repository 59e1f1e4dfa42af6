//! OpenAI Provider
//!
//! Chat-completions adapter for OpenAI and for OpenAI-compatible hosted APIs
//! such as Groq. Both use bearer auth and answer in
//! `choices[0].message.content`.

use async_trait::async_trait;
use tracing::debug;

use super::http_client::build_http_client;
use super::provider::{chat_completion_body, required_api_key, required_endpoint, send_json, str_at, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderKind};

/// JSON pointer to the assistant text in a chat-completions response
pub(crate) const CHOICES_CONTENT: &str = "/choices/0/message/content";

/// OpenAI-compatible chat completions provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider for an OpenAI or Groq configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        if !matches!(config.provider, ProviderKind::OpenAI | ProviderKind::Groq) {
            return Err(LlmError::InvalidConfig {
                message: format!("{} is not an OpenAI-compatible provider", config.provider),
            });
        }
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        match self.config.provider {
            ProviderKind::Groq => "groq",
            _ => "openai",
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let api_key = required_api_key(&self.config, self.name())?;
        let endpoint = required_endpoint(&self.config, self.name())?;
        debug!(provider = self.name(), model = %self.config.model, endpoint, "sending chat completion");

        let body = chat_completion_body(&self.config.model, prompt);
        let request = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", api_key));
        let response = send_json(request, &body, self.name()).await?;

        str_at(&response, CHOICES_CONTENT)
            .map(str::to_string)
            .ok_or_else(|| LlmError::MissingField {
                field: "choices[0].message.content".to_string(),
            })
    }
}
