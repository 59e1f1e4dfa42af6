//! Provider Client
//!
//! Closed dispatch over the supported provider kinds. `ProviderClient` is the
//! value the rest of the application holds; it picks the wire shape from
//! `ProviderConfig::provider` once, at construction.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::anthropic::AnthropicProvider;
use super::custom::CustomProvider;
use super::ollama::OllamaProvider;
use super::openai::OpenAIProvider;
use super::provider::LlmProvider;
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderKind};

/// A configured provider of one of the supported kinds
pub enum ProviderClient {
    OpenAI(OpenAIProvider),
    Anthropic(AnthropicProvider),
    Groq(OpenAIProvider),
    Ollama(OllamaProvider),
    Custom(CustomProvider),
}

impl ProviderClient {
    /// Validate the config and build the matching provider.
    pub fn from_config(config: ProviderConfig) -> LlmResult<Self> {
        config.validate().map_err(|message| {
            warn!(provider = %config.provider, %message, "rejected provider configuration");
            LlmError::InvalidConfig { message }
        })?;

        debug!(provider = %config.provider, model = %config.model, "building provider client");
        Ok(match config.provider {
            ProviderKind::OpenAI => ProviderClient::OpenAI(OpenAIProvider::new(config)?),
            ProviderKind::Anthropic => ProviderClient::Anthropic(AnthropicProvider::new(config)?),
            ProviderKind::Groq => ProviderClient::Groq(OpenAIProvider::new(config)?),
            ProviderKind::Ollama => ProviderClient::Ollama(OllamaProvider::new(config)?),
            ProviderKind::Custom => ProviderClient::Custom(CustomProvider::new(config)?),
        })
    }

    /// The kind this client was built for.
    pub fn kind(&self) -> ProviderKind {
        self.config().provider
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            ProviderClient::OpenAI(p) | ProviderClient::Groq(p) => p,
            ProviderClient::Anthropic(p) => p,
            ProviderClient::Ollama(p) => p,
            ProviderClient::Custom(p) => p,
        }
    }
}

#[async_trait]
impl LlmProvider for ProviderClient {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn config(&self) -> &ProviderConfig {
        self.inner().config()
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.inner().complete(prompt).await
    }
}

/// One-shot call: build a client for `config` and send `prompt`.
pub async fn invoke(prompt: &str, config: &ProviderConfig) -> LlmResult<String> {
    ProviderClient::from_config(config.clone())?
        .complete(prompt)
        .await
}
