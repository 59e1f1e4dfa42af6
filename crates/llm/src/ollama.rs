//! Ollama Provider
//!
//! Local inference through the `/api/generate` endpoint. No API key; the
//! answer is the `response` field of a single non-streamed JSON document.

use async_trait::async_trait;
use tracing::debug;

use super::http_client::build_http_client;
use super::provider::{required_endpoint, send_json, str_at, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, ProviderKind};

/// Ollama provider for local inference
pub struct OllamaProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        if config.provider != ProviderKind::Ollama {
            return Err(LlmError::InvalidConfig {
                message: format!("{} is not an Ollama provider", config.provider),
            });
        }
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let endpoint = required_endpoint(&self.config, self.name())?;
        debug!(provider = self.name(), model = %self.config.model, endpoint, "sending generate request");

        let request = self.client.post(endpoint);
        let response = send_json(request, &self.build_request_body(prompt), self.name())
            .await
            .map_err(|e| match e {
                LlmError::NetworkError { message } => LlmError::NetworkError {
                    message: format!("Cannot connect to Ollama at {}: {}", endpoint, message),
                },
                LlmError::ModelNotFound { .. } => LlmError::ModelNotFound {
                    model: self.config.model.clone(),
                },
                other => other,
            })?;

        str_at(&response, "/response")
            .map(str::to_string)
            .ok_or_else(|| LlmError::MissingField {
                field: "response".to_string(),
            })
    }
}
