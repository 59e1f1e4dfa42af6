//! LLM Provider Trait
//!
//! Defines the common interface for all providers, plus the request and
//! response helpers they share.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::types::{LlmError, LlmResult, ProviderConfig};

/// Trait that all providers implement.
///
/// A provider turns one prompt into the model's raw text answer. It performs
/// exactly one HTTP call and never retries.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;

    /// Returns the model being used.
    fn model(&self) -> &str {
        &self.config().model
    }

    /// Send a single user prompt and return the raw model output.
    async fn complete(&self, prompt: &str) -> LlmResult<String>;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("{}: HTTP {}: {}", provider, status, body),
        },
    }
}

/// The configured API key, or an authentication error naming the provider.
pub(crate) fn required_api_key<'a>(config: &'a ProviderConfig, provider: &str) -> LlmResult<&'a str> {
    config.api_key().ok_or_else(|| missing_api_key_error(provider))
}

/// The endpoint to call, or a configuration error when there is none.
pub(crate) fn required_endpoint<'a>(config: &'a ProviderConfig, provider: &str) -> LlmResult<&'a str> {
    config
        .resolved_endpoint()
        .ok_or_else(|| LlmError::InvalidConfig {
            message: format!("{}: endpoint is required", provider),
        })
}

/// Send a JSON request and decode the JSON body of a 2xx response.
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    body: &Value,
    provider: &str,
) -> LlmResult<Value> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

    let status = response.status();
    let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
        message: e.to_string(),
    })?;

    debug!(provider, status = status.as_u16(), bytes = body_text.len(), "provider responded");

    if !status.is_success() {
        return Err(parse_http_error(status.as_u16(), &body_text, provider));
    }

    serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
        message: format!("Failed to parse {} response: {}", provider, e),
    })
}

/// Body for OpenAI-compatible chat completion endpoints.
pub(crate) fn chat_completion_body(model: &str, prompt: &str) -> Value {
    serde_json::json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
    })
}

/// Read a string at a JSON pointer such as `/choices/0/message/content`.
pub(crate) fn str_at<'a>(body: &'a Value, pointer: &str) -> Option<&'a str> {
    body.pointer(pointer).and_then(Value::as_str)
}
