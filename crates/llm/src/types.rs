//! LLM Types
//!
//! Configuration and error types for provider interactions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use ketu_core::{CoreError, ProxyConfig};

/// Supported AI provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Groq,
    Ollama,
    Custom,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "groq" => Ok(ProviderKind::Groq),
            "ollama" => Ok(ProviderKind::Ollama),
            "custom" => Ok(ProviderKind::Custom),
            other => Err(CoreError::parse(format!("unknown provider '{}'", other))),
        }
    }
}

impl ProviderKind {
    /// All provider kinds, in the order the configuration UI lists them.
    pub fn all() -> [ProviderKind; 5] {
        [
            ProviderKind::OpenAI,
            ProviderKind::Anthropic,
            ProviderKind::Groq,
            ProviderKind::Ollama,
            ProviderKind::Custom,
        ]
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Groq => "Groq",
            ProviderKind::Ollama => "Ollama",
            ProviderKind::Custom => "Custom",
        }
    }

    /// Every kind except the local Ollama server needs an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }

    /// Only custom providers have no built-in endpoint.
    pub fn requires_endpoint(&self) -> bool {
        matches!(self, ProviderKind::Custom)
    }

    /// Built-in endpoint used when the config carries no override.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some("https://api.openai.com/v1/chat/completions"),
            ProviderKind::Anthropic => Some("https://api.anthropic.com/v1/messages"),
            ProviderKind::Groq => Some("https://api.groq.com/openai/v1/chat/completions"),
            ProviderKind::Ollama => Some("http://localhost:11434/api/generate"),
            ProviderKind::Custom => None,
        }
    }

    /// Models offered as suggestions in the configuration panel.
    pub fn suggested_models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAI => &["gpt-4", "gpt-4o", "gpt-4o-mini"],
            ProviderKind::Anthropic => &["claude-3-5-sonnet-20241022", "claude-3-opus-20240229"],
            ProviderKind::Groq => &["llama3-70b-8192", "llama3-8b-8192", "mixtral-8x7b-32768"],
            ProviderKind::Ollama => &[
                "llama3",
                "llama2",
                "codellama",
                "mistral",
                "dolphin-mistral",
                "phi",
                "gemma",
            ],
            ProviderKind::Custom => &[],
        }
    }
}

/// Configuration for a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The provider kind
    pub provider: ProviderKind,
    /// API key (not needed for Ollama). Held in session memory only.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Model name to use
    pub model: String,
    /// Endpoint URL. Required for custom providers, an override otherwise.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endpoint: Option<String>,
    /// Maximum tokens to generate (sent to Anthropic only)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Optional proxy for outbound requests
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proxy: Option<ProxyConfig>,
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            api_key: None,
            model: "gpt-4".to_string(),
            endpoint: None,
            max_tokens: default_max_tokens(),
            proxy: None,
        }
    }
}

impl ProviderConfig {
    /// Create a config for the given kind and model with no credentials.
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Endpoint the adapter will call: the override if present, else the kind's default.
    pub fn resolved_endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.provider.default_endpoint())
    }

    /// The API key if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Validate the configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err(format!("{}: model must not be empty", self.provider));
        }
        if self.provider.requires_api_key() && self.api_key().is_none() {
            return Err(format!("API key not configured for {}", self.provider));
        }
        let has_endpoint = self
            .endpoint
            .as_deref()
            .map(|e| !e.trim().is_empty())
            .unwrap_or(false);
        if self.provider.requires_endpoint() && !has_endpoint {
            return Err(format!("{}: endpoint is required", self.provider));
        }
        if let Some(endpoint) = self.resolved_endpoint() {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| format!("{}: invalid endpoint '{}': {}", self.provider, endpoint, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!(
                    "{}: endpoint must use http or https, got '{}'",
                    self.provider,
                    parsed.scheme()
                ));
            }
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        if let Some(proxy) = &self.proxy {
            proxy.validate()?;
        }
        Ok(())
    }
}

/// Coarse classification of provider failures, used for user-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Transport failure or a server-side (5xx) error
    Unreachable,
    /// The provider refused the request (401/403 and other non-2xx statuses)
    Unauthorized,
    /// The response body was unparseable or lacked the expected field
    MalformedResponse,
    /// The configuration was rejected before any request was sent
    Misconfigured,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderErrorKind::Unreachable => write!(f, "unreachable"),
            ProviderErrorKind::Unauthorized => write!(f, "unauthorized"),
            ProviderErrorKind::MalformedResponse => write!(f, "malformed_response"),
            ProviderErrorKind::Misconfigured => write!(f, "misconfigured"),
        }
    }
}

/// Error types for provider operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// Authentication failed (missing or invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited { message: String },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// Response body was not valid JSON
    ParseError { message: String },
    /// Response JSON lacked the field the adapter extracts
    MissingField { field: String },
    /// Configuration rejected before sending
    InvalidConfig { message: String },
    /// Any other HTTP failure
    Other { message: String },
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message } => write!(f, "Rate limited: {}", message),
            LlmError::ModelNotFound { model } => write!(f, "Model not found: {}", model),
            LlmError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => write!(f, "Network error: {}", message),
            LlmError::ParseError { message } => write!(f, "Parse error: {}", message),
            LlmError::MissingField { field } => {
                write!(f, "Malformed response: missing field '{}'", field)
            }
            LlmError::InvalidConfig { message } => {
                write!(f, "Invalid provider configuration: {}", message)
            }
            LlmError::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            LlmError::NetworkError { .. } | LlmError::ServerError { .. } => {
                ProviderErrorKind::Unreachable
            }
            LlmError::AuthenticationFailed { .. }
            | LlmError::RateLimited { .. }
            | LlmError::ModelNotFound { .. }
            | LlmError::InvalidRequest { .. }
            | LlmError::Other { .. } => ProviderErrorKind::Unauthorized,
            LlmError::ParseError { .. } | LlmError::MissingField { .. } => {
                ProviderErrorKind::MalformedResponse
            }
            LlmError::InvalidConfig { .. } => ProviderErrorKind::Misconfigured,
        }
    }
}

/// Result type for provider operations
pub type LlmResult<T> = Result<T, LlmError>;
