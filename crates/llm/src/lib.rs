//! Ketu LLM
//!
//! Provides a unified interface for sending one prompt to one of several
//! completion providers and getting text back:
//! - OpenAI
//! - Anthropic Claude
//! - Groq (OpenAI-compatible)
//! - Ollama (local inference)
//! - Custom endpoints speaking the OpenAI request shape
//!
//! Also includes the HTTP client factory and the response normalizer that
//! turns free-form model output into structured code.

pub mod anthropic;
pub mod client;
pub mod custom;
pub mod http_client;
pub mod normalize;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use client::{invoke, ProviderClient};
pub use custom::CustomProvider;
pub use http_client::build_http_client;
pub use normalize::{normalize, normalize_with_source, GenerationResult, NormalizeSource};
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
