//! Retrieval Client
//!
//! HTTP client for the documentation retrieval server:
//! - `POST {base}/api/fetch-docs` with `{query, languages, frameworks}`,
//!   answered by `{documents: [...]}`
//! - `GET {base}/health`

use async_trait::async_trait;
use ketu_core::ProxyConfig;
use ketu_llm::build_http_client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::RetrievalSettings;

/// Errors talking to the retrieval server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("Invalid retrieval configuration: {0}")]
    InvalidConfig(String),

    #[error("Retrieval request failed: {0}")]
    Network(String),

    #[error("Retrieval server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid retrieval response: {0}")]
    InvalidBody(String),
}

/// Result type alias for retrieval operations
pub type RetrievalResult<T> = Result<T, RetrievalError>;

/// A source of documentation snippets
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Documents relevant to `query`, in relevance order
    async fn fetch_docs(&self, query: &str) -> RetrievalResult<Vec<String>>;

    /// Check the source is reachable
    async fn health(&self) -> RetrievalResult<()>;
}

#[derive(Serialize)]
struct FetchDocsRequest<'a> {
    query: &'a str,
    languages: &'a [String],
    frameworks: &'a [String],
}

#[derive(Deserialize)]
struct FetchDocsResponse {
    #[serde(default)]
    documents: Option<Vec<String>>,
}

/// Client for the documentation retrieval server
pub struct DocsClient {
    base_url: String,
    languages: Vec<String>,
    frameworks: Vec<String>,
    client: reqwest::Client,
}

impl DocsClient {
    /// Create a client from retrieval settings, optionally through a proxy
    pub fn new(settings: &RetrievalSettings, proxy: Option<&ProxyConfig>) -> RetrievalResult<Self> {
        let parsed = url::Url::parse(&settings.base_url)
            .map_err(|e| RetrievalError::InvalidConfig(format!("{}: {}", settings.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RetrievalError::InvalidConfig(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        let client = build_http_client(proxy).map_err(|e| RetrievalError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            languages: settings.languages.clone(),
            frameworks: settings.frameworks.clone(),
            client,
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> RetrievalResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RetrievalError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentSource for DocsClient {
    async fn fetch_docs(&self, query: &str) -> RetrievalResult<Vec<String>> {
        let request = FetchDocsRequest {
            query,
            languages: &self.languages,
            frameworks: &self.frameworks,
        };
        let response = self
            .client
            .post(self.url("/api/fetch-docs"))
            .json(&request)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let body: FetchDocsResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidBody(e.to_string()))?;
        let documents = body.documents.unwrap_or_default();
        debug!(count = documents.len(), "fetched documentation");
        Ok(documents)
    }

    async fn health(&self) -> RetrievalResult<()> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;
        Self::check_status(response).await.map(|_| ())
    }
}
