//! Context Aggregator
//!
//! Gathers the documentation and repository context a prompt is built from.
//! Both lookups are independent and run concurrently.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::client::DocumentSource;
use crate::services::editor::EditorHost;

/// Documents used when retrieval fails
pub const FALLBACK_DOCUMENTS: [&str; 2] = [
    "# Basic Documentation\nThis is a fallback documentation as we couldn't connect to the Context7 MCP Server.",
    "The Ketu VS Code extension can help you write code, answer questions, and execute code.",
];

/// Owned copy of `FALLBACK_DOCUMENTS`
pub fn fallback_documents() -> Vec<String> {
    FALLBACK_DOCUMENTS.iter().map(|d| d.to_string()).collect()
}

/// Context gathered for one prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    pub docs: Vec<String>,
    pub repo: Option<String>,
}

/// Combines documentation retrieval with the editor's repository context
pub struct ContextAggregator {
    source: Arc<dyn DocumentSource>,
    editor: Arc<dyn EditorHost>,
    repository_enabled: bool,
}

impl ContextAggregator {
    pub fn new(source: Arc<dyn DocumentSource>, editor: Arc<dyn EditorHost>) -> Self {
        Self {
            source,
            editor,
            repository_enabled: false,
        }
    }

    /// Include repository context in gathered prompts
    pub fn with_repository(mut self, enabled: bool) -> Self {
        self.repository_enabled = enabled;
        self
    }

    /// Documentation for `query`, or the fallback documents if retrieval fails.
    pub async fn aggregate(&self, query: &str) -> Vec<String> {
        match self.source.fetch_docs(query).await {
            Ok(docs) => {
                debug!(count = docs.len(), "retrieved context documents");
                docs
            }
            Err(e) => {
                warn!(error = %e, "documentation retrieval failed, using fallback documents");
                fallback_documents()
            }
        }
    }

    /// Repository description when the integration is enabled and configured.
    pub async fn repo_context(&self) -> Option<String> {
        if !self.repository_enabled {
            return None;
        }
        match self.editor.repository_context().await {
            Ok(context) => context.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "repository context unavailable");
                None
            }
        }
    }

    /// Fetch documentation and repository context concurrently.
    pub async fn gather(&self, query: &str) -> PromptContext {
        let (docs, repo) = tokio::join!(self.aggregate(query), self.repo_context());
        PromptContext { docs, repo }
    }

    /// Check the documentation source is reachable. Never fails.
    pub async fn probe(&self) -> bool {
        match self.source.health().await {
            Ok(()) => {
                info!("documentation source is reachable");
                true
            }
            Err(e) => {
                warn!(error = %e, "documentation source health check failed");
                false
            }
        }
    }
}
