//! Generation Models
//!
//! Input to a code generation call. The structured output type lives in
//! `ketu_llm::normalize` and is re-exported here.

use serde::{Deserialize, Serialize};

pub use ketu_llm::GenerationResult;

/// Everything a code generation prompt is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub user_query: String,
    /// Retrieved documentation, in retrieval order
    #[serde(default)]
    pub context_docs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repo_context: Option<String>,
}

impl GenerationRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            context_docs: Vec::new(),
            repo_context: None,
        }
    }

    pub fn with_docs(mut self, docs: Vec<String>) -> Self {
        self.context_docs = docs;
        self
    }

    pub fn with_repo_context(mut self, repo_context: Option<String>) -> Self {
        self.repo_context = repo_context.filter(|c| !c.trim().is_empty());
        self
    }
}
