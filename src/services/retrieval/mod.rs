//! Documentation Retrieval
//!
//! Fetches documentation snippets and repository context to prepend to
//! prompts. Retrieval never fails a turn: any error degrades to a fixed set of
//! fallback documents.

mod aggregator;
mod client;

pub use aggregator::{fallback_documents, ContextAggregator, PromptContext, FALLBACK_DOCUMENTS};
pub use client::{DocsClient, DocumentSource, RetrievalError, RetrievalResult};
