//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use ketu_core::CoreError;
use ketu_llm::LlmError;
use thiserror::Error;

use crate::services::editor::EditorError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from the shared core types
    #[error(transparent)]
    Core(#[from] CoreError),

    /// AI provider failures
    #[error(transparent)]
    Provider(#[from] LlmError),

    /// Editor host side-effect failures
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another request is still being processed
    #[error("A request is already in progress")]
    Busy,

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was a rejected concurrent request
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Convert AppError to a string suitable for UI bridge responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
