//! Editor Host
//!
//! The seam between the assistant and the editor it drives. A real host talks
//! to an IDE; `SimulatedEditorHost` keeps everything in memory.

mod simulated;

pub use simulated::SimulatedEditorHost;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TestOutcome;

/// Side effects the assistant can ask of an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorOperation {
    InsertCode,
    ExecuteCode,
    RunTests,
    ConfigureRepository,
    RepositoryContext,
}

impl std::fmt::Display for EditorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorOperation::InsertCode => write!(f, "insert code into editor"),
            EditorOperation::ExecuteCode => write!(f, "execute code"),
            EditorOperation::RunTests => write!(f, "run tests"),
            EditorOperation::ConfigureRepository => write!(f, "configure repository"),
            EditorOperation::RepositoryContext => write!(f, "read repository context"),
        }
    }
}

/// Errors raised by an editor host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The host reported the operation as unsuccessful
    #[error("Failed to {0}")]
    Rejected(EditorOperation),

    /// The host could not carry out the operation
    #[error("Failed to {operation}: {message}")]
    Failed {
        operation: EditorOperation,
        message: String,
    },
}

impl EditorError {
    pub fn failed(operation: EditorOperation, message: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            message: message.into(),
        }
    }

    /// The operation that failed
    pub fn operation(&self) -> EditorOperation {
        match self {
            EditorError::Rejected(op) => *op,
            EditorError::Failed { operation, .. } => *operation,
        }
    }
}

/// Result type alias for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Editor the assistant inserts, executes and tests code in.
///
/// `bool` results report whether the host accepted the operation; callers
/// treat `false` as a failure of that step.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Insert code into the active editor
    async fn insert_code(&self, code: &str) -> EditorResult<bool>;

    /// Execute the code last inserted
    async fn execute_code(&self, language: &str) -> EditorResult<bool>;

    /// Run the tests for the current workspace
    async fn run_tests(&self) -> EditorResult<Vec<TestOutcome>>;

    /// Point the host at a repository
    async fn configure_repository(&self, url: &str) -> EditorResult<bool>;

    /// Description of the configured repository, if any
    async fn repository_context(&self) -> EditorResult<Option<String>>;
}

/// Turn a `false` acknowledgement into an error.
pub fn require_accepted(operation: EditorOperation, accepted: bool) -> EditorResult<()> {
    if accepted {
        Ok(())
    } else {
        Err(EditorError::Rejected(operation))
    }
}
