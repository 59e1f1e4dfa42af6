//! Pipeline Stages
//!
//! The per-submission state machine:
//!
//! ```text
//! idle -> context_fetch -> generating -> done                      (plain, agent, guidance)
//!                                     -> insert_code -> execute_code -> run_tests -> done   (auto)
//! any non-terminal stage -> failed
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{AssistantMode, MessageStatus};
use crate::utils::error::{AppError, AppResult};

/// Progress text shown before context retrieval starts
pub const PROGRESS_PROCESSING: &str = "Processing your request...";
/// Progress text while the provider is generating
pub const PROGRESS_GENERATING: &str = "Generating code based on your request...";
/// Progress text after insertion, while executing
pub const PROGRESS_EXECUTING: &str = "Code generated and inserted. Executing...";
/// Progress text after execution, while testing
pub const PROGRESS_TESTING: &str = "Code execution complete. Running tests...";

/// A stage of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    ContextFetch,
    Generating,
    InsertCode,
    ExecuteCode,
    RunTests,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::ContextFetch => write!(f, "context_fetch"),
            PipelineStage::Generating => write!(f, "generating"),
            PipelineStage::InsertCode => write!(f, "insert_code"),
            PipelineStage::ExecuteCode => write!(f, "execute_code"),
            PipelineStage::RunTests => write!(f, "run_tests"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }

    /// Whether a submission in `mode` may move from `self` to `next`.
    pub fn can_transition_to(&self, next: PipelineStage, mode: AssistantMode) -> bool {
        use PipelineStage::*;

        if next == Failed {
            return !self.is_terminal() && *self != Idle;
        }
        let auto = mode == AssistantMode::Auto;
        matches!(
            (*self, next, auto),
            (Idle, ContextFetch, _)
                | (ContextFetch, Generating, _)
                | (Generating, Done, false)
                | (Generating, InsertCode, true)
                | (InsertCode, ExecuteCode, true)
                | (ExecuteCode, RunTests, true)
                | (RunTests, Done, true)
        )
    }

    /// Progress message status and text for an auto-mode submission entering this stage
    pub fn progress(&self) -> Option<(MessageStatus, &'static str)> {
        match self {
            PipelineStage::ContextFetch => Some((MessageStatus::Pending, PROGRESS_PROCESSING)),
            PipelineStage::Generating => Some((MessageStatus::Running, PROGRESS_GENERATING)),
            PipelineStage::ExecuteCode => Some((MessageStatus::Running, PROGRESS_EXECUTING)),
            PipelineStage::RunTests => Some((MessageStatus::Running, PROGRESS_TESTING)),
            _ => None,
        }
    }
}

/// Tracks the stages one submission has passed through
#[derive(Debug, Clone)]
pub struct StageTracker {
    mode: AssistantMode,
    history: Vec<PipelineStage>,
}

impl StageTracker {
    pub fn new(mode: AssistantMode) -> Self {
        Self {
            mode,
            history: vec![PipelineStage::Idle],
        }
    }

    pub fn current(&self) -> PipelineStage {
        self.history.last().copied().unwrap_or(PipelineStage::Idle)
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }

    pub fn into_history(self) -> Vec<PipelineStage> {
        self.history
    }

    /// Move to `next`, rejecting transitions the mode does not allow.
    pub fn advance(&mut self, next: PipelineStage) -> AppResult<()> {
        let current = self.current();
        if !current.can_transition_to(next, self.mode) {
            return Err(AppError::internal(format!(
                "illegal stage transition {} -> {} in {} mode",
                current, next, self.mode
            )));
        }
        self.history.push(next);
        Ok(())
    }

    /// Move to `Failed` from whatever stage is current. Returns the stage that failed.
    pub fn fail(&mut self) -> PipelineStage {
        let current = self.current();
        if current.can_transition_to(PipelineStage::Failed, self.mode) {
            self.history.push(PipelineStage::Failed);
        }
        current
    }
}
