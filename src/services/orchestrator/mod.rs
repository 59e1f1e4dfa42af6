//! Orchestrator
//!
//! Sequences context retrieval, generation and editor side effects for each
//! submission, and records the outcome in the session's conversation log.

mod report;
mod session;
mod stage;

pub use report::{test_run_notification, TurnFailure, TurnKind, TurnReport};
pub use session::Session;
pub use stage::{
    PipelineStage, StageTracker, PROGRESS_EXECUTING, PROGRESS_GENERATING, PROGRESS_PROCESSING, PROGRESS_TESTING,
};
