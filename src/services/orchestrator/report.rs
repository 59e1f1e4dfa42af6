//! Turn Reports
//!
//! What a submission hands back to the caller once it has finished.

use ketu_llm::ProviderErrorKind;
use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;
use crate::models::{AssistantMode, ConversationMessage, GenerationResult, GuidanceTopic, Notification};
use crate::utils::error::AppError;

/// What kind of submission a turn was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum TurnKind {
    Generate(AssistantMode),
    Guidance(GuidanceTopic),
}

impl TurnKind {
    /// Notification shown when a turn of this kind fails
    pub fn failure_notification(&self) -> Notification {
        let description = match self {
            TurnKind::Generate(AssistantMode::Auto) => "Failed to complete the automated process",
            TurnKind::Generate(_) => "Failed to generate code",
            TurnKind::Guidance(GuidanceTopic::Chat) => "Failed to generate response",
            TurnKind::Guidance(GuidanceTopic::Idea) => "Failed to generate idea response",
            TurnKind::Guidance(GuidanceTopic::Design) => "Failed to generate design guidance",
            TurnKind::Guidance(GuidanceTopic::Deploy) => "Failed to generate deployment guidance",
        };
        Notification::error("Error", description)
    }
}

/// Notification summarising an auto-mode test run
pub fn test_run_notification(all_passed: bool) -> Notification {
    if all_passed {
        Notification::success("Success", "Code generated, executed and tested successfully")
    } else {
        Notification::warning("Warning", "Some tests failed. Check the results for details.")
    }
}

/// Why a turn failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFailure {
    /// Stage that was running when the failure happened
    pub stage: PipelineStage,
    pub message: String,
    /// Classification when the provider call failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub provider_error: Option<ProviderErrorKind>,
}

impl TurnFailure {
    pub fn new(stage: PipelineStage, error: &AppError) -> Self {
        let provider_error = match error {
            AppError::Provider(e) => Some(e.kind()),
            _ => None,
        };
        Self {
            stage,
            message: error.to_string(),
            provider_error,
        }
    }
}

/// Outcome of one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReport {
    pub kind: TurnKind,
    /// Stages visited, starting at `Idle`
    pub stages: Vec<PipelineStage>,
    /// Terminal message appended to the conversation log
    pub final_message: ConversationMessage,
    /// Structured generation result, for code-generating turns that got that far
    pub result: Option<GenerationResult>,
    pub notification: Option<Notification>,
    pub failure: Option<TurnFailure>,
}

impl TurnReport {
    /// Last stage reached
    pub fn final_stage(&self) -> PipelineStage {
        self.stages.last().copied().unwrap_or(PipelineStage::Idle)
    }

    pub fn succeeded(&self) -> bool {
        self.final_stage() == PipelineStage::Done
    }
}
