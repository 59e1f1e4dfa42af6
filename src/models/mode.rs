//! Mode Models
//!
//! How a submission is processed.

use serde::{Deserialize, Serialize};

/// Orchestration mode for code-generating submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    /// Generate and show the result
    #[default]
    Plain,
    /// Generate; insertion into the editor is a separate user action
    Agent,
    /// Generate, insert, execute and test without confirmation
    Auto,
}

impl std::fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantMode::Plain => write!(f, "plain"),
            AssistantMode::Agent => write!(f, "agent"),
            AssistantMode::Auto => write!(f, "auto"),
        }
    }
}

/// Topic of a plain-text guidance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceTopic {
    /// Free-form question answered from the retrieved context
    #[default]
    Chat,
    /// Brainstorm functional requirements for an idea
    Idea,
    /// UI design guidance for a described component
    Design,
    /// Deployment guidance for a described application
    Deploy,
}

impl std::fmt::Display for GuidanceTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuidanceTopic::Chat => write!(f, "chat"),
            GuidanceTopic::Idea => write!(f, "idea"),
            GuidanceTopic::Design => write!(f, "design"),
            GuidanceTopic::Deploy => write!(f, "deploy"),
        }
    }
}
