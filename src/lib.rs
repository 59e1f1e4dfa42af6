//! Ketu - Coding Assistant Core
//!
//! Backend for a coding-assistant UI. A user request is augmented with
//! retrieved documentation and repository context, sent to the configured AI
//! provider, normalized into explanation / code / language, and, depending on
//! the mode, inserted, executed and tested through an editor host.
//!
//! - `models` - Conversation, generation and settings data
//! - `services` - Prompts, retrieval, the editor seam and the orchestrator
//! - `state` - Application state that configures and opens sessions
//! - `utils` - Error types and logging setup

pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use models::settings::{AssistantSettings, SettingsUpdate};
pub use models::{
    AssistantMode, ConversationMessage, GenerationRequest, GenerationResult, GuidanceTopic, MessageRole,
    MessageStatus, Notification, NotificationLevel, TestOutcome,
};
pub use services::editor::{EditorError, EditorHost, EditorOperation, SimulatedEditorHost};
pub use services::orchestrator::{PipelineStage, Session, TurnFailure, TurnKind, TurnReport};
pub use services::retrieval::{ContextAggregator, DocsClient, DocumentSource, RetrievalError};
pub use state::{AppState, ConfigureReport};
pub use utils::error::{AppError, AppResult};
pub use utils::logging::init_tracing;
