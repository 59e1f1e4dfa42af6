//! Services
//!
//! Business logic: prompt construction, documentation retrieval, the editor
//! seam and the orchestration pipeline tying them to a provider.

pub mod editor;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
