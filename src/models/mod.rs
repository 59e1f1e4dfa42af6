//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod conversation;
pub mod generation;
pub mod mode;
pub mod settings;

pub use conversation::*;
pub use generation::*;
pub use mode::*;
pub use settings::*;
