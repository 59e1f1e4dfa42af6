//! Integration Tests Module
//!
//! End-to-end tests for the Ketu assistant core. Provider and documentation
//! servers are stood in for by wiremock servers.

// Response normalization over realistic model output
mod normalize_test;

// Provider dispatch, wire shapes and error classification
mod provider_test;

// Full turns through AppState: retrieval, generation and editor side effects
mod pipeline_test;
