//! Ketu Core
//!
//! Foundational types for the Ketu assistant workspace. This crate has no
//! dependency on the provider, retrieval or editor code.
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `proxy` - Proxy configuration shared by every HTTP-using component

pub mod error;
pub mod proxy;

pub use error::{CoreError, CoreResult};
pub use proxy::{ProxyConfig, ProxyProtocol};
