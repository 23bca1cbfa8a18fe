//! Krishi RAG Core Library
//!
//! This crate provides the foundational utilities shared by the Krishi
//! workspace:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (graph store, completion endpoint, retrieval)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, GraphConfig, LlmSettings, RetrievalConfig};
pub use error::{AppError, AppResult};
