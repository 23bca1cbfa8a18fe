//! Error types for the Krishi workspace.
//!
//! One enum covers configuration, graph store, retrieval, completion and
//! prompt failures. The retrieval-specific variants mirror how each failure
//! is treated by the pipeline: `IndexQueryFailed` is recovered locally,
//! `SynthesisFailed` ends the request, `UpstreamUnavailable` switches the
//! service to demo mode.

use thiserror::Error;

/// Unified error type for the Krishi workspace.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw graph store errors (connection, query execution, row decoding)
    #[error("Graph store error: {0}")]
    Graph(String),

    /// Graph store or completion endpoint unreachable or misconfigured
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A single fulltext index query failed
    #[error("Fulltext query on index '{index}' failed: {message}")]
    IndexQueryFailed { index: String, message: String },

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// The completion call for an answer failed
    #[error("Answer synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error means an upstream collaborator cannot be used at all.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, AppError::UpstreamUnavailable(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
