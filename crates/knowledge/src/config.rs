//! Pipeline settings derived from the application config.

use krishi_core::AppConfig;
use std::path::PathBuf;

/// Retrieval and synthesis knobs used by the RAG pipeline.
#[derive(Debug, Clone)]
pub struct RagSettings {
    /// Fulltext indexes queried for every question, in order
    pub fulltext_indexes: Vec<String>,

    /// Per-index hit limit when a variety was matched
    pub variety_limit: usize,

    /// Per-index hit limit for broad questions
    pub broad_limit: usize,

    /// Completion model identifier
    pub model: String,

    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,

    /// Directory with prompt overrides
    pub prompts_dir: Option<PathBuf>,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RagSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fulltext_indexes: config.retrieval.fulltext_indexes.clone(),
            variety_limit: config.retrieval.variety_limit,
            broad_limit: config.retrieval.broad_limit,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            prompts_dir: config.prompts_dir.clone(),
        }
    }

    /// Settings with a custom index list, everything else default.
    pub fn with_indexes<S: Into<String>>(indexes: impl IntoIterator<Item = S>) -> Self {
        Self {
            fulltext_indexes: indexes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
