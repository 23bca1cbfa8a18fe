//! RAG types and data structures.

use krishi_prompt::{BROAD_PROMPT_ID, VARIETY_PROMPT_ID};
use serde::{Deserialize, Serialize};

/// How a question is answered, decided by whether it names a known variety.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievalStrategy {
    /// The question names this catalog variety
    VarietyScoped { variety: String },

    /// No catalog variety found in the question
    Broad,
}

impl RetrievalStrategy {
    /// Strategy for the result of variety matching.
    pub fn from_match(variety: Option<&str>) -> Self {
        match variety {
            Some(name) => Self::VarietyScoped {
                variety: name.to_string(),
            },
            None => Self::Broad,
        }
    }

    /// Per-index hit limit for this strategy.
    pub fn limit_per_index(&self, variety_limit: usize, broad_limit: usize) -> usize {
        match self {
            Self::VarietyScoped { .. } => variety_limit,
            Self::Broad => broad_limit,
        }
    }

    /// Prompt definition used to synthesize the answer.
    pub fn prompt_id(&self) -> &'static str {
        match self {
            Self::VarietyScoped { .. } => VARIETY_PROMPT_ID,
            Self::Broad => BROAD_PROMPT_ID,
        }
    }

    pub fn variety(&self) -> Option<&str> {
        match self {
            Self::VarietyScoped { variety } => Some(variety),
            Self::Broad => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VarietyScoped { .. } => "variety",
            Self::Broad => "broad",
        }
    }
}

/// Answer plus a trace of how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Synthesized answer text
    pub answer: String,

    pub strategy: RetrievalStrategy,

    /// Prompt definition the answer was synthesized with
    pub prompt_id: String,

    /// Keyword heuristic result, informational only
    pub broad_question: bool,

    /// Facts returned by the fan-out across all indexes
    pub facts_retrieved: usize,

    /// Facts rendered into the context block
    pub facts_used: usize,

    /// Whether the variety filter matched nothing and the unfiltered list was used
    pub filter_fell_back: bool,

    /// Indexes whose query failed and contributed nothing
    pub failed_indexes: Vec<String>,

    /// Context block sent to the model
    pub context: String,
}
