//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Provides natural language answering over the agriculture graph using
//! fulltext retrieval and LLM synthesis.

pub mod ask;
pub mod context;
pub mod search;
pub mod types;

pub use ask::RagPipeline;
pub use context::build_context;
pub use search::{rank, IndexOutcome, SearchResults};
pub use types::{RagAnswer, RetrievalStrategy};
