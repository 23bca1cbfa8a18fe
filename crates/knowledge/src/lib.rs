//! Agriculture knowledge retrieval and answering.
//!
//! Answers Bangla questions about crop varieties from a Neo4j knowledge
//! graph: the question is matched against the variety catalog, fulltext
//! indexes are queried, facts are ranked and rendered as context, and a
//! completion model writes the answer.

pub mod catalog;
pub mod config;
pub mod graph;
pub mod matcher;
pub mod rag;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use catalog::{CatalogState, VarietyCatalog};
pub use config::RagSettings;
pub use graph::{GraphStore, Neo4jStore};
pub use matcher::{is_broad_question, match_variety};
pub use rag::{RagAnswer, RagPipeline, RetrievalStrategy};
pub use service::{demo_answer, format_markdown_answer, AgriService, ChatOutcome};
pub use types::{ChatRequest, ChatResponse, FactRecord, FulltextHit, HealthStatus};
