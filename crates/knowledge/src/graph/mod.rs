//! Graph store access.
//!
//! The pipeline only needs two queries from the graph store: a fulltext
//! lookup against a named index and the list of known variety names.

pub mod neo4j;

pub use neo4j::Neo4jStore;

use crate::types::FulltextHit;
use krishi_core::AppResult;

/// Read-only view of a graph store exposing named fulltext indexes.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    /// Backend name for logs (e.g., "neo4j").
    fn backend_name(&self) -> &str;

    /// Query `index` with `query`, returning up to `limit` hits ordered by
    /// descending score.
    async fn fulltext_query(
        &self,
        index: &str,
        query: &str,
        limit: usize,
    ) -> AppResult<Vec<FulltextHit>>;

    /// Distinct variety names across variety nodes.
    async fn variety_names(&self) -> AppResult<Vec<String>>;
}
