//! Neo4j graph store over the Bolt protocol.

use super::GraphStore;
use crate::types::FulltextHit;
use krishi_core::{AppError, AppResult, GraphConfig};
use neo4rs::{query, ConfigBuilder, Graph, Node};
use std::collections::BTreeMap;

const FULLTEXT_QUERY: &str = "CALL db.index.fulltext.queryNodes($index, $query) \
     YIELD node, score \
     RETURN node, score \
     ORDER BY score DESC \
     LIMIT $limit";

/// Graph store backed by Neo4j.
pub struct Neo4jStore {
    graph: Graph,
    variety_query: String,
}

impl Neo4jStore {
    /// Connect using the graph section of the application config.
    ///
    /// Missing settings and connection failures are both reported as
    /// `UpstreamUnavailable`.
    pub async fn connect(config: &GraphConfig) -> AppResult<Self> {
        let (uri, user, password) = match (&config.uri, &config.username, &config.password) {
            (Some(uri), Some(user), Some(password)) => (uri, user, password),
            _ => {
                return Err(AppError::UpstreamUnavailable(
                    "Neo4j URI and credentials are not configured".to_string(),
                ))
            }
        };

        tracing::info!(uri = %uri, database = %config.database, "Connecting to Neo4j");

        let neo_config = ConfigBuilder::default()
            .uri(uri.as_str())
            .user(user.as_str())
            .password(password.as_str())
            .db(config.database.as_str())
            .build()
            .map_err(|e| AppError::UpstreamUnavailable(format!("Invalid Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo_config).await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to connect to Neo4j at {}: {}", uri, e))
        })?;

        Ok(Self {
            graph,
            variety_query: variety_names_query(&config.variety_label, &config.variety_property),
        })
    }

    fn node_properties(node: &Node) -> BTreeMap<String, serde_json::Value> {
        let mut properties = BTreeMap::new();
        for key in node.keys() {
            match node.get::<serde_json::Value>(key) {
                Ok(value) => {
                    properties.insert(key.to_string(), value);
                }
                Err(e) => tracing::debug!("Skipping property '{}': {}", key, e),
            }
        }
        properties
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jStore {
    fn backend_name(&self) -> &str {
        "neo4j"
    }

    async fn fulltext_query(
        &self,
        index: &str,
        text: &str,
        limit: usize,
    ) -> AppResult<Vec<FulltextHit>> {
        let q = query(FULLTEXT_QUERY)
            .param("index", index)
            .param("query", text)
            .param("limit", limit as i64);

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| AppError::Graph(e.to_string()))?;

        let mut hits = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| AppError::Graph(e.to_string()))?
        {
            let node: Node = row
                .get("node")
                .map_err(|e| AppError::Graph(format!("Row without node: {}", e)))?;
            let score: f64 = row
                .get("score")
                .map_err(|e| AppError::Graph(format!("Row without score: {}", e)))?;

            hits.push(FulltextHit {
                properties: Self::node_properties(&node),
                score,
            });
        }

        tracing::debug!("Index '{}' returned {} hits", index, hits.len());
        Ok(hits)
    }

    async fn variety_names(&self) -> AppResult<Vec<String>> {
        let mut result = self
            .graph
            .execute(query(&self.variety_query))
            .await
            .map_err(|e| AppError::Graph(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| AppError::Graph(e.to_string()))?
        {
            if let Ok(Some(name)) = row.get::<Option<String>>("name") {
                names.push(name);
            }
        }

        Ok(names)
    }
}

/// Cypher listing distinct values of `property` over nodes labelled `label`.
fn variety_names_query(label: &str, property: &str) -> String {
    format!(
        "MATCH (n:{}) RETURN DISTINCT n.{} AS name",
        quote_identifier(label),
        quote_identifier(property)
    )
}

/// Backtick-quote a Cypher identifier.
fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}
