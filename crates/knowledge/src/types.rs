//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field names starting with this prefix are internal and never rendered
/// into the context block or matched by the variety filter.
pub const INTERNAL_FIELD_PREFIX: char = '_';

/// One graph node returned by a fulltext index, with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulltextHit {
    /// Node properties
    pub properties: BTreeMap<String, Value>,

    /// Relevance score reported by the index
    pub score: f64,
}

/// A matched graph node tagged with the index that produced it.
///
/// `index` and `score` are the synthetic fields; `fields` holds the node's
/// own properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    /// Fulltext index that produced this record
    pub index: String,

    /// Relevance score (higher = more relevant)
    pub score: f64,

    /// Node properties keyed by field name
    pub fields: BTreeMap<String, Value>,
}

impl FactRecord {
    pub fn new(index: impl Into<String>, score: f64, fields: BTreeMap<String, Value>) -> Self {
        Self {
            index: index.into(),
            score,
            fields,
        }
    }

    /// Convert a fulltext hit into a record tagged with `index`.
    pub fn from_hit(index: &str, hit: FulltextHit) -> Self {
        Self::new(index, hit.score, hit.properties)
    }

    /// Node properties that are not internal, in field-name order.
    pub fn visible_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(name, _)| !name.starts_with(INTERNAL_FIELD_PREFIX))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Whether `needle` occurs in the string form of any visible field.
    pub fn mentions(&self, needle: &str) -> bool {
        self.visible_fields()
            .any(|(_, value)| render_value(value).contains(needle))
    }
}

/// String form of a property value: strings verbatim, everything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Incoming chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,

    /// Echoed back to the client
    #[serde(default = "default_approach")]
    pub approach: String,

    /// Echoed back to the client
    #[serde(default = "default_model_label")]
    pub model: String,
}

fn default_approach() -> String {
    "GraphRAG".to_string()
}

fn default_model_label() -> String {
    "GPT-4".to_string()
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            approach: default_approach(),
            model: default_model_label(),
        }
    }
}

/// Outgoing chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub approach: String,
    pub model: String,
}

/// Service liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    /// "connected" or "demo_mode"
    pub rag_system: String,
}
