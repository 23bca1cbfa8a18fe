//! In-memory fakes of the graph store and completion client.

use crate::graph::GraphStore;
use crate::types::{FactRecord, FulltextHit};
use krishi_core::{AppError, AppResult};
use krishi_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Build a fact record from field pairs.
pub fn fact(index: &str, score: f64, fields: &[(&str, Value)]) -> FactRecord {
    FactRecord::new(
        index,
        score,
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    )
}

/// Graph store answering from canned per-index hits.
///
/// Indexes without canned hits return no results.
#[derive(Default)]
pub struct FakeGraphStore {
    hits: HashMap<String, Vec<FulltextHit>>,
    failing: HashSet<String>,
    varieties: Vec<String>,
    catalog_unreachable: bool,
    catalog_gate: Option<Arc<Semaphore>>,
    fulltext_calls: Mutex<Vec<(String, String, usize)>>,
    variety_calls: AtomicUsize,
}

impl FakeGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_varieties(mut self, names: &[&str]) -> Self {
        self.varieties = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_unreachable_catalog(mut self) -> Self {
        self.catalog_unreachable = true;
        self
    }

    /// Hold every variety query until `gate` hands out a permit.
    pub fn with_catalog_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.catalog_gate = Some(gate);
        self
    }

    pub fn with_hits(mut self, index: &str, hits: Vec<(f64, Vec<(&str, Value)>)>) -> Self {
        let hits = hits
            .into_iter()
            .map(|(score, fields)| FulltextHit {
                properties: fields
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect::<BTreeMap<_, _>>(),
                score,
            })
            .collect();
        self.hits.insert(index.to_string(), hits);
        self
    }

    pub fn with_failing_index(mut self, index: &str) -> Self {
        self.failing.insert(index.to_string());
        self
    }

    /// Recorded `(index, query, limit)` triples, sorted by index name.
    pub fn fulltext_calls(&self) -> Vec<(String, String, usize)> {
        let mut calls = self.fulltext_calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    pub fn variety_calls(&self) -> usize {
        self.variety_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GraphStore for FakeGraphStore {
    fn backend_name(&self) -> &str {
        "fake"
    }

    async fn fulltext_query(
        &self,
        index: &str,
        query: &str,
        limit: usize,
    ) -> AppResult<Vec<FulltextHit>> {
        self.fulltext_calls
            .lock()
            .unwrap()
            .push((index.to_string(), query.to_string(), limit));

        if self.failing.contains(index) {
            return Err(AppError::Graph(format!(
                "There is no such fulltext schema index: {}",
                index
            )));
        }

        let mut hits = self.hits.get(index).cloned().unwrap_or_default();
        hits.truncate(limit);
        Ok(hits)
    }

    async fn variety_names(&self) -> AppResult<Vec<String>> {
        self.variety_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(gate) = &self.catalog_gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.catalog_unreachable {
            return Err(AppError::Graph("connection refused".to_string()));
        }
        Ok(self.varieties.clone())
    }
}

/// Completion client returning a fixed reply and recording every request.
pub struct RecordingLlm {
    reply: Result<String, String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl RecordingLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }
}
