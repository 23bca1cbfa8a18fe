//! Chat service wrapping the RAG pipeline.
//!
//! The service is built once at startup. When the graph store or the
//! completion client cannot be set up it runs in demo mode: questions get a
//! fixed placeholder answer and the variety list comes from configuration.

use crate::catalog::VarietyCatalog;
use crate::config::RagSettings;
use crate::graph::{GraphStore, Neo4jStore};
use crate::rag::{RagAnswer, RagPipeline};
use crate::types::{ChatRequest, ChatResponse, HealthStatus};
use krishi_core::{AppConfig, AppError, AppResult};
use krishi_llm::LlmClient;
use std::sync::Arc;

const SOURCE_FOOTER: &str = "*উৎস: বাংলাদেশ কৃষি গবেষণা ইনস্টিটিউট*";

enum ServiceMode {
    Connected(Box<RagPipeline>),
    Demo { reason: String },
}

/// Result of a chat exchange, with the retrieval trace when one exists.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: ChatResponse,

    /// `None` in demo mode
    pub trace: Option<RagAnswer>,
}

/// Agriculture question answering service.
pub struct AgriService {
    mode: ServiceMode,
    fallback_varieties: Vec<String>,
}

impl AgriService {
    /// Connect to the graph store and completion endpoint described by
    /// `config`, then warm the variety catalog.
    ///
    /// Never fails: any setup error puts the service in demo mode.
    pub async fn connect(config: &AppConfig) -> Self {
        let fallback = config.fallback_varieties.clone();
        match Self::open_backends(config).await {
            Ok((store, llm)) => {
                Self::start(store, llm, RagSettings::from_config(config), fallback).await
            }
            Err(e) => {
                tracing::warn!("RAG system unavailable, running in demo mode: {}", e);
                Self::demo(e.to_string(), fallback)
            }
        }
    }

    async fn open_backends(
        config: &AppConfig,
    ) -> AppResult<(Arc<dyn GraphStore>, Arc<dyn LlmClient>)> {
        config.validate()?;

        let store: Arc<dyn GraphStore> = Arc::new(Neo4jStore::connect(&config.graph).await?);
        let llm = krishi_llm::create_client(
            &config.llm.provider,
            config.llm.endpoint.as_deref(),
            config.llm.api_key.as_deref(),
        )
        .map_err(|e| AppError::Config(format!("Failed to create LLM client: {}", e)))?;

        Ok((store, llm))
    }

    /// Warm the variety catalog and build the pipeline over `store` and `llm`.
    ///
    /// Falls back to demo mode when the catalog cannot be loaded or the
    /// answer prompts cannot be resolved.
    pub async fn start(
        store: Arc<dyn GraphStore>,
        llm: Arc<dyn LlmClient>,
        settings: RagSettings,
        fallback_varieties: Vec<String>,
    ) -> Self {
        let catalog = Arc::new(VarietyCatalog::new(Arc::clone(&store)));
        let warmed = catalog.load().await;
        let pipeline = warmed.and_then(|_| RagPipeline::new(store, llm, catalog, settings));

        match pipeline {
            Ok(pipeline) => {
                tracing::info!("RAG system connected");
                Self {
                    mode: ServiceMode::Connected(Box::new(pipeline)),
                    fallback_varieties,
                }
            }
            Err(e) => {
                tracing::warn!("RAG system unavailable, running in demo mode: {}", e);
                Self::demo(e.to_string(), fallback_varieties)
            }
        }
    }

    /// Build a connected service from already constructed parts.
    ///
    /// The catalog is loaded lazily on first use.
    pub fn from_parts(
        store: Arc<dyn GraphStore>,
        llm: Arc<dyn LlmClient>,
        settings: RagSettings,
        fallback_varieties: Vec<String>,
    ) -> AppResult<Self> {
        let catalog = Arc::new(VarietyCatalog::new(Arc::clone(&store)));
        let pipeline = RagPipeline::new(store, llm, catalog, settings)?;
        Ok(Self {
            mode: ServiceMode::Connected(Box::new(pipeline)),
            fallback_varieties,
        })
    }

    /// A service that only answers in demo mode.
    pub fn demo(reason: impl Into<String>, fallback_varieties: Vec<String>) -> Self {
        Self {
            mode: ServiceMode::Demo {
                reason: reason.into(),
            },
            fallback_varieties,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.mode, ServiceMode::Connected(_))
    }

    /// Why the service is in demo mode, if it is.
    pub fn demo_reason(&self) -> Option<&str> {
        match &self.mode {
            ServiceMode::Demo { reason } => Some(reason),
            ServiceMode::Connected(_) => None,
        }
    }

    pub fn pipeline(&self) -> Option<&RagPipeline> {
        match &self.mode {
            ServiceMode::Connected(pipeline) => Some(&**pipeline),
            ServiceMode::Demo { .. } => None,
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            rag_system: if self.is_available() {
                "connected"
            } else {
                "demo_mode"
            }
            .to_string(),
        }
    }

    /// Variety catalog when connected, the fallback list otherwise.
    pub async fn varieties(&self) -> AppResult<Vec<String>> {
        match &self.mode {
            ServiceMode::Connected(pipeline) => pipeline.get_all_varieties().await,
            ServiceMode::Demo { .. } => Ok(self.fallback_varieties.clone()),
        }
    }

    /// Answer a chat request.
    pub async fn chat(&self, request: ChatRequest) -> AppResult<ChatResponse> {
        Ok(self.exchange(request).await?.response)
    }

    /// Answer a chat request, keeping the retrieval trace.
    pub async fn exchange(&self, request: ChatRequest) -> AppResult<ChatOutcome> {
        let (text, trace) = match &self.mode {
            ServiceMode::Connected(pipeline) => {
                let answer = pipeline.answer(&request.question).await?;
                let text = format_markdown_answer(&answer.answer, &request.question);
                (text, Some(answer))
            }
            ServiceMode::Demo { .. } => (demo_answer(&request.question), None),
        };

        Ok(ChatOutcome {
            response: ChatResponse {
                response: text,
                approach: request.approach,
                model: request.model,
            },
            trace,
        })
    }
}

/// Wrap an answer in a markdown heading naming the question's topic.
///
/// The topic is the last three words of the question once trailing `?` and
/// `।` are removed.
pub fn format_markdown_answer(answer: &str, question: &str) -> String {
    let stripped = question.trim().trim_end_matches(['?', '।']);
    let words: Vec<&str> = stripped.split_whitespace().collect();
    let topic = words[words.len().saturating_sub(3)..].join(" ");

    format!(
        "## {} সম্পর্কে তথ্য:\n\n{}\n\n---\n{}\n",
        topic, answer, SOURCE_FOOTER
    )
}

/// Placeholder answer served in demo mode.
pub fn demo_answer(question: &str) -> String {
    format!(
        "[ডেমো মোড] আপনার প্রশ্ন '{}' পেয়েছি। RAG সিস্টেম সংযুক্ত হলে সম্পূর্ণ উত্তর পাবেন।",
        question
    )
}
