//! RAG answering orchestration.
//!
//! Matches a variety in the question, retrieves facts from every fulltext
//! index, narrows them to the variety when one was found, and asks the
//! model for an answer grounded in the rendered context.

use crate::catalog::VarietyCatalog;
use crate::config::RagSettings;
use crate::graph::GraphStore;
use crate::matcher::{is_broad_question, match_variety};
use crate::rag::context::build_context;
use crate::rag::search::{narrow_to_variety, rank, search};
use crate::rag::types::{RagAnswer, RetrievalStrategy};
use krishi_core::{AppError, AppResult};
use krishi_llm::{LlmClient, LlmRequest};
use krishi_prompt::{build_prompt, load_prompt, PromptDefinition, BROAD_PROMPT_ID, VARIETY_PROMPT_ID};
use std::collections::HashMap;
use std::sync::Arc;

/// Question answering over the graph store.
pub struct RagPipeline {
    store: Arc<dyn GraphStore>,
    llm: Arc<dyn LlmClient>,
    catalog: Arc<VarietyCatalog>,
    settings: RagSettings,
    variety_prompt: PromptDefinition,
    broad_prompt: PromptDefinition,
}

impl RagPipeline {
    /// Build a pipeline. Both answer prompts are resolved here; a malformed
    /// override in the prompts directory is an error.
    pub fn new(
        store: Arc<dyn GraphStore>,
        llm: Arc<dyn LlmClient>,
        catalog: Arc<VarietyCatalog>,
        settings: RagSettings,
    ) -> AppResult<Self> {
        let prompts_dir = settings.prompts_dir.as_deref();
        let variety_prompt = load_prompt(prompts_dir, VARIETY_PROMPT_ID)?;
        let broad_prompt = load_prompt(prompts_dir, BROAD_PROMPT_ID)?;

        Ok(Self {
            store,
            llm,
            catalog,
            settings,
            variety_prompt,
            broad_prompt,
        })
    }

    pub fn catalog(&self) -> &VarietyCatalog {
        &self.catalog
    }

    /// All known variety names, in catalog order.
    pub async fn get_all_varieties(&self) -> AppResult<Vec<String>> {
        Ok(self.catalog.load().await?.as_ref().clone())
    }

    /// Answer a question, returning only the answer text.
    pub async fn get_rag_answer(&self, question: &str) -> AppResult<String> {
        Ok(self.answer(question).await?.answer)
    }

    /// Answer a question, returning the answer with its retrieval trace.
    pub async fn answer(&self, question: &str) -> AppResult<RagAnswer> {
        let catalog = self.catalog.load().await?;
        let strategy = RetrievalStrategy::from_match(match_variety(question, catalog.as_slice()));
        let broad_question = is_broad_question(question);

        tracing::info!(
            strategy = strategy.label(),
            variety = strategy.variety().unwrap_or(""),
            broad_question,
            "Answering question"
        );

        let limit =
            strategy.limit_per_index(self.settings.variety_limit, self.settings.broad_limit);
        let results = search(
            self.store.as_ref(),
            question,
            &self.settings.fulltext_indexes,
            limit,
        )
        .await;
        let facts_retrieved = results.facts.len();

        let ranked = rank(results.facts);
        let (facts, filter_fell_back) = match strategy.variety() {
            Some(variety) => narrow_to_variety(ranked, variety),
            None => (ranked, false),
        };

        let context = build_context(&facts);
        tracing::debug!("Context for synthesis:\n{}", context);

        let answer = self.synthesize(question, &context, &strategy).await?;

        Ok(RagAnswer {
            answer,
            prompt_id: strategy.prompt_id().to_string(),
            strategy,
            broad_question,
            facts_retrieved,
            facts_used: facts.len(),
            filter_fell_back,
            failed_indexes: results.failed_indexes,
            context,
        })
    }

    /// Send one completion request built from the strategy's prompt.
    pub async fn synthesize(
        &self,
        question: &str,
        context: &str,
        strategy: &RetrievalStrategy,
    ) -> AppResult<String> {
        let definition = match strategy {
            RetrievalStrategy::VarietyScoped { .. } => &self.variety_prompt,
            RetrievalStrategy::Broad => &self.broad_prompt,
        };

        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), context.to_string());
        if let Some(variety) = strategy.variety() {
            variables.insert("variety".to_string(), variety.to_string());
        }

        let built = build_prompt(definition, variables)?;

        let mut request = LlmRequest::new(built.user, &self.settings.model);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        tracing::debug!(
            "Requesting completion from {} (prompt: {})",
            self.llm.provider_name(),
            definition.id
        );

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| AppError::SynthesisFailed(e.to_string()))?;

        Ok(response.content)
    }
}
