//! Ask command handler.
//!
//! Sends one question through the chat service and prints the answer.

use clap::Args;
use krishi_core::{config::AppConfig, AppError, AppResult};
use krishi_knowledge::{AgriService, ChatOutcome, ChatRequest};
use std::path::PathBuf;
use std::time::Duration;

/// Ask a question about crops and varieties
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the context block sent to the model
    #[arg(long)]
    pub show_context: bool,

    /// Approach label echoed in the response
    #[arg(long, default_value = "GraphRAG")]
    pub approach: String,

    /// Model label echoed in the response
    #[arg(long, default_value = "GPT-4")]
    pub model_label: String,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.get_question()?;
        tracing::debug!("Question: {}", question);

        let service = AgriService::connect(config).await;
        if let Some(reason) = service.demo_reason() {
            tracing::warn!("Answering in demo mode: {}", reason);
        }

        let request = ChatRequest {
            question,
            approach: self.approach.clone(),
            model: self.model_label.clone(),
        };

        let outcome = match self.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), service.exchange(request))
                .await
                .map_err(|_| AppError::Other(format!("No answer within {} seconds", secs)))??,
            None => service.exchange(request).await?,
        };

        self.print(&outcome)
    }

    fn print(&self, outcome: &ChatOutcome) -> AppResult<()> {
        if self.json {
            let mut output = serde_json::to_value(&outcome.response)?;
            if let Some(trace) = &outcome.trace {
                let mut trace = serde_json::to_value(trace)?;
                if !self.show_context {
                    if let Some(fields) = trace.as_object_mut() {
                        fields.remove("context");
                    }
                }
                output["trace"] = trace;
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{}", outcome.response.response);

        if let Some(trace) = &outcome.trace {
            tracing::debug!(
                "Strategy: {} (prompt {}), facts retrieved: {}, used: {}, filter fallback: {}",
                trace.strategy.label(),
                trace.prompt_id,
                trace.facts_retrieved,
                trace.facts_used,
                trace.filter_fell_back
            );
            if !trace.failed_indexes.is_empty() {
                tracing::debug!("Failed indexes: {}", trace.failed_indexes.join(", "));
            }

            if self.show_context {
                println!();
                println!("Context:");
                if trace.context.is_empty() {
                    println!("(empty)");
                } else {
                    print!("{}", trace.context);
                }
            }
        }

        Ok(())
    }

    /// Question from the positional argument or `--file`.
    fn get_question(&self) -> AppResult<String> {
        let question = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => return Err(AppError::Config("No question provided".to_string())),
        };

        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Config("Question is empty".to_string()));
        }
        Ok(question.to_string())
    }
}
