//! Health command handler.

use clap::Args;
use krishi_core::{config::AppConfig, AppResult};
use krishi_knowledge::AgriService;

/// Show whether the knowledge graph is connected
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let service = AgriService::connect(config).await;
        let health = service.health();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&health)?);
        } else {
            println!("Status: {}", health.status);
            println!("RAG system: {}", health.rag_system);
            if let Some(reason) = service.demo_reason() {
                println!("Reason: {}", reason);
            }
        }

        Ok(())
    }
}
