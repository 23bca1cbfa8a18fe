//! Varieties command handler.

use clap::Args;
use krishi_core::{config::AppConfig, AppResult};
use krishi_knowledge::AgriService;

/// List known crop varieties
#[derive(Args, Debug)]
pub struct VarietiesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl VarietiesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Listing varieties");

        let service = AgriService::connect(config).await;
        let varieties = service.varieties().await?;

        if self.json {
            let output = serde_json::json!({ "varieties": varieties });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            if !service.is_available() {
                eprintln!("(demo mode: showing fallback varieties)");
            }
            for variety in &varieties {
                println!("{}", variety);
            }
        }

        Ok(())
    }
}
