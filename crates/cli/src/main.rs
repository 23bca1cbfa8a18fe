//! Krishi CLI
//!
//! Main entry point for the krishi command-line tool.
//! Answers Bangla agriculture questions from the crop variety knowledge graph.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, HealthCommand, VarietiesCommand};
use krishi_core::{config::AppConfig, logging};
use std::path::PathBuf;
use tracing::Instrument;

/// Krishi - agriculture question answering over a knowledge graph
#[derive(Parser, Debug)]
#[command(name = "krishi")]
#[command(about = "Bangla agriculture question answering over a knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: krishi.yaml if present)
    #[arg(short, long, global = true, env = "KRISHI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, ollama)
    #[arg(short, long, global = true, env = "KRISHI_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "KRISHI_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question about crops and varieties
    Ask(AskCommand),

    /// List known crop varieties
    Varieties(VarietiesCommand),

    /// Show whether the knowledge graph is connected
    Health(HealthCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(
            cli.provider,
            cli.model,
            cli.log_level,
            cli.verbose,
            cli.no_color,
        );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Krishi CLI starting");
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);
    if let Some(path) = &config.config_file {
        tracing::debug!("Config file: {:?}", path);
    }

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Varieties(_) => "varieties",
        Commands::Health(_) => "health",
    };
    let result = async {
        match cli.command {
            Commands::Ask(cmd) => cmd.execute(&config).await,
            Commands::Varieties(cmd) => cmd.execute(&config).await,
            Commands::Health(cmd) => cmd.execute(&config).await,
        }
    }
    .instrument(tracing::info_span!("command", name = command_name))
    .await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("krishi {} failed", command_name))
}
