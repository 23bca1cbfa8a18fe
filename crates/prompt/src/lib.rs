//! Prompt system for the Krishi workspace.
//!
//! Answer prompts are YAML definitions holding Handlebars templates for the
//! system and user messages. Built-in definitions cover the variety-scoped
//! and broad answering strategies; a prompts directory can override them.

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{BROAD_PROMPT_ID, VARIETY_PROMPT_ID};
pub use loader::load_prompt;
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
