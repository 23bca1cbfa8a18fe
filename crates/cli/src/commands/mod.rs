//! Command handlers for the Krishi CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod health;
pub mod varieties;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use health::HealthCommand;
pub use varieties::VarietiesCommand;
