//! Prompt loader for YAML prompt definitions.

use crate::defaults;
use crate::types::PromptDefinition;
use krishi_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID.
///
/// A `<id>.yml` file in `prompts_dir` takes precedence over the built-in
/// definition of the same ID.
///
/// # Example
/// ```no_run
/// use krishi_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Some(Path::new("prompts")), "rag.answer.variety")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(dir) = prompts_dir {
        let prompt_file = dir.join(format!("{}.yml", prompt_id));
        if prompt_file.exists() {
            tracing::debug!("Loading prompt from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition = parse_prompt(&contents).map_err(|e| {
                AppError::Prompt(format!("Invalid prompt file {:?}: {}", prompt_file, e))
            })?;

            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    let yaml = defaults::builtin_yaml(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)))?;
    parse_prompt(yaml)
}

fn parse_prompt(contents: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML: {}", e)))?;
    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{BROAD_PROMPT_ID, VARIETY_PROMPT_ID};
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, valid: bool) {
        let content = if valid {
            format!(
                r#"
id: {}
title: "Override"
apiVersion: "1.0"
system: "Custom system"
template: "Custom: {{{{question}}}}"
"#,
                id
            )
        } else {
            "invalid: yaml: content:".to_string()
        };

        fs::write(dir.join(format!("{}.yml", id)), content).unwrap();
    }

    #[test]
    fn test_load_builtin_prompts() {
        let variety = load_prompt(None, VARIETY_PROMPT_ID).unwrap();
        assert!(variety.system.contains("{{variety}}"));
        assert!(variety.template.starts_with("Context:\n{{context}}"));
        assert!(variety.template.ends_with("Question: {{question}}"));

        let broad = load_prompt(None, BROAD_PROMPT_ID).unwrap();
        assert!(broad.system.contains("broad query"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), BROAD_PROMPT_ID, true);

        let prompt = load_prompt(Some(temp_dir.path()), BROAD_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Override");
        assert_eq!(prompt.template, "Custom: {{question}}");
    }

    #[test]
    fn test_missing_override_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(Some(temp_dir.path()), VARIETY_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, VARIETY_PROMPT_ID);
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        assert!(load_prompt(None, "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), BROAD_PROMPT_ID, false);

        let result = load_prompt(Some(temp_dir.path()), BROAD_PROMPT_ID);
        assert!(result.is_err());
    }
}
