//! Built-in prompt definitions.

/// Prompt used when the question names a known variety.
pub const VARIETY_PROMPT_ID: &str = "rag.answer.variety";

/// Prompt used for questions without a recognized variety.
pub const BROAD_PROMPT_ID: &str = "rag.answer.broad";

const VARIETY_PROMPT_YAML: &str = r#"
id: rag.answer.variety
title: Variety-scoped answer
apiVersion: "1.0"
createdBy: krishi
system: |-
  You are an AI assistant that answers questions using the provided context.

  Only answer using context blocks that mention the variety '{{variety}}'. Do not use or mention other varieties in your answer. Synthesize a precise answer summarizing all relevant information for that variety only.
template: |-
  Context:
  {{context}}

  Question: {{question}}
"#;

const BROAD_PROMPT_YAML: &str = r#"
id: rag.answer.broad
title: Broad answer
apiVersion: "1.0"
createdBy: krishi
system: |-
  You are an AI assistant that answers questions using the provided context.

  Summarize all relevant information in the context for this broad query. If varieties or types are mentioned, list or compare them as appropriate.
template: |-
  Context:
  {{context}}

  Question: {{question}}
"#;

/// Raw YAML of a built-in prompt, if `prompt_id` names one.
pub fn builtin_yaml(prompt_id: &str) -> Option<&'static str> {
    match prompt_id {
        VARIETY_PROMPT_ID => Some(VARIETY_PROMPT_YAML),
        BROAD_PROMPT_ID => Some(BROAD_PROMPT_YAML),
        _ => None,
    }
}

