//! End-to-end pipeline scenarios.

use super::support::{FakeGraphStore, RecordingLlm};
use crate::catalog::{CatalogState, VarietyCatalog};
use crate::config::RagSettings;
use crate::rag::{RagPipeline, RetrievalStrategy};
use krishi_core::AppError;
use krishi_llm::ChatRole;
use serde_json::json;
use std::sync::Arc;

const INDEXES: [&str; 3] = ["varietyNameFulltext", "folonFulltext", "rogBalaiFulltext"];

fn pipeline(store: Arc<FakeGraphStore>, llm: Arc<RecordingLlm>) -> RagPipeline {
    pipeline_with(store, llm, RagSettings::with_indexes(INDEXES))
}

fn pipeline_with(
    store: Arc<FakeGraphStore>,
    llm: Arc<RecordingLlm>,
    settings: RagSettings,
) -> RagPipeline {
    let catalog = Arc::new(VarietyCatalog::new(store.clone()));
    RagPipeline::new(store, llm, catalog, settings).unwrap()
}

fn rice_store() -> FakeGraphStore {
    FakeGraphStore::new()
        .with_varieties(&["ব্রি ধান২৮", "ব্রি ধান২৯", "ব্রি ধান২"])
        .with_hits(
            "varietyNameFulltext",
            vec![
                (1.2, vec![("জাতের নাম", json!("ব্রি ধান২৯"))]),
                (3.4, vec![("জাতের নাম", json!("ব্রি ধান২৮")), ("_id", json!(7))]),
            ],
        )
        .with_hits(
            "folonFulltext",
            vec![
                (2.0, vec![("ফলন", json!("ব্রি ধান২৮: ৬.০ টন/হেক্টর"))]),
                (2.5, vec![("ফলন", json!("ব্রি ধান২৯: ৭.৫ টন/হেক্টর"))]),
            ],
        )
}

#[tokio::test]
async fn test_variety_question_scopes_retrieval() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("ব্রি ধান২৮ এর ফলন ৬.০ টন/হেক্টর।"));
    let pipeline = pipeline(store.clone(), llm.clone());

    let answer = pipeline.answer("ব্রি ধান২৮ এর ফলন কত?").await.unwrap();

    assert_eq!(
        answer.strategy,
        RetrievalStrategy::VarietyScoped {
            variety: "ব্রি ধান২৮".to_string()
        }
    );
    assert_eq!(answer.prompt_id, "rag.answer.variety");
    assert_eq!(answer.answer, "ব্রি ধান২৮ এর ফলন ৬.০ টন/হেক্টর।");
    assert_eq!(answer.facts_retrieved, 4);
    assert_eq!(answer.facts_used, 2);
    assert!(!answer.filter_fell_back);

    // Every index queried with the raw question and the scoped limit
    let calls = store.fulltext_calls();
    assert_eq!(calls.len(), INDEXES.len());
    assert!(calls
        .iter()
        .all(|(_, query, limit)| query == "ব্রি ধান২৮ এর ফলন কত?" && *limit == 5));

    assert_eq!(
        answer.context,
        "[varietyNameFulltext, Score: 3.4]: জাতের নাম:ব্রি ধান২৮\n\
         [folonFulltext, Score: 2.0]: ফলন:ব্রি ধান২৮: ৬.০ টন/হেক্টর\n"
    );
}

#[tokio::test]
async fn test_variety_prompt_names_variety() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store, llm.clone());

    pipeline.get_rag_answer("ব্রি ধান২৮ এর ফলন কত?").await.unwrap();

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.messages[0].role, ChatRole::System);
    let system = request.system().unwrap();
    assert!(system.starts_with("You are an AI assistant that answers questions using the provided context."));
    assert!(system.contains("'ব্রি ধান২৮'"));

    let user = request.last_user_message().unwrap();
    assert!(user.starts_with("Context:\n[varietyNameFulltext, Score: 3.4]"));
    assert!(user.ends_with("\n\nQuestion: ব্রি ধান২৮ এর ফলন কত?"));
}

#[tokio::test]
async fn test_broad_question_uses_broad_strategy() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("ধানের জাতসমূহ ..."));
    let pipeline = pipeline(store.clone(), llm.clone());

    let answer = pipeline.answer("সব ধানের জাত তালিকা দিন").await.unwrap();

    assert_eq!(answer.strategy, RetrievalStrategy::Broad);
    assert_eq!(answer.prompt_id, "rag.answer.broad");
    assert!(answer.broad_question);
    assert_eq!(answer.facts_used, 4);
    assert!(store.fulltext_calls().iter().all(|(_, _, limit)| *limit == 3));

    // Ranked across indexes by descending score
    let scores: Vec<&str> = answer
        .context
        .lines()
        .map(|line| line.split(']').next().unwrap_or(""))
        .collect();
    assert_eq!(
        scores,
        vec![
            "[varietyNameFulltext, Score: 3.4",
            "[folonFulltext, Score: 2.5",
            "[folonFulltext, Score: 2.0",
            "[varietyNameFulltext, Score: 1.2",
        ]
    );

    let system = llm.requests()[0].system().unwrap().to_string();
    assert!(system.contains("broad query"));
}

#[tokio::test]
async fn test_filter_falls_back_when_no_fact_mentions_variety() {
    let store = Arc::new(
        FakeGraphStore::new()
            .with_varieties(&["বারি আলু-৭"])
            .with_hits("folonFulltext", vec![(1.0, vec![("ফলন", json!("২৫ টন"))])]),
    );
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store, llm);

    let answer = pipeline.answer("বারি আলু-৭ এর ফলন কত?").await.unwrap();

    assert!(answer.filter_fell_back);
    assert_eq!(answer.facts_used, 1);
    assert_eq!(answer.context, "[folonFulltext, Score: 1.0]: ফলন:২৫ টন\n");
}

#[tokio::test]
async fn test_all_indexes_failing_still_synthesizes() {
    let mut store = FakeGraphStore::new().with_varieties(&["ব্রি ধান২৮"]);
    for index in INDEXES {
        store = store.with_failing_index(index);
    }
    let store = Arc::new(store);
    let llm = Arc::new(RecordingLlm::replying("তথ্য পাওয়া যায়নি"));
    let pipeline = pipeline(store, llm.clone());

    let answer = pipeline.answer("ব্রি ধান২৮ কোথায় চাষ হয়?").await.unwrap();

    assert_eq!(answer.answer, "তথ্য পাওয়া যায়নি");
    assert_eq!(answer.context, "");
    assert_eq!(answer.facts_retrieved, 0);
    assert_eq!(answer.failed_indexes.len(), INDEXES.len());

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].last_user_message(),
        Some("Context:\n\n\nQuestion: ব্রি ধান২৮ কোথায় চাষ হয়?")
    );
}

#[tokio::test]
async fn test_partial_index_failure_is_tolerated() {
    let store = Arc::new(rice_store().with_failing_index("rogBalaiFulltext"));
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store, llm);

    let answer = pipeline.answer("সব ধানের জাত").await.unwrap();

    assert_eq!(answer.failed_indexes, vec!["rogBalaiFulltext"]);
    assert_eq!(answer.facts_retrieved, 4);
}

#[tokio::test]
async fn test_synthesis_failure_propagates() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::failing("rate limited"));
    let pipeline = pipeline(store, llm);

    let err = pipeline.get_rag_answer("ব্রি ধান২৯ এর ফলন কত?").await.unwrap_err();

    assert!(matches!(err, AppError::SynthesisFailed(ref msg) if msg.contains("rate limited")));
}

#[tokio::test]
async fn test_unreachable_catalog_is_upstream_unavailable() {
    let store = Arc::new(FakeGraphStore::new().with_unreachable_catalog());
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store.clone(), llm.clone());

    let err = pipeline.answer("ব্রি ধান২৮").await.unwrap_err();

    assert!(err.is_upstream_unavailable());
    assert!(store.fulltext_calls().is_empty());
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_get_all_varieties_longest_first() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store.clone(), llm);
    assert_eq!(pipeline.catalog().state(), CatalogState::Uninitialized);

    let varieties = pipeline.get_all_varieties().await.unwrap();
    assert_eq!(pipeline.catalog().state(), CatalogState::Loaded(3));
    assert_eq!(varieties, vec!["ব্রি ধান২৮", "ব্রি ধান২৯", "ব্রি ধান২"]);

    pipeline.get_all_varieties().await.unwrap();
    assert_eq!(store.variety_calls(), 1);
}

#[tokio::test]
async fn test_overlapping_names_match_most_specific() {
    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline(store, llm);

    let answer = pipeline.answer("ব্রি ধান২৯ কখন রোপণ করব?").await.unwrap();
    assert_eq!(answer.strategy.variety(), Some("ব্রি ধান২৯"));
}

#[tokio::test]
async fn test_prompt_override_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("rag.answer.broad.yml"),
        r#"
id: rag.answer.broad
title: Terse broad answer
apiVersion: "1.0"
system: "সংক্ষেপে উত্তর দিন।"
template: "{{question}}\n---\n{{context}}"
"#,
    )
    .unwrap();

    let mut settings = RagSettings::with_indexes(["folonFulltext"]);
    settings.prompts_dir = Some(dir.path().to_path_buf());
    settings.model = "llama3.2".to_string();
    settings.temperature = Some(0.1);

    let store = Arc::new(rice_store());
    let llm = Arc::new(RecordingLlm::replying("উত্তর"));
    let pipeline = pipeline_with(store, llm.clone(), settings);

    pipeline.answer("সব জাত").await.unwrap();

    let request = &llm.requests()[0];
    assert_eq!(request.model, "llama3.2");
    assert_eq!(request.temperature, Some(0.1));
    assert_eq!(request.system(), Some("সংক্ষেপে উত্তর দিন।"));
    assert!(request.last_user_message().unwrap().starts_with("সব জাত\n---\n[folonFulltext"));
}
