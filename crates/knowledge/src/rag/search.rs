//! Fulltext fan-out, ranking and variety filtering.
//!
//! Every configured index is queried with the raw question. A failing index
//! is logged and skipped; the remaining indexes still contribute.

use crate::graph::GraphStore;
use crate::types::FactRecord;
use futures::future::join_all;
use krishi_core::{AppError, AppResult};
use std::cmp::Ordering;

/// Result of querying one index.
#[derive(Debug)]
pub struct IndexOutcome {
    pub index: String,
    pub result: AppResult<Vec<FactRecord>>,
}

/// Facts gathered across all indexes.
#[derive(Debug, Default)]
pub struct SearchResults {
    /// Facts in index order, then per-index result order
    pub facts: Vec<FactRecord>,

    /// Indexes that failed
    pub failed_indexes: Vec<String>,
}

/// Query every index concurrently. Outcomes are returned in index order.
pub async fn fan_out(
    store: &dyn GraphStore,
    query: &str,
    indexes: &[String],
    limit: usize,
) -> Vec<IndexOutcome> {
    let queries = indexes.iter().map(|index| async move {
        let result: AppResult<Vec<FactRecord>> = store
            .fulltext_query(index, query, limit)
            .await
            .map(|hits| {
                hits.into_iter()
                    .map(|hit| FactRecord::from_hit(index, hit))
                    .collect()
            })
            .map_err(|e| AppError::IndexQueryFailed {
                index: index.clone(),
                message: e.to_string(),
            });

        IndexOutcome {
            index: index.clone(),
            result,
        }
    });

    join_all(queries).await
}

/// Concatenate successful outcomes and record failed indexes.
pub fn aggregate(outcomes: Vec<IndexOutcome>) -> SearchResults {
    let mut results = SearchResults::default();

    for outcome in outcomes {
        match outcome.result {
            Ok(facts) => results.facts.extend(facts),
            Err(e) => {
                tracing::warn!("Skipping index '{}': {}", outcome.index, e);
                results.failed_indexes.push(outcome.index);
            }
        }
    }

    results
}

/// Fan out over `indexes` and aggregate the outcomes.
pub async fn search(
    store: &dyn GraphStore,
    query: &str,
    indexes: &[String],
    limit: usize,
) -> SearchResults {
    tracing::debug!(
        "Querying {} indexes (limit {} per index) on {}",
        indexes.len(),
        limit,
        store.backend_name()
    );

    let results = aggregate(fan_out(store, query, indexes, limit).await);

    tracing::info!(
        "Retrieved {} facts ({} indexes failed)",
        results.facts.len(),
        results.failed_indexes.len()
    );
    results
}

/// Sort by descending score. Ties keep their input order; NaN sorts last.
pub fn rank(mut facts: Vec<FactRecord>) -> Vec<FactRecord> {
    facts.sort_by(|a, b| compare_scores(b.score, a.score));
    facts
}

fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Facts whose visible fields mention `variety`, preserving order.
pub fn filter_by_variety(facts: &[FactRecord], variety: &str) -> Vec<FactRecord> {
    facts
        .iter()
        .filter(|fact| fact.mentions(variety))
        .cloned()
        .collect()
}

/// Narrow to facts mentioning `variety`, falling back to the full list when
/// nothing matches. Returns the facts and whether the fallback was taken.
pub fn narrow_to_variety(facts: Vec<FactRecord>, variety: &str) -> (Vec<FactRecord>, bool) {
    let filtered = filter_by_variety(&facts, variety);
    if filtered.is_empty() {
        tracing::debug!(
            "No facts mention '{}', keeping all {} facts",
            variety,
            facts.len()
        );
        (facts, true)
    } else {
        (filtered, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{fact, FakeGraphStore};
    use serde_json::json;

    #[test]
    fn test_rank_descending() {
        let ranked = rank(vec![
            fact("a", 1.0, &[]),
            fact("b", 3.0, &[]),
            fact("c", 2.0, &[]),
        ]);

        let order: Vec<&str> = ranked.iter().map(|f| f.index.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(vec![
            fact("first", 2.0, &[]),
            fact("second", 2.0, &[]),
            fact("top", 4.0, &[]),
            fact("third", 2.0, &[]),
        ]);

        let order: Vec<&str> = ranked.iter().map(|f| f.index.as_str()).collect();
        assert_eq!(order, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_puts_nan_last() {
        let ranked = rank(vec![fact("nan", f64::NAN, &[]), fact("one", 1.0, &[])]);
        assert_eq!(ranked[0].index, "one");
        assert_eq!(ranked[1].index, "nan");
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_filter_by_variety() {
        let facts = vec![
            fact("a", 3.0, &[("জাতের নাম", json!("ব্রি ধান২৯"))]),
            fact("b", 2.0, &[("জাতের নাম", json!("ব্রি ধান২৮"))]),
            fact("c", 1.0, &[("বিবরণ", json!("ব্রি ধান২৮ বোরো মৌসুমের জাত"))]),
        ];

        let filtered = filter_by_variety(&facts, "ব্রি ধান২৮");
        let order: Vec<&str> = filtered.iter().map(|f| f.index.as_str()).collect();
        assert_eq!(order, vec!["b", "c"]);
    }

    #[test]
    fn test_narrow_falls_back_when_nothing_matches() {
        let facts = vec![
            fact("a", 2.0, &[("জাতের নাম", json!("ব্রি ধান২৯"))]),
            fact("b", 1.0, &[("ফলন", json!("৬ টন"))]),
        ];

        let (narrowed, fell_back) = narrow_to_variety(facts.clone(), "ব্রি ধান৫০");
        assert!(fell_back);
        assert_eq!(narrowed, facts);
    }

    #[test]
    fn test_narrow_keeps_matches_only() {
        let facts = vec![
            fact("a", 2.0, &[("জাতের নাম", json!("ব্রি ধান২৯"))]),
            fact("b", 1.0, &[("জাতের নাম", json!("ব্রি ধান৫০"))]),
        ];

        let (narrowed, fell_back) = narrow_to_variety(facts, "ব্রি ধান৫০");
        assert!(!fell_back);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].index, "b");
    }

    #[tokio::test]
    async fn test_fan_out_tolerates_failing_index() {
        let store = FakeGraphStore::new()
            .with_hits("first", vec![(1.0, vec![("ফলন", json!("৫ টন"))])])
            .with_failing_index("second")
            .with_hits("third", vec![(2.0, vec![("ফলন", json!("৭ টন"))])]);
        let indexes = vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
        ];

        let outcomes = fan_out(&store, "ফলন", &indexes, 3).await;
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            &outcomes[1].result,
            Err(AppError::IndexQueryFailed { index, .. }) if index == "second"
        ));

        let results = aggregate(outcomes);
        let order: Vec<&str> = results.facts.iter().map(|f| f.index.as_str()).collect();
        assert_eq!(order, vec!["first", "third"]);
        assert_eq!(results.failed_indexes, vec!["second"]);
    }

    #[tokio::test]
    async fn test_search_passes_query_and_limit() {
        let store = FakeGraphStore::new();
        let indexes = vec!["cropNameFulltext".to_string(), "folonFulltext".to_string()];

        let results = search(&store, "ব্রি ধান২৮", &indexes, 5).await;
        assert!(results.facts.is_empty());
        assert!(results.failed_indexes.is_empty());

        let calls = store.fulltext_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .all(|(_, query, limit)| query == "ব্রি ধান২৮" && *limit == 5));
    }
}
