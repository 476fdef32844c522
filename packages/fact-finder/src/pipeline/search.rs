//! Search stage: one web search per entity.

use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::pipeline::progress::Progress;
use crate::pipeline::prompts::{render_query, Template};
use crate::pipeline::throttle::Throttle;
use crate::traits::searcher::WebSearcher;
use crate::types::records::{SearchRecord, StageOutput, Warning};

/// Default cap on results kept per entity.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// What to do when a search request fails outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchErrorPolicy {
    /// Record an empty result list, warn, and move on.
    #[default]
    Skip,
    /// Stop the stage and return the error.
    Abort,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_results: usize,
    pub on_error: SearchErrorPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            on_error: SearchErrorPolicy::Skip,
        }
    }
}

/// Search every entity in order, one request at a time.
///
/// Produces exactly one record per entity unless the abort policy stops the
/// run early.
pub async fn run_search(
    entities: &[String],
    template: &Template,
    searcher: &dyn WebSearcher,
    throttle: &dyn Throttle,
    progress: &dyn Progress,
    options: &SearchOptions,
) -> Result<StageOutput<SearchRecord>, ProviderError> {
    let total = entities.len();
    let mut output = StageOutput {
        records: Vec::with_capacity(total),
        warnings: Vec::new(),
    };

    info!(entities = total, "Starting search stage");

    for (i, entity) in entities.iter().enumerate() {
        if i > 0 {
            throttle.pause().await;
        }

        let query = render_query(template, entity);
        debug!(entity = %entity, query = %query, "Searching");

        let (results, warning) = match searcher.search(&query, options.max_results).await {
            Ok(outcome) => match outcome.organic {
                Some(mut hits) if !hits.is_empty() => {
                    hits.truncate(options.max_results);
                    (hits, None)
                }
                _ => {
                    if let Some(notice) = &outcome.notice {
                        debug!(entity = %entity, notice = %notice, "Provider returned no organic results");
                    }
                    (Vec::new(), Some(Warning::no_results(entity.as_str())))
                }
            },
            Err(e) => match options.on_error {
                SearchErrorPolicy::Skip => {
                    let warning = Warning::search_failed(entity.as_str(), &e);
                    (Vec::new(), Some(warning))
                }
                SearchErrorPolicy::Abort => {
                    warn!(entity = %entity, error = %e, "Search failed, aborting stage");
                    return Err(e);
                }
            },
        };

        if let Some(warning) = warning {
            warn!(entity = %entity, "{}", warning);
            progress.warn(&warning);
            output.warnings.push(warning);
        }

        output.records.push(SearchRecord {
            entity: entity.clone(),
            query,
            results,
        });
        progress.advance(i + 1, total);
    }

    info!(
        records = output.records.len(),
        warnings = output.warnings.len(),
        "Search completed"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::progress::NoProgress;
    use crate::pipeline::throttle::NoDelay;
    use crate::testing::{hits, MockSearcher, RecordingProgress, RecordingThrottle};
    use crate::types::records::WarningKind;

    fn entities(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_record_per_entity_in_order() {
        let searcher = MockSearcher::new()
            .with_hits("Find the email of Alice", hits(3))
            .with_no_results("Find the email of Bob");

        let output = run_search(
            &entities(&["Alice", "Bob"]),
            &Template::new("Find the email of {entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].entity, "Alice");
        assert_eq!(output.records[0].query, "Find the email of Alice");
        assert_eq!(output.records[0].results.len(), 3);
        assert_eq!(output.records[1].entity, "Bob");
        assert!(output.records[1].results.is_empty());

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].entity, "Bob");
        assert_eq!(output.warnings[0].kind, WarningKind::NoResults);
    }

    #[tokio::test]
    async fn test_empty_organic_list_counts_as_no_results() {
        let searcher = MockSearcher::new().with_hits("Carol", vec![]);

        let output = run_search(
            &entities(&["Carol"]),
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert!(output.records[0].results.is_empty());
        assert_eq!(output.warnings[0].kind, WarningKind::NoResults);
    }

    #[tokio::test]
    async fn test_results_are_capped() {
        let searcher = MockSearcher::new().with_hits("Alice", hits(8));
        let options = SearchOptions {
            max_results: 5,
            ..Default::default()
        };

        let output = run_search(
            &entities(&["Alice"]),
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &options,
        )
        .await
        .unwrap();

        assert_eq!(output.records[0].results.len(), 5);
        assert_eq!(searcher.calls(), vec![("Alice".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_provider_error_is_skipped_by_default() {
        let searcher = MockSearcher::new()
            .with_failure("Alice", "HTTP 500")
            .with_hits("Bob", hits(1));

        let output = run_search(
            &entities(&["Alice", "Bob"]),
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(output.records.len(), 2);
        assert!(output.records[0].results.is_empty());
        assert_eq!(output.records[1].results.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::SearchFailed);
        assert!(output.warnings[0].message.contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_provider_error_aborts_under_abort_policy() {
        let searcher = MockSearcher::new()
            .with_hits("Alice", hits(1))
            .with_failure("Bob", "HTTP 500")
            .with_hits("Carol", hits(1));
        let options = SearchOptions {
            on_error: SearchErrorPolicy::Abort,
            ..Default::default()
        };

        let err = run_search(
            &entities(&["Alice", "Bob", "Carol"]),
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &NoProgress,
            &options,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("`Bob`"));
        assert_eq!(searcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_throttle_runs_between_requests_only() {
        let searcher = MockSearcher::new();
        let throttle = RecordingThrottle::default();

        run_search(
            &entities(&["A", "B", "C"]),
            &Template::new("{entity}"),
            &searcher,
            &throttle,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(throttle.pauses(), 2);
    }

    #[tokio::test]
    async fn test_progress_after_each_entity() {
        let searcher = MockSearcher::new().with_hits("A", hits(1));
        let progress = RecordingProgress::default();

        run_search(
            &entities(&["A", "B"]),
            &Template::new("{entity}"),
            &searcher,
            &NoDelay,
            &progress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(progress.steps(), vec![(1, 2), (2, 2)]);
        assert_eq!(progress.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_no_entities_makes_no_requests() {
        let searcher = MockSearcher::new();

        let output = run_search(
            &[],
            &Template::default(),
            &searcher,
            &NoDelay,
            &NoProgress,
            &SearchOptions::default(),
        )
        .await
        .unwrap();

        assert!(output.records.is_empty());
        assert!(searcher.calls().is_empty());
    }
}
