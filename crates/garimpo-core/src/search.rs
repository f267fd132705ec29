//! Search orchestration: parallel fan-out over the registered sources,
//! isolated failure handling, and the rank/merge of whatever settled.

use std::collections::BTreeMap;
use std::time::Instant;

use futures::future;

use crate::models::{SearchRequest, SearchResponse, SourceStatus};
use crate::rank::sort_by_relevance;
use crate::traits::SourceExtractor;

/// Tunables outside the per-request contract.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// The merged result set is capped at `merge_multiplier ×
    /// per_source_limit` listings.
    pub merge_multiplier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            merge_multiplier: 3,
        }
    }
}

/// Fans a search out to every registered extractor, waits for all of them
/// to settle, and merges the survivors into one ranked response.
///
/// Stateless across calls. A source failure is data, not an error: it
/// becomes an `error` entry in the per-source status summary while the
/// sibling sources' listings go through untouched.
pub struct SearchService<E: SourceExtractor> {
    extractors: Vec<E>,
    config: SearchConfig,
}

impl<E: SourceExtractor> SearchService<E> {
    pub fn new(extractors: Vec<E>) -> Self {
        Self::with_config(extractors, SearchConfig::default())
    }

    pub fn with_config(extractors: Vec<E>, config: SearchConfig) -> Self {
        Self { extractors, config }
    }

    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let started = Instant::now();
        tracing::info!(
            query = %request.query_text,
            sources = self.extractors.len(),
            limit = request.per_source_limit,
            "starting search"
        );

        // All-settled fan-out: every branch resolves to a Result, so no
        // source can abort or delay a sibling's completion.
        let outcomes = future::join_all(
            self.extractors
                .iter()
                .map(|extractor| async move { (extractor.source(), extractor.extract(request).await) }),
        )
        .await;

        let mut listings = Vec::new();
        let mut per_source_status = BTreeMap::new();

        for (source, outcome) in outcomes {
            match outcome {
                Ok(batch) => {
                    per_source_status.insert(
                        source.as_str().to_string(),
                        SourceStatus::Success {
                            ads_count: batch.listings.len(),
                        },
                    );
                    listings.extend(batch.listings);
                }
                Err(err) => {
                    tracing::warn!(source = %source, error = %err, "source failed");
                    per_source_status.insert(
                        source.as_str().to_string(),
                        SourceStatus::Error {
                            error: err.to_string(),
                        },
                    );
                }
            }
        }

        sort_by_relevance(&mut listings);
        listings.truncate(self.config.merge_multiplier * request.per_source_limit);

        let execution_time_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            total = listings.len(),
            elapsed_ms = execution_time_ms,
            "search complete"
        );

        SearchResponse {
            total_results: listings.len(),
            listings,
            per_source_status,
            execution_time_ms,
        }
    }
}
