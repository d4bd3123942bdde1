//! Example retrieval for few-shot prompt assembly.
//!
//! Orchestrates the embedder and the example store to find human-verified
//! examples relevant to a candidate video. Retrieval is best-effort: any
//! failure degrades to an empty example list so the analysis pipeline it
//! feeds never blocks on it.

pub mod context;

pub use context::{QueryBudgets, VideoSignals};

use crate::embedding::Embedder;
use crate::store::{ExampleFilter, ExampleStore, ExampleType, ScoredExample};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Per-call retrieval options.
///
/// `limit` and `threshold` fall back to the engine defaults when unset, so
/// configuration stays in one place.
#[derive(Debug, Clone, Default)]
pub struct RetrievalOptions {
    pub example_types: Vec<ExampleType>,
    pub humor_types: Vec<String>,
    pub industry: Option<String>,
    pub content_format: Option<String>,
    pub limit: Option<usize>,
    pub threshold: Option<f32>,
}

/// Retrieves relevant examples for a retrieval query.
pub struct RetrievalEngine {
    store: Arc<dyn ExampleStore>,
    embedder: Arc<dyn Embedder>,
    default_limit: usize,
    default_threshold: f32,
}

impl RetrievalEngine {
    /// Create a new retrieval engine.
    pub fn new(store: Arc<dyn ExampleStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            default_limit: 5,
            default_threshold: 0.5,
        }
    }

    /// Set the default result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the default similarity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.default_threshold = threshold;
        self
    }

    /// Find examples relevant to `query`, ordered by similarity descending.
    ///
    /// Returns an empty list on an empty query (without calling the embedding
    /// provider) and on any embedding or store failure. Usage counters of the
    /// returned examples are incremented in the background; a failed increment
    /// never affects the result.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn find_relevant_examples(
        &self,
        query: &str,
        options: &RetrievalOptions,
    ) -> Vec<ScoredExample> {
        if query.trim().is_empty() {
            debug!("Empty retrieval query, skipping example lookup");
            return Vec::new();
        }

        let query_embedding = match self.embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Example retrieval degraded: embedding failed: {}", e);
                return Vec::new();
            }
        };

        let filter = ExampleFilter {
            example_types: options.example_types.clone(),
            humor_types: options.humor_types.clone(),
            industry: options.industry.clone(),
            content_format: options.content_format.clone(),
        };
        let limit = options.limit.unwrap_or(self.default_limit);
        let threshold = options.threshold.unwrap_or(self.default_threshold);

        let results = match self
            .store
            .find_nearest(&query_embedding, &filter, threshold, limit)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Example retrieval degraded: store query failed: {}", e);
                return Vec::new();
            }
        };

        debug!("Retrieved {} relevant examples", results.len());

        // Usage bookkeeping is advisory; fire and forget.
        for scored in &results {
            let store = Arc::clone(&self.store);
            let id = scored.example.id;
            tokio::spawn(async move {
                if let Err(e) = store.record_usage(id).await {
                    debug!("Failed to record usage for example {}: {}", id, e);
                }
            });
        }

        results
    }
}
