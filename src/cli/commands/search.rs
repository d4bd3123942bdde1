//! Search command implementation.

use super::{build_embedder, open_store};
use crate::cli::Output;
use crate::config::Settings;
use crate::retrieval::{RetrievalEngine, RetrievalOptions};
use crate::store::ExampleType;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: Option<usize>,
    min_score: Option<f32>,
    example_type: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let store = open_store(&settings)?;
    let embedder = build_embedder(&settings);

    let engine = RetrievalEngine::new(store, embedder)
        .with_limit(settings.retrieval.limit)
        .with_threshold(settings.retrieval.threshold);

    let example_types = match example_type {
        Some(s) => vec![s
            .parse::<ExampleType>()
            .map_err(|e| anyhow::anyhow!("{}", e))?],
        None => Vec::new(),
    };
    let options = RetrievalOptions {
        example_types,
        limit,
        threshold: min_score,
        ..Default::default()
    };

    let spinner = Output::spinner("Searching...");
    let results = engine.find_relevant_examples(query, &options).await;
    spinner.finish_and_clear();

    if results.is_empty() {
        Output::warning("No examples found matching your query.");
    } else {
        Output::success(&format!("Found {} examples", results.len()));
        for scored in &results {
            Output::example_result(
                &scored.example.video_summary,
                &scored.example.example_type.to_string(),
                scored.similarity,
                &scored.example.correct_interpretation,
            );
        }
    }

    Ok(())
}
