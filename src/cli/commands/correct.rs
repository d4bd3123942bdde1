//! Correct command implementation.

use super::{build_embedder, open_store};
use crate::cli::Output;
use crate::config::Settings;
use crate::repository::{CorrectionInput, EmbeddingTextBudgets, ExampleRepository};
use anyhow::Result;

/// Run the correct command: save a human correction as a teaching example.
pub async fn run_correct(
    video_id: &str,
    field: &str,
    value: &str,
    explanation: Option<String>,
    settings: Settings,
) -> Result<()> {
    let store = open_store(&settings)?;
    let embedder = build_embedder(&settings);

    let budgets: EmbeddingTextBudgets = settings.embedding_text.clone();
    let repository = ExampleRepository::new(store.clone(), store, embedder)
        .with_budgets(budgets)
        .with_correction_quality_score(settings.analysis.correction_quality_score);

    let spinner = Output::spinner("Saving correction...");
    let result = repository
        .save_correction(
            video_id,
            CorrectionInput {
                field: field.to_string(),
                corrected_value: value.to_string(),
                explanation,
            },
        )
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(example_id) => {
            Output::success(&format!("Saved example {}", example_id));
            Output::info("Future analyses of similar videos will learn from this correction.");
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to save correction: {}", e));
            Err(anyhow::anyhow!("{}", e))
        }
    }
}
