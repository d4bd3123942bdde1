//! List command implementation.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::ExampleStore;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(limit: usize, settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;

    let total = store.example_count().await?;
    let examples = store.list_recent(limit).await?;

    if examples.is_empty() {
        Output::warning("No examples stored yet. Use `glimt correct` to add some.");
        return Ok(());
    }

    Output::header(&format!("Examples ({} of {})", examples.len(), total));
    for example in &examples {
        println!(
            "  {} [{}] used {}x - {}",
            example.created_at.format("%Y-%m-%d"),
            example.example_type,
            example.times_used,
            example.video_summary
        );
    }

    Ok(())
}
