//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::SqliteExampleStore;
use anyhow::Result;

/// Run the init command: write a default config and create the database.
pub fn run_init(settings: &Settings) -> Result<()> {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config already exists at {:?}", config_path));
    } else {
        settings.save()?;
        Output::success(&format!("Wrote default config to {:?}", config_path));
    }

    std::fs::create_dir_all(settings.data_dir())?;
    SqliteExampleStore::new(&settings.sqlite_path())?;
    Output::success(&format!(
        "Example database ready at {:?}",
        settings.sqlite_path()
    ));

    Output::info("Set OPENAI_API_KEY for embeddings and GEMINI_API_KEY for analysis.");
    Ok(())
}
