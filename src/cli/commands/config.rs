//! Config command implementation.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to render config: {}", e))?;
            println!("{}", rendered);
        }
        ConfigAction::Path => {
            Output::kv(
                "config",
                &Settings::default_config_path().display().to_string(),
            );
            Output::kv("database", &settings.sqlite_path().display().to_string());
        }
    }
    Ok(())
}
