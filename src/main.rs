//! Glimt CLI entry point.

use anyhow::Result;
use clap::Parser;
use glimt::cli::{commands, Cli, Commands};
use glimt::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("glimt={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Analyze {
            video_uri,
            video_id,
            title,
            description,
            transcript_file,
            hashtags,
            show_prompt,
        } => {
            commands::run_analyze(
                commands::AnalyzeArgs {
                    video_uri,
                    video_id,
                    title,
                    description,
                    transcript_file,
                    hashtags,
                    show_prompt,
                },
                settings,
            )
            .await?;
        }

        Commands::Search {
            query,
            limit,
            min_score,
            example_type,
        } => {
            commands::run_search(&query, limit, min_score, example_type.as_deref(), settings)
                .await?;
        }

        Commands::Correct {
            video_id,
            field,
            value,
            explanation,
        } => {
            commands::run_correct(&video_id, &field, &value, explanation, settings).await?;
        }

        Commands::List { limit } => {
            commands::run_list(limit, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
