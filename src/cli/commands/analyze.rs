//! Analyze command implementation.

use super::{build_embedder, open_store};
use crate::analysis::{AnalysisInvoker, GeminiGenerator};
use crate::cli::Output;
use crate::config::Settings;
use crate::prompt::build_prompt;
use crate::retrieval::{RetrievalEngine, RetrievalOptions, VideoSignals};
use crate::store::VideoArchive;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Options gathered from the analyze command line.
pub struct AnalyzeArgs {
    pub video_uri: String,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub transcript_file: Option<String>,
    pub hashtags: Vec<String>,
    pub show_prompt: bool,
}

/// Run the analyze command.
pub async fn run_analyze(args: AnalyzeArgs, settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;
    let embedder = build_embedder(&settings);

    let transcript = match &args.transcript_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read transcript file {}", path))?,
        ),
        None => None,
    };

    let video_id = args
        .video_id
        .clone()
        .unwrap_or_else(|| args.video_uri.clone());

    // Prior analysis, if any, sharpens the retrieval query on re-analysis.
    let prior = store.get_analysis(&video_id).await?;

    let signals = VideoSignals {
        transcript,
        title: args.title.clone(),
        description: args.description.clone(),
        hashtags: args.hashtags.clone(),
        prior_analysis_excerpt: prior.as_ref().and_then(|a| {
            a.summary_like().map(str::to_string)
        }),
    };
    let query = signals.build_query(&settings.query_budgets);

    let engine = RetrievalEngine::new(store.clone(), embedder)
        .with_limit(settings.retrieval.limit)
        .with_threshold(settings.retrieval.threshold);

    let spinner = Output::spinner("Retrieving relevant examples...");
    let scored = engine
        .find_relevant_examples(&query, &RetrievalOptions::default())
        .await;
    spinner.finish_and_clear();

    if scored.is_empty() {
        Output::info("No past examples matched; using the reasoning chain alone.");
    } else {
        Output::info(&format!("Using {} past examples", scored.len()));
    }

    let examples: Vec<_> = scored.into_iter().map(|s| s.example).collect();
    let prompt = build_prompt(&examples);

    if args.show_prompt {
        println!("{}", prompt);
        return Ok(());
    }

    let api_key = std::env::var(&settings.analysis.api_key_env).with_context(|| {
        format!(
            "Missing Gemini API key; set {}",
            settings.analysis.api_key_env
        )
    })?;
    let provider = Arc::new(GeminiGenerator::new(api_key, &settings.analysis.model));
    let invoker = AnalysisInvoker::new(provider);

    let spinner = Output::spinner("Analyzing video...");
    let record = invoker.analyze(&prompt, &args.video_uri).await;
    spinner.finish_and_clear();

    let record = match record {
        Ok(r) => r,
        Err(e) => {
            Output::error(&format!("Analysis failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    };

    store.store_analysis(&video_id, &record).await?;

    Output::success(&format!("Analysis stored for {}", video_id));
    Output::header("Analysis");
    Output::kv("summary", &record.summary);
    Output::kv("humor type", &record.humor_type);
    Output::kv("mechanism", &record.humor_mechanism);
    Output::kv("core insight", &record.core_insight);
    Output::kv("quality tier", &record.quality_tier);
    Output::kv(
        "replicability",
        &record.replicability_score.to_string(),
    );

    Ok(())
}
