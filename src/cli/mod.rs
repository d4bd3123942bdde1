//! CLI module for Glimt.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Glimt - Few-Shot Learning Retrieval for Video Analysis
///
/// Analyzes short-form videos with a multimodal LLM and learns from human
/// corrections: corrected interpretations are embedded, stored, and retrieved
/// as few-shot examples for future analyses.
#[derive(Parser, Debug)]
#[command(name = "glimt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Glimt configuration and example database
    Init,

    /// Analyze a video with few-shot examples from past corrections
    Analyze {
        /// URI of the hosted video (e.g. a GCS or Files API URI)
        video_uri: String,

        /// Identifier to store the analysis under (defaults to the URI)
        #[arg(long)]
        video_id: Option<String>,

        /// Video title
        #[arg(long)]
        title: Option<String>,

        /// Video description
        #[arg(long)]
        description: Option<String>,

        /// Path to a transcript text file
        #[arg(long)]
        transcript_file: Option<String>,

        /// Hashtags attached to the video
        #[arg(long, value_delimiter = ',')]
        hashtags: Vec<String>,

        /// Print the assembled prompt instead of calling the provider
        #[arg(long)]
        show_prompt: bool,
    },

    /// Search stored examples by semantic similarity
    Search {
        /// The query text
        query: String,

        /// Maximum number of examples to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity score
        #[arg(long)]
        min_score: Option<f32>,

        /// Restrict to one example type
        #[arg(long)]
        example_type: Option<String>,
    },

    /// Save a correction for a previously analyzed video
    Correct {
        /// Identifier of the analyzed video
        video_id: String,

        /// Name of the analysis field being corrected
        #[arg(long)]
        field: String,

        /// The corrected value
        #[arg(long)]
        value: String,

        /// Why the correction holds
        #[arg(long)]
        explanation: Option<String>,
    },

    /// List recently saved examples
    List {
        /// Maximum number of examples to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: commands::ConfigAction,
    },
}
