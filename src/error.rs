//! Error types for Glimt.

use thiserror::Error;

/// Library-level error type for Glimt operations.
#[derive(Error, Debug)]
pub enum GlimtError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Example store error: {0}")]
    ExampleStore(String),

    #[error("Generation provider error: {0}")]
    Generation(String),

    #[error("Could not parse analysis response: {message}. Response was: {snippet}")]
    AnalysisParse { message: String, snippet: String },

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GlimtError {
    /// Build a parse error carrying a bounded snippet of the raw response.
    pub fn analysis_parse(message: impl Into<String>, raw: &str) -> Self {
        let snippet: String = raw.chars().take(200).collect();
        GlimtError::AnalysisParse {
            message: message.into(),
            snippet,
        }
    }
}

/// Result type alias for Glimt operations.
pub type Result<T> = std::result::Result<T, GlimtError>;
