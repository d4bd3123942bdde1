//! Analysis invocation against the generation provider.
//!
//! The provider's output is untrusted free text. Parsing is tolerant and
//! every optional field defaults to a neutral value, so downstream consumers
//! never see missing data.

mod gemini;
pub mod parse;

pub use gemini::GeminiGenerator;

use crate::error::Result;
use crate::store::DeepReasoning;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Mid-scale default for 1-10 scores absent from the provider output.
fn default_mid_score() -> u8 {
    5
}

/// Normalized structured result of a video analysis.
///
/// Every field is defaulted: numeric scores to mid-scale, lists to empty,
/// booleans to false, strings to empty. Defaulting is this type's
/// responsibility, never the provider's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRecord {
    /// Short natural-language description of the video.
    pub summary: String,
    /// Assigned humor-taxonomy label.
    pub humor_type: String,
    /// The specific comedic mechanism, per the reasoning chain.
    pub humor_mechanism: String,
    /// What a replicator would need to understand.
    pub core_insight: String,
    /// Cultural knowledge required for the video to land.
    pub cultural_context: String,
    /// Performer tone and delivery.
    pub tone: String,
    /// Content-type classification (skit, candid, reaction, ...).
    pub content_type: String,
    /// Content industry of the video.
    pub content_industry: String,
    /// Content format of the video.
    pub content_format: String,
    /// Quality tier (exceptional / strong / average / weak).
    pub quality_tier: String,
    /// Justification for the tier, grounded in the reasoning chain.
    pub quality_justification: String,
    /// Visual elements that carry meaning, in order of appearance.
    pub visual_elements: Vec<String>,
    /// All humor-taxonomy labels that apply.
    pub humor_types: Vec<String>,
    /// How replicable the video's effect is, 1-10.
    #[serde(default = "default_mid_score")]
    pub replicability_score: u8,
    /// Estimated virality potential, 1-10.
    #[serde(default = "default_mid_score")]
    pub virality_score: u8,
    /// Whether the video appears scripted.
    pub is_scripted: bool,
    /// Whether outside cultural knowledge is required.
    pub requires_cultural_knowledge: bool,
    /// The structured reasoning-chain answers.
    pub deep_reasoning: DeepReasoning,
}

impl Default for AnalysisRecord {
    fn default() -> Self {
        Self {
            summary: String::new(),
            humor_type: String::new(),
            humor_mechanism: String::new(),
            core_insight: String::new(),
            cultural_context: String::new(),
            tone: String::new(),
            content_type: String::new(),
            content_industry: String::new(),
            content_format: String::new(),
            quality_tier: String::new(),
            quality_justification: String::new(),
            visual_elements: Vec::new(),
            humor_types: Vec::new(),
            replicability_score: default_mid_score(),
            virality_score: default_mid_score(),
            is_scripted: false,
            requires_cultural_knowledge: false,
            deep_reasoning: DeepReasoning::default(),
        }
    }
}

impl AnalysisRecord {
    /// First non-empty summary-like field, used when deriving a video
    /// summary for a correction example.
    pub fn summary_like(&self) -> Option<&str> {
        [&self.summary, &self.core_insight, &self.humor_mechanism]
            .into_iter()
            .map(String::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Trait for multimodal generation backends.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate free-form text for a prompt plus an externally-hosted video.
    async fn generate(&self, prompt: &str, video_uri: &str) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Sends assembled prompts to the generation provider and parses the result.
pub struct AnalysisInvoker {
    provider: Arc<dyn GenerationProvider>,
}

impl AnalysisInvoker {
    /// Create a new invoker over a generation provider.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Run one analysis call and parse the response into a normalized record.
    ///
    /// A parse failure is fatal to this single call and surfaces a typed
    /// error carrying a snippet of the raw response.
    #[instrument(skip(self, prompt), fields(provider = self.provider.name()))]
    pub async fn analyze(&self, prompt: &str, video_uri: &str) -> Result<AnalysisRecord> {
        let raw = self.provider.generate(prompt, video_uri).await?;
        debug!("Provider returned {} chars", raw.len());
        parse::parse_model_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlimtError;

    struct CannedProvider(String);

    #[async_trait]
    impl GenerationProvider for CannedProvider {
        async fn generate(&self, _prompt: &str, _video_uri: &str) -> Result<String> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[test]
    fn test_record_defaults_are_neutral() {
        let record: AnalysisRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.replicability_score, 5);
        assert_eq!(record.virality_score, 5);
        assert!(record.visual_elements.is_empty());
        assert!(!record.is_scripted);
        assert_eq!(record.summary, "");
    }

    #[test]
    fn test_summary_like_priority() {
        let record = AnalysisRecord {
            core_insight: "the insight".to_string(),
            humor_mechanism: "the mechanism".to_string(),
            ..Default::default()
        };
        assert_eq!(record.summary_like(), Some("the insight"));

        let record = AnalysisRecord::default();
        assert_eq!(record.summary_like(), None);
    }

    #[tokio::test]
    async fn test_invoker_parses_fenced_response() {
        let provider = Arc::new(CannedProvider(
            "Here is my analysis:\n```json\n{\"summary\": \"A skit\", \"virality_score\": 8}\n```"
                .to_string(),
        ));
        let invoker = AnalysisInvoker::new(provider);

        let record = invoker.analyze("prompt", "gs://videos/1").await.unwrap();
        assert_eq!(record.summary, "A skit");
        assert_eq!(record.virality_score, 8);
        assert_eq!(record.replicability_score, 5);
    }

    #[tokio::test]
    async fn test_invoker_surfaces_parse_error_with_snippet() {
        let provider = Arc::new(CannedProvider("I refuse to answer in JSON.".to_string()));
        let invoker = AnalysisInvoker::new(provider);

        let err = invoker.analyze("prompt", "gs://videos/1").await.unwrap_err();
        match err {
            GlimtError::AnalysisParse { snippet, .. } => {
                assert!(snippet.contains("I refuse"));
            }
            other => panic!("expected AnalysisParse, got {:?}", other),
        }
    }
}
