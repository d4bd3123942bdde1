//! Example storage for Glimt.
//!
//! Provides a trait-based interface for backends holding human-verified
//! examples with their embeddings, plus the per-video analysis archive.

mod memory;
mod sqlite;

pub use memory::MemoryExampleStore;
pub use sqlite::SqliteExampleStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisRecord;

/// Closed enumeration of teaching-example categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleType {
    HumorInterpretation,
    CulturalContext,
    VisualPunchline,
    Misdirection,
    Replicability,
    BadInterpretation,
    GoodInterpretation,
}

impl std::str::FromStr for ExampleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "humor_interpretation" => Ok(ExampleType::HumorInterpretation),
            "cultural_context" => Ok(ExampleType::CulturalContext),
            "visual_punchline" => Ok(ExampleType::VisualPunchline),
            "misdirection" => Ok(ExampleType::Misdirection),
            "replicability" => Ok(ExampleType::Replicability),
            "bad_interpretation" => Ok(ExampleType::BadInterpretation),
            "good_interpretation" => Ok(ExampleType::GoodInterpretation),
            _ => Err(format!("Unknown example type: {}", s)),
        }
    }
}

impl std::fmt::Display for ExampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExampleType::HumorInterpretation => "humor_interpretation",
            ExampleType::CulturalContext => "cultural_context",
            ExampleType::VisualPunchline => "visual_punchline",
            ExampleType::Misdirection => "misdirection",
            ExampleType::Replicability => "replicability",
            ExampleType::BadInterpretation => "bad_interpretation",
            ExampleType::GoodInterpretation => "good_interpretation",
        };
        write!(f, "{}", s)
    }
}

impl ExampleType {
    /// Confirmations reinforce a verified-correct reading; everything else
    /// teaches by correcting a wrong one.
    pub fn is_confirmation(&self) -> bool {
        matches!(self, ExampleType::GoodInterpretation)
    }
}

/// Structured reasoning fields mirroring the reasoning-chain output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepReasoning {
    pub character_dynamic: Option<String>,
    pub underlying_tension: Option<String>,
    pub format_participation: Option<String>,
    pub editing_contribution: Option<String>,
    pub visual_punchline: Option<String>,
    pub tone_delivery: Option<String>,
    pub audience_surrogate: Option<String>,
    pub wordplay: Option<String>,
    pub social_dynamic: Option<String>,
    pub cultural_context: Option<String>,
    pub content_type: Option<String>,
    pub quality_tier: Option<String>,
    pub quality_justification: Option<String>,
    pub mechanism: Option<String>,
    pub core_insight: Option<String>,
}

/// A category-label correction with its supporting evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumorTypeCorrection {
    /// Label the automated analysis originally assigned.
    pub original_type: Option<String>,
    /// Human-verified correct label.
    pub correct_type: String,
    /// Free-text justification for the correction.
    pub justification: String,
    /// Scene-by-scene breakdown supporting the correction.
    pub scene_breakdown: Option<String>,
    /// Transcript excerpt supporting the correction.
    pub transcript_excerpt: Option<String>,
    /// Structured reasoning attached to the correction.
    pub deep_reasoning: Option<DeepReasoning>,
}

/// A stored, human-verified unit of corrected interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    /// Unique example ID.
    pub id: Uuid,
    /// Teaching-example category.
    pub example_type: ExampleType,
    /// Short description of the source video (the retrieval anchor).
    pub video_summary: String,
    /// What the automated analysis originally produced, if any.
    pub gemini_interpretation: Option<String>,
    /// The human-verified correct reading.
    pub correct_interpretation: String,
    /// Why the correct interpretation holds.
    pub explanation: String,
    /// Structured category-label correction, if one was made.
    pub humor_type_correction: Option<HumorTypeCorrection>,
    /// Cultural references needed to get the joke.
    pub cultural_context: Option<String>,
    /// Ordered visual elements that carry meaning.
    pub visual_elements: Vec<String>,
    /// Free tags used for filtering and embedding text.
    pub tags: Vec<String>,
    /// Humor-taxonomy labels this example teaches about.
    pub humor_types: Vec<String>,
    /// Content industry of the source video (e.g. "food", "fitness").
    pub industry: Option<String>,
    /// Content format of the source video (e.g. "skit", "voiceover").
    pub content_format: Option<String>,
    /// Weight of this example; human corrections score higher than
    /// batch-migrated ones.
    pub quality_score: f32,
    /// How many times this example has been retrieved.
    pub times_used: u32,
    /// Embedding vector, generated once at creation.
    pub embedding: Vec<f32>,
    /// When this example was created.
    pub created_at: DateTime<Utc>,
}

impl Example {
    /// Create a new example with a fresh ID and zeroed usage counter.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        example_type: ExampleType,
        video_summary: String,
        gemini_interpretation: Option<String>,
        correct_interpretation: String,
        explanation: String,
        quality_score: f32,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            example_type,
            video_summary,
            gemini_interpretation,
            correct_interpretation,
            explanation,
            humor_type_correction: None,
            cultural_context: None,
            visual_elements: Vec::new(),
            tags: Vec::new(),
            humor_types: Vec::new(),
            industry: None,
            content_format: None,
            quality_score,
            times_used: 0,
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// An example matched by similarity search.
#[derive(Debug, Clone)]
pub struct ScoredExample {
    /// The matched example.
    pub example: Example,
    /// Cosine similarity to the query in [0, 1] (higher is better).
    pub similarity: f32,
}

/// Categorical restrictions applied during similarity search.
#[derive(Debug, Clone, Default)]
pub struct ExampleFilter {
    /// Restrict to these example types (empty = any).
    pub example_types: Vec<ExampleType>,
    /// Restrict to examples teaching any of these humor types (empty = any).
    pub humor_types: Vec<String>,
    /// Restrict to a content industry.
    pub industry: Option<String>,
    /// Restrict to a content format.
    pub content_format: Option<String>,
}

impl ExampleFilter {
    /// Whether an example passes every provided restriction.
    pub fn matches(&self, example: &Example) -> bool {
        if !self.example_types.is_empty() && !self.example_types.contains(&example.example_type) {
            return false;
        }
        if !self.humor_types.is_empty()
            && !self.humor_types.iter().any(|h| example.humor_types.contains(h))
        {
            return false;
        }
        if let Some(industry) = &self.industry {
            if example.industry.as_deref() != Some(industry.as_str()) {
                return false;
            }
        }
        if let Some(format) = &self.content_format {
            if example.content_format.as_deref() != Some(format.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Audit entry recorded on a video when a correction is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionEvent {
    /// Name of the analysis field that was corrected.
    pub field: String,
    /// Value the analysis held before the correction, if any.
    pub previous: Option<String>,
    /// Human-verified value.
    pub corrected: String,
    /// Optional explanation supplied with the correction.
    pub explanation: Option<String>,
    /// The example created from this correction.
    pub example_id: Uuid,
    /// When the correction was recorded.
    pub at: DateTime<Utc>,
}

/// Trait for example store implementations.
#[async_trait]
pub trait ExampleStore: Send + Sync {
    /// Store a new example.
    async fn insert(&self, example: &Example) -> Result<()>;

    /// Fetch an example by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Example>>;

    /// Nearest-neighbor search with categorical filters and a similarity
    /// floor, ordered by similarity descending, truncated to `limit`.
    async fn find_nearest(
        &self,
        query_embedding: &[f32],
        filter: &ExampleFilter,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredExample>>;

    /// Increment the usage counter of an example.
    async fn record_usage(&self, id: Uuid) -> Result<()>;

    /// List the most recently created examples.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Example>>;

    /// Get total example count.
    async fn example_count(&self) -> Result<usize>;
}

/// Trait for per-video analysis persistence.
///
/// Corrections reference the prior automated analysis of their source video,
/// so the archive lives next to the example store.
#[async_trait]
pub trait VideoArchive: Send + Sync {
    /// Store (or replace) the analysis for a video.
    async fn store_analysis(&self, video_id: &str, analysis: &AnalysisRecord) -> Result<()>;

    /// Fetch the stored analysis for a video.
    async fn get_analysis(&self, video_id: &str) -> Result<Option<AnalysisRecord>>;

    /// Append a correction event to a video's history.
    async fn append_correction(&self, video_id: &str, event: &CorrectionEvent) -> Result<()>;

    /// Fetch a video's correction history, oldest first.
    async fn correction_history(&self, video_id: &str) -> Result<Vec<CorrectionEvent>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
