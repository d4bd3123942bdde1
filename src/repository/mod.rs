//! Saving human-verified examples.
//!
//! The repository converts correction submissions into stored examples:
//! it builds the embedding input, embeds it once, and inserts the example,
//! recording an audit entry on the source video.

mod embedding_text;

pub use embedding_text::{build_embedding_text, EmbeddingTextBudgets};

use crate::analysis::AnalysisRecord;
use crate::embedding::Embedder;
use crate::error::{GlimtError, Result};
use crate::store::{
    CorrectionEvent, Example, ExampleStore, ExampleType, HumorTypeCorrection, VideoArchive,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for saving a new example.
#[derive(Debug, Clone)]
pub struct SaveExample {
    pub example_type: ExampleType,
    pub video_summary: String,
    pub gemini_interpretation: Option<String>,
    pub correct_interpretation: String,
    pub explanation: String,
    pub humor_type_correction: Option<HumorTypeCorrection>,
    pub cultural_context: Option<String>,
    pub visual_elements: Vec<String>,
    pub tags: Vec<String>,
    pub humor_types: Vec<String>,
    pub industry: Option<String>,
    pub content_format: Option<String>,
    pub quality_score: f32,
}

/// A human correction of one field of a stored analysis.
#[derive(Debug, Clone)]
pub struct CorrectionInput {
    /// Name of the analysis field being corrected.
    pub field: String,
    /// The human-verified value.
    pub corrected_value: String,
    /// Why the correction holds.
    pub explanation: Option<String>,
}

/// Saves corrected examples and correction audit history.
pub struct ExampleRepository {
    store: Arc<dyn ExampleStore>,
    archive: Arc<dyn VideoArchive>,
    embedder: Arc<dyn Embedder>,
    budgets: EmbeddingTextBudgets,
    correction_quality_score: f32,
}

impl ExampleRepository {
    /// Create a new repository.
    pub fn new(
        store: Arc<dyn ExampleStore>,
        archive: Arc<dyn VideoArchive>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            store,
            archive,
            embedder,
            budgets: EmbeddingTextBudgets::default(),
            correction_quality_score: 1.0,
        }
    }

    /// Set the embedding-text budgets.
    pub fn with_budgets(mut self, budgets: EmbeddingTextBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// Set the quality weight assigned to correction-derived examples.
    pub fn with_correction_quality_score(mut self, score: f32) -> Self {
        self.correction_quality_score = score;
        self
    }

    /// Save a new example: build embedding text, embed it once, insert.
    #[instrument(skip(self, input), fields(example_type = %input.example_type))]
    pub async fn save(&self, input: SaveExample) -> Result<Uuid> {
        if input.video_summary.trim().is_empty() {
            return Err(GlimtError::InvalidInput(
                "example requires a video summary".to_string(),
            ));
        }
        if input.correct_interpretation.trim().is_empty() {
            return Err(GlimtError::InvalidInput(
                "example requires a correct interpretation".to_string(),
            ));
        }

        let embedding_input = build_embedding_text(&input, &self.budgets);
        let embedding = self.embedder.embed(&embedding_input).await?;

        let mut example = Example::new(
            input.example_type,
            input.video_summary,
            input.gemini_interpretation,
            input.correct_interpretation,
            input.explanation,
            input.quality_score,
            embedding,
        );
        example.humor_type_correction = input.humor_type_correction;
        example.cultural_context = input.cultural_context;
        example.visual_elements = input.visual_elements;
        example.tags = input.tags;
        example.humor_types = input.humor_types;
        example.industry = input.industry;
        example.content_format = input.content_format;

        let id = example.id;
        self.store.insert(&example).await?;
        info!("Saved {} example {}", example.example_type, id);
        Ok(id)
    }

    /// Save a correction against a stored video analysis.
    ///
    /// Looks up the video's prior analysis, infers the example type from the
    /// corrected field, derives a video summary, saves the example, and
    /// appends an audit entry to the video's correction history. A missing
    /// video is a reported error, not a crash.
    #[instrument(skip(self, input), fields(video_id = %video_id, field = %input.field))]
    pub async fn save_correction(&self, video_id: &str, input: CorrectionInput) -> Result<Uuid> {
        let analysis = self
            .archive
            .get_analysis(video_id)
            .await?
            .ok_or_else(|| GlimtError::VideoNotFound(video_id.to_string()))?;

        let example_type = infer_example_type(&input.field, &input.corrected_value);
        let video_summary = analysis
            .summary_like()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Video {}", video_id));
        let previous = field_value(&analysis, &input.field);

        let save_input = SaveExample {
            example_type,
            video_summary,
            gemini_interpretation: previous.clone(),
            correct_interpretation: input.corrected_value.clone(),
            explanation: input.explanation.clone().unwrap_or_default(),
            humor_type_correction: None,
            cultural_context: non_empty(&analysis.cultural_context),
            visual_elements: analysis.visual_elements.clone(),
            tags: Vec::new(),
            humor_types: analysis.humor_types.clone(),
            industry: non_empty(&analysis.content_industry),
            content_format: non_empty(&analysis.content_format),
            quality_score: self.correction_quality_score,
        };

        let example_id = self.save(save_input).await?;

        let event = CorrectionEvent {
            field: input.field,
            previous,
            corrected: input.corrected_value,
            explanation: input.explanation,
            example_id,
            at: Utc::now(),
        };
        self.archive.append_correction(video_id, &event).await?;

        info!("Recorded correction on video {}", video_id);
        Ok(example_id)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Infer the example type from the corrected field name and content.
fn infer_example_type(field: &str, corrected_value: &str) -> ExampleType {
    let haystack = format!("{} {}", field, corrected_value).to_lowercase();

    if haystack.contains("cultur") {
        ExampleType::CulturalContext
    } else if haystack.contains("visual") {
        ExampleType::VisualPunchline
    } else if haystack.contains("replicab") {
        ExampleType::Replicability
    } else {
        ExampleType::HumorInterpretation
    }
}

/// The analysis value a correction replaces, by field name.
fn field_value(analysis: &AnalysisRecord, field: &str) -> Option<String> {
    let value = match field {
        "summary" => &analysis.summary,
        "humor_type" => &analysis.humor_type,
        "humor_mechanism" => &analysis.humor_mechanism,
        "core_insight" => &analysis.core_insight,
        "cultural_context" => &analysis.cultural_context,
        "tone" => &analysis.tone,
        "content_type" => &analysis.content_type,
        "quality_tier" => &analysis.quality_tier,
        _ => return None,
    };
    non_empty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryExampleStore;
    use async_trait::async_trait;

    /// Keyword-routing embedder: deterministic and text-sensitive enough for
    /// end-to-end retrieval assertions.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lowered = text.to_lowercase();
            if lowered.contains("barista") {
                Ok(vec![1.0, 0.0])
            } else if lowered.contains("gym") {
                Ok(vec![0.0, 1.0])
            } else {
                Ok(vec![0.7, 0.7])
            }
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn repository(store: Arc<MemoryExampleStore>) -> ExampleRepository {
        ExampleRepository::new(store.clone(), store, Arc::new(KeywordEmbedder))
    }

    fn barista_input() -> SaveExample {
        SaveExample {
            example_type: ExampleType::HumorInterpretation,
            video_summary: "A barista remembers a regular's order".to_string(),
            gemini_interpretation: None,
            correct_interpretation: "Quiet recognition humor".to_string(),
            explanation: "Mutual acknowledgment is the joke".to_string(),
            humor_type_correction: None,
            cultural_context: None,
            visual_elements: Vec::new(),
            tags: Vec::new(),
            humor_types: Vec::new(),
            industry: None,
            content_format: None,
            quality_score: 1.0,
        }
    }

    #[test]
    fn test_infer_example_type() {
        assert_eq!(
            infer_example_type("cultural_context", "references a meme"),
            ExampleType::CulturalContext
        );
        assert_eq!(
            infer_example_type("humor_type", "the visual contrast is the joke"),
            ExampleType::VisualPunchline
        );
        assert_eq!(
            infer_example_type("replicability_score", "8"),
            ExampleType::Replicability
        );
        assert_eq!(
            infer_example_type("humor_type", "anti-humor"),
            ExampleType::HumorInterpretation
        );
    }

    #[tokio::test]
    async fn test_save_then_retrieve_round_trip() {
        let store = Arc::new(MemoryExampleStore::new());
        let repo = repository(store.clone());

        let barista_id = repo.save(barista_input()).await.unwrap();

        let mut gym = barista_input();
        gym.video_summary = "A gym fail compilation".to_string();
        repo.save(gym).await.unwrap();

        // Query text matching the summary retrieves the saved example first.
        let query_embedding = KeywordEmbedder
            .embed("the barista video")
            .await
            .unwrap();
        let results = store
            .find_nearest(&query_embedding, &Default::default(), 0.5, 5)
            .await
            .unwrap();
        assert_eq!(results[0].example.id, barista_id);
        assert!((results[0].similarity - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_required_fields() {
        let store = Arc::new(MemoryExampleStore::new());
        let repo = repository(store);

        let mut input = barista_input();
        input.video_summary = "  ".to_string();
        assert!(matches!(
            repo.save(input).await,
            Err(GlimtError::InvalidInput(_))
        ));

        let mut input = barista_input();
        input.correct_interpretation = String::new();
        assert!(matches!(
            repo.save(input).await,
            Err(GlimtError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_save_correction_flow() {
        let store = Arc::new(MemoryExampleStore::new());
        let repo = repository(store.clone());

        let analysis = AnalysisRecord {
            summary: "A barista skit about regulars".to_string(),
            cultural_context: "Coffee-shop culture".to_string(),
            humor_type: "relatable".to_string(),
            ..Default::default()
        };
        store.store_analysis("vid42", &analysis).await.unwrap();

        let example_id = repo
            .save_correction(
                "vid42",
                CorrectionInput {
                    field: "cultural_context".to_string(),
                    corrected_value: "References third-wave coffee snobbery".to_string(),
                    explanation: Some("The model missed the subculture".to_string()),
                },
            )
            .await
            .unwrap();

        let example = store.get(example_id).await.unwrap().unwrap();
        assert_eq!(example.example_type, ExampleType::CulturalContext);
        assert_eq!(example.video_summary, "A barista skit about regulars");
        assert_eq!(
            example.gemini_interpretation.as_deref(),
            Some("Coffee-shop culture")
        );

        let history = store.correction_history("vid42").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].example_id, example_id);
        assert_eq!(history[0].previous.as_deref(), Some("Coffee-shop culture"));
    }

    #[tokio::test]
    async fn test_save_correction_missing_video() {
        let store = Arc::new(MemoryExampleStore::new());
        let repo = repository(store);

        let err = repo
            .save_correction(
                "missing",
                CorrectionInput {
                    field: "humor_type".to_string(),
                    corrected_value: "anti-humor".to_string(),
                    explanation: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GlimtError::VideoNotFound(_)));
    }
}
