//! SQLite-based example store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For large example libraries, consider the sqlite-vec extension or a
//! dedicated vector database behind the same trait.

use super::{
    cosine_similarity, CorrectionEvent, Example, ExampleFilter, ExampleStore, ExampleType,
    ScoredExample, VideoArchive,
};
use crate::analysis::AnalysisRecord;
use crate::error::{GlimtError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS examples (
    id TEXT PRIMARY KEY,
    example_type TEXT NOT NULL,
    video_summary TEXT NOT NULL,
    gemini_interpretation TEXT,
    correct_interpretation TEXT NOT NULL,
    explanation TEXT NOT NULL,
    humor_type_correction TEXT,
    cultural_context TEXT,
    visual_elements TEXT NOT NULL,
    tags TEXT NOT NULL,
    humor_types TEXT NOT NULL,
    industry TEXT,
    content_format TEXT,
    quality_score REAL NOT NULL,
    times_used INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_examples_type ON examples(example_type);
CREATE INDEX IF NOT EXISTS idx_examples_created_at ON examples(created_at);

CREATE TABLE IF NOT EXISTS videos (
    video_id TEXT PRIMARY KEY,
    analysis_json TEXT NOT NULL,
    correction_history TEXT NOT NULL,
    analyzed_at TEXT NOT NULL
);
"#;

/// SQLite-based example store.
pub struct SqliteExampleStore {
    conn: Mutex<Connection>,
}

impl SqliteExampleStore {
    /// Create a new SQLite example store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite example store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite example store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| GlimtError::ExampleStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_example(row: &Row<'_>) -> rusqlite::Result<Example> {
        let id_str: String = row.get(0)?;
        let type_str: String = row.get(1)?;
        let correction_json: Option<String> = row.get(6)?;
        let visual_json: String = row.get(8)?;
        let tags_json: String = row.get(9)?;
        let humor_json: String = row.get(10)?;
        let embedding_bytes: Vec<u8> = row.get(15)?;
        let created_at_str: String = row.get(16)?;

        Ok(Example {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            example_type: type_str
                .parse::<ExampleType>()
                .unwrap_or(ExampleType::HumorInterpretation),
            video_summary: row.get(2)?,
            gemini_interpretation: row.get(3)?,
            correct_interpretation: row.get(4)?,
            explanation: row.get(5)?,
            humor_type_correction: correction_json
                .and_then(|json| serde_json::from_str(&json).ok()),
            cultural_context: row.get(7)?,
            visual_elements: serde_json::from_str(&visual_json).unwrap_or_default(),
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            humor_types: serde_json::from_str(&humor_json).unwrap_or_default(),
            industry: row.get(11)?,
            content_format: row.get(12)?,
            quality_score: row.get(13)?,
            times_used: row.get(14)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
SELECT id, example_type, video_summary, gemini_interpretation, correct_interpretation,
       explanation, humor_type_correction, cultural_context, visual_elements, tags,
       humor_types, industry, content_format, quality_score, times_used, embedding,
       created_at
FROM examples
"#;

#[async_trait]
impl ExampleStore for SqliteExampleStore {
    #[instrument(skip(self, example))]
    async fn insert(&self, example: &Example) -> Result<()> {
        let conn = self.lock()?;

        let correction_json = example
            .humor_type_correction
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            r#"
            INSERT INTO examples
            (id, example_type, video_summary, gemini_interpretation, correct_interpretation,
             explanation, humor_type_correction, cultural_context, visual_elements, tags,
             humor_types, industry, content_format, quality_score, times_used, embedding,
             created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                example.id.to_string(),
                example.example_type.to_string(),
                example.video_summary,
                example.gemini_interpretation,
                example.correct_interpretation,
                example.explanation,
                correction_json,
                example.cultural_context,
                serde_json::to_string(&example.visual_elements)?,
                serde_json::to_string(&example.tags)?,
                serde_json::to_string(&example.humor_types)?,
                example.industry,
                example.content_format,
                example.quality_score,
                example.times_used,
                Self::embedding_to_bytes(&example.embedding),
                example.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Inserted example {}", example.id);
        Ok(())
    }

    async fn get(&self, id: uuid::Uuid) -> Result<Option<Example>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let example = stmt.query_row(params![id.to_string()], Self::row_to_example);

        match example {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, query_embedding, filter))]
    async fn find_nearest(
        &self,
        query_embedding: &[f32],
        filter: &ExampleFilter,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredExample>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(SELECT_COLUMNS)?;
        let examples = stmt.query_map([], Self::row_to_example)?;

        let mut results: Vec<ScoredExample> = examples
            .filter_map(|e| e.ok())
            .filter(|e| filter.matches(e))
            .map(|e| ScoredExample {
                similarity: cosine_similarity(query_embedding, &e.embedding),
                example: e,
            })
            .filter(|r| r.similarity >= threshold)
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        debug!("Found {} matching examples", results.len());
        Ok(results)
    }

    async fn record_usage(&self, id: uuid::Uuid) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "UPDATE examples SET times_used = times_used + 1 WHERE id = ?1",
            params![id.to_string()],
        )?;

        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Example>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;
        let examples = stmt.query_map(params![limit as i64], Self::row_to_example)?;

        Ok(examples.filter_map(|e| e.ok()).collect())
    }

    async fn example_count(&self) -> Result<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM examples", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl VideoArchive for SqliteExampleStore {
    #[instrument(skip(self, analysis))]
    async fn store_analysis(&self, video_id: &str, analysis: &AnalysisRecord) -> Result<()> {
        let conn = self.lock()?;

        let analysis_json = serde_json::to_string(analysis)?;

        // Preserve correction history across re-analysis
        conn.execute(
            r#"
            INSERT INTO videos (video_id, analysis_json, correction_history, analyzed_at)
            VALUES (?1, ?2, '[]', ?3)
            ON CONFLICT(video_id) DO UPDATE SET
                analysis_json = excluded.analysis_json,
                analyzed_at = excluded.analyzed_at
            "#,
            params![video_id, analysis_json, Utc::now().to_rfc3339()],
        )?;

        info!("Stored analysis for video {}", video_id);
        Ok(())
    }

    async fn get_analysis(&self, video_id: &str) -> Result<Option<AnalysisRecord>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT analysis_json FROM videos WHERE video_id = ?1",
            params![video_id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_correction(&self, video_id: &str, event: &CorrectionEvent) -> Result<()> {
        let conn = self.lock()?;

        let history_json: String = conn
            .query_row(
                "SELECT correction_history FROM videos WHERE video_id = ?1",
                params![video_id],
                |row| row.get(0),
            )
            .unwrap_or_else(|_| "[]".to_string());

        let mut history: Vec<CorrectionEvent> =
            serde_json::from_str(&history_json).unwrap_or_default();
        history.push(event.clone());

        conn.execute(
            "UPDATE videos SET correction_history = ?1 WHERE video_id = ?2",
            params![serde_json::to_string(&history)?, video_id],
        )?;

        Ok(())
    }

    async fn correction_history(&self, video_id: &str) -> Result<Vec<CorrectionEvent>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT correction_history FROM videos WHERE video_id = ?1",
            params![video_id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HumorTypeCorrection;

    #[tokio::test]
    async fn test_sqlite_example_store() {
        let store = SqliteExampleStore::in_memory().unwrap();

        let mut example = Example::new(
            ExampleType::Misdirection,
            "A cooking tutorial that turns into a prank".to_string(),
            Some("A straightforward recipe video".to_string()),
            "The recipe framing is a setup for the reveal".to_string(),
            "The first 20 seconds build false expectations".to_string(),
            1.0,
            vec![0.5, 0.5, 0.0],
        );
        example.tags = vec!["prank".to_string(), "cooking".to_string()];
        example.humor_type_correction = Some(HumorTypeCorrection {
            original_type: Some("tutorial".to_string()),
            correct_type: "misdirection".to_string(),
            justification: "The entire setup exists to be subverted".to_string(),
            ..Default::default()
        });
        let id = example.id;

        store.insert(&example).await.unwrap();
        assert_eq!(store.example_count().await.unwrap(), 1);

        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.example_type, ExampleType::Misdirection);
        assert_eq!(fetched.tags, vec!["prank", "cooking"]);
        assert_eq!(
            fetched.humor_type_correction.unwrap().correct_type,
            "misdirection"
        );
        assert_eq!(fetched.embedding, vec![0.5, 0.5, 0.0]);

        let results = store
            .find_nearest(&[0.5, 0.5, 0.0], &ExampleFilter::default(), 0.9, 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].similarity - 1.0).abs() < 0.001);

        store.record_usage(id).await.unwrap();
        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.times_used, 1);
    }

    #[tokio::test]
    async fn test_sqlite_video_archive() {
        let store = SqliteExampleStore::in_memory().unwrap();

        let analysis = AnalysisRecord {
            summary: "Street interview with an unexpected answer".to_string(),
            humor_type: "misdirection".to_string(),
            ..Default::default()
        };
        store.store_analysis("tiktok_123", &analysis).await.unwrap();

        let fetched = store.get_analysis("tiktok_123").await.unwrap().unwrap();
        assert_eq!(fetched.humor_type, "misdirection");

        let event = CorrectionEvent {
            field: "cultural_context".to_string(),
            previous: None,
            corrected: "References a regional meme format".to_string(),
            explanation: Some("Model missed the meme reference".to_string()),
            example_id: uuid::Uuid::new_v4(),
            at: Utc::now(),
        };
        store.append_correction("tiktok_123", &event).await.unwrap();
        store.append_correction("tiktok_123", &event).await.unwrap();

        let history = store.correction_history("tiktok_123").await.unwrap();
        assert_eq!(history.len(), 2);

        // Re-analysis keeps the history
        store.store_analysis("tiktok_123", &analysis).await.unwrap();
        let history = store.correction_history("tiktok_123").await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_filtered_search() {
        let store = SqliteExampleStore::in_memory().unwrap();

        let mut a = Example::new(
            ExampleType::CulturalContext,
            "A wedding toast gone wrong".to_string(),
            None,
            "The humor depends on wedding etiquette".to_string(),
            "Breaking a familiar ritual is the joke".to_string(),
            1.0,
            vec![1.0, 0.0],
        );
        a.industry = Some("events".to_string());

        let mut b = Example::new(
            ExampleType::VisualPunchline,
            "A gym fail compilation".to_string(),
            None,
            "The cut to the trainer's face is the punchline".to_string(),
            "Reaction shots carry the comedy".to_string(),
            1.0,
            vec![1.0, 0.0],
        );
        b.industry = Some("fitness".to_string());

        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        let filter = ExampleFilter {
            industry: Some("fitness".to_string()),
            ..Default::default()
        };
        let results = store
            .find_nearest(&[1.0, 0.0], &filter, 0.5, 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].example.example_type, ExampleType::VisualPunchline);
    }
}
