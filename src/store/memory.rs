//! In-memory example store implementation.
//!
//! Useful for testing and small datasets.

use super::{
    cosine_similarity, CorrectionEvent, Example, ExampleFilter, ExampleStore, ScoredExample,
    VideoArchive,
};
use crate::analysis::AnalysisRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory example store with a video analysis archive.
pub struct MemoryExampleStore {
    examples: RwLock<HashMap<Uuid, Example>>,
    videos: RwLock<HashMap<String, (AnalysisRecord, Vec<CorrectionEvent>)>>,
}

impl MemoryExampleStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            examples: RwLock::new(HashMap::new()),
            videos: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryExampleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExampleStore for MemoryExampleStore {
    async fn insert(&self, example: &Example) -> Result<()> {
        let mut examples = self.examples.write().unwrap();
        examples.insert(example.id, example.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Example>> {
        let examples = self.examples.read().unwrap();
        Ok(examples.get(&id).cloned())
    }

    async fn find_nearest(
        &self,
        query_embedding: &[f32],
        filter: &ExampleFilter,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredExample>> {
        let examples = self.examples.read().unwrap();

        let mut results: Vec<ScoredExample> = examples
            .values()
            .filter(|e| filter.matches(e))
            .map(|e| ScoredExample {
                similarity: cosine_similarity(query_embedding, &e.embedding),
                example: e.clone(),
            })
            .filter(|r| r.similarity >= threshold)
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn record_usage(&self, id: Uuid) -> Result<()> {
        let mut examples = self.examples.write().unwrap();
        if let Some(example) = examples.get_mut(&id) {
            example.times_used += 1;
        }
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Example>> {
        let examples = self.examples.read().unwrap();
        let mut all: Vec<Example> = examples.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }

    async fn example_count(&self) -> Result<usize> {
        let examples = self.examples.read().unwrap();
        Ok(examples.len())
    }
}

#[async_trait]
impl VideoArchive for MemoryExampleStore {
    async fn store_analysis(&self, video_id: &str, analysis: &AnalysisRecord) -> Result<()> {
        let mut videos = self.videos.write().unwrap();
        let entry = videos
            .entry(video_id.to_string())
            .or_insert_with(|| (analysis.clone(), Vec::new()));
        entry.0 = analysis.clone();
        Ok(())
    }

    async fn get_analysis(&self, video_id: &str) -> Result<Option<AnalysisRecord>> {
        let videos = self.videos.read().unwrap();
        Ok(videos.get(video_id).map(|(a, _)| a.clone()))
    }

    async fn append_correction(&self, video_id: &str, event: &CorrectionEvent) -> Result<()> {
        let mut videos = self.videos.write().unwrap();
        if let Some((_, history)) = videos.get_mut(video_id) {
            history.push(event.clone());
        }
        Ok(())
    }

    async fn correction_history(&self, video_id: &str) -> Result<Vec<CorrectionEvent>> {
        let videos = self.videos.read().unwrap();
        Ok(videos
            .get(video_id)
            .map(|(_, h)| h.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ExampleType;

    fn example(summary: &str, embedding: Vec<f32>) -> Example {
        Example::new(
            ExampleType::HumorInterpretation,
            summary.to_string(),
            None,
            "Correct reading".to_string(),
            "Because of timing".to_string(),
            1.0,
            embedding,
        )
    }

    #[tokio::test]
    async fn test_memory_example_store() {
        let store = MemoryExampleStore::new();

        let a = example("A barista skit", vec![1.0, 0.0, 0.0]);
        let b = example("A gym voiceover", vec![0.0, 1.0, 0.0]);
        let a_id = a.id;

        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        assert_eq!(store.example_count().await.unwrap(), 2);

        let results = store
            .find_nearest(&[1.0, 0.0, 0.0], &ExampleFilter::default(), 0.0, 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].similarity > results[1].similarity);
        assert_eq!(results[0].example.id, a_id);

        let fetched = store.get(a_id).await.unwrap().unwrap();
        assert_eq!(fetched.video_summary, "A barista skit");
    }

    #[tokio::test]
    async fn test_threshold_and_limit() {
        let store = MemoryExampleStore::new();
        store
            .insert(&example("one", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .insert(&example("two", vec![0.8, 0.6]))
            .await
            .unwrap();

        // similarity of "two" against the query axis is 0.8
        let results = store
            .find_nearest(&[1.0, 0.0], &ExampleFilter::default(), 0.9, 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].similarity >= 0.9);

        let limited = store
            .find_nearest(&[1.0, 0.0], &ExampleFilter::default(), 0.0, 1)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_record_usage() {
        let store = MemoryExampleStore::new();
        let e = example("counted", vec![1.0]);
        let id = e.id;
        store.insert(&e).await.unwrap();

        store.record_usage(id).await.unwrap();
        store.record_usage(id).await.unwrap();

        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.times_used, 2);
    }

    #[tokio::test]
    async fn test_video_archive() {
        let store = MemoryExampleStore::new();
        let analysis = AnalysisRecord {
            summary: "A man pretends to be a statue".to_string(),
            ..Default::default()
        };

        store.store_analysis("vid1", &analysis).await.unwrap();
        let fetched = store.get_analysis("vid1").await.unwrap().unwrap();
        assert_eq!(fetched.summary, "A man pretends to be a statue");

        assert!(store.get_analysis("missing").await.unwrap().is_none());

        let event = CorrectionEvent {
            field: "humor_type".to_string(),
            previous: Some("slapstick".to_string()),
            corrected: "anti-humor".to_string(),
            explanation: None,
            example_id: Uuid::new_v4(),
            at: chrono::Utc::now(),
        };
        store.append_correction("vid1", &event).await.unwrap();
        let history = store.correction_history("vid1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].corrected, "anti-humor");
    }
}
