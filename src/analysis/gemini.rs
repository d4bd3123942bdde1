//! Gemini generation provider.
//!
//! Thin REST client for the Gemini `generateContent` endpoint, sending the
//! assembled prompt alongside a reference to externally-hosted video bytes.

use super::GenerationProvider;
use crate::error::{GlimtError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for generation requests (5 minutes; video analysis is slow).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Gemini-based multimodal generator.
pub struct GeminiGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a new generator for the given model.
    pub fn new(api_key: String, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key,
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (useful for proxies and tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Part {
    text: String,
}

#[async_trait]
impl GenerationProvider for GeminiGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, video_uri = %video_uri))]
    async fn generate(&self, prompt: &str, video_uri: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "file_data": {
                            "file_uri": video_uri,
                            "mime_type": "video/mp4"
                        }
                    },
                    { "text": prompt }
                ]
            }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GlimtError::Generation(format!(
                "Gemini API returned {}: {}",
                status,
                detail.chars().take(300).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response.json().await?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GlimtError::Generation(
                "Empty response from Gemini".to_string(),
            ));
        }

        debug!("Received {} chars from Gemini", text.len());
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "part one "}, {"text": "part two"}]
                }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "part one part two");
    }

    #[test]
    fn test_base_url_override() {
        let generator =
            GeminiGenerator::new("key".to_string(), "gemini-2.0-flash").with_base_url("http://localhost:9999/");
        assert_eq!(generator.base_url, "http://localhost:9999");
    }
}
