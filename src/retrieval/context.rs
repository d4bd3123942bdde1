//! Retrieval-query construction from raw video signals.
//!
//! Concatenates a video's text signals into a single query string for
//! embedding, most semantically dense fields first: transcript, then prior
//! analysis, then title, description, and hashtags.

use serde::{Deserialize, Serialize};

/// Character budgets applied while building a retrieval query.
///
/// These are hand-tuned product constants, not invariants; override them from
/// configuration if a different embedding model rewards longer context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryBudgets {
    /// Maximum transcript characters included.
    pub transcript: usize,
    /// Maximum prior-analysis characters included.
    pub prior_analysis: usize,
    /// Maximum description characters included.
    pub description: usize,
}

impl Default for QueryBudgets {
    fn default() -> Self {
        Self {
            transcript: 2000,
            prior_analysis: 1000,
            description: 300,
        }
    }
}

/// Raw text signals available for a candidate video.
#[derive(Debug, Clone, Default)]
pub struct VideoSignals {
    pub transcript: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub hashtags: Vec<String>,
    /// Excerpt of a previously generated analysis of this video.
    pub prior_analysis_excerpt: Option<String>,
}

impl VideoSignals {
    /// Build the retrieval query string.
    ///
    /// Returns an empty string when every signal is absent, meaning no
    /// retrieval is possible. Pure; no side effects.
    pub fn build_query(&self, budgets: &QueryBudgets) -> String {
        let mut sections: Vec<String> = Vec::new();

        if let Some(transcript) = non_empty(&self.transcript) {
            sections.push(truncate_chars(transcript, budgets.transcript));
        }
        if let Some(analysis) = non_empty(&self.prior_analysis_excerpt) {
            sections.push(truncate_chars(analysis, budgets.prior_analysis));
        }
        if let Some(title) = non_empty(&self.title) {
            sections.push(title.to_string());
        }
        if let Some(description) = non_empty(&self.description) {
            sections.push(truncate_chars(description, budgets.description));
        }
        let hashtags: Vec<&str> = self
            .hashtags
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();
        if !hashtags.is_empty() {
            sections.push(hashtags.join(" "));
        }

        sections.join("\n\n")
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Truncate to at most `max` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
