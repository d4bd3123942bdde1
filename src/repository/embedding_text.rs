//! Embedding-input construction for examples.
//!
//! An example's embedding is derived from a labeled concatenation of its
//! fields in a fixed priority order; under length pressure, later (less
//! semantically dense) sections are truncated or dropped first.

use super::SaveExample;
use serde::{Deserialize, Serialize};

/// Character budgets applied while building embedding text.
///
/// Hand-tuned product constants, overridable from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingTextBudgets {
    /// Overall cap on the embedding input.
    pub total: usize,
    /// Cap per free-text section.
    pub section: usize,
    /// Cap for the scene-breakdown section.
    pub scene_breakdown: usize,
    /// Cap for the transcript excerpt.
    pub transcript_excerpt: usize,
}

impl Default for EmbeddingTextBudgets {
    fn default() -> Self {
        Self {
            total: 2000,
            section: 1000,
            scene_breakdown: 300,
            transcript_excerpt: 200,
        }
    }
}

/// Build the embedding input for an example.
///
/// Missing optional fields degrade to omitted sections; this never fails.
pub fn build_embedding_text(input: &SaveExample, budgets: &EmbeddingTextBudgets) -> String {
    let correction = input.humor_type_correction.as_ref();

    let pattern = {
        let mut labels: Vec<&str> = Vec::new();
        if let Some(c) = correction {
            if !c.correct_type.trim().is_empty() {
                labels.push(c.correct_type.as_str());
            }
        }
        labels.extend(input.humor_types.iter().map(String::as_str));
        labels.join(" ")
    };

    // Explanation is skipped when it merely repeats the corrected reading.
    let explanation = if input.explanation.trim() == input.correct_interpretation.trim() {
        ""
    } else {
        input.explanation.as_str()
    };

    let insight = correction.map(|c| c.justification.as_str()).unwrap_or("");
    let scenes = correction
        .and_then(|c| c.scene_breakdown.as_deref())
        .unwrap_or("");
    let transcript = correction
        .and_then(|c| c.transcript_excerpt.as_deref())
        .unwrap_or("");
    let visual = input.visual_elements.join(", ");
    let tags = input.tags.join(" ");

    // Priority order; later entries fall off first when the budget runs out.
    let sections: [(&str, &str, usize); 11] = [
        ("concept", input.video_summary.as_str(), budgets.section),
        (
            "original interpretation",
            input.gemini_interpretation.as_deref().unwrap_or(""),
            budgets.section,
        ),
        (
            "correct interpretation",
            input.correct_interpretation.as_str(),
            budgets.section,
        ),
        ("pattern", pattern.as_str(), budgets.section),
        ("explanation", explanation, budgets.section),
        ("insight", insight, budgets.section),
        ("visual", visual.as_str(), budgets.section),
        (
            "cultural",
            input.cultural_context.as_deref().unwrap_or(""),
            budgets.section,
        ),
        ("scenes", scenes, budgets.scene_breakdown),
        ("transcript", transcript, budgets.transcript_excerpt),
        ("tags", tags.as_str(), budgets.section),
    ];

    let mut parts: Vec<String> = Vec::new();
    let mut remaining = budgets.total;

    for (label, content, cap) in sections {
        if remaining == 0 {
            break;
        }
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        let allowed = cap.min(remaining);
        let truncated: String = content.chars().take(allowed).collect();
        remaining -= truncated.chars().count();
        parts.push(format!("{}: {}", label, truncated));
    }

    parts.join("\n")
}
