//! Few-shot prompt assembly.
//!
//! Combines the reasoning-chain template with retrieved human-verified
//! examples, partitioned into corrections (the model was wrong) and
//! confirmations (the model was right). Pure and deterministic: the same
//! ordered example list always produces byte-identical output.

use super::reasoning;
use crate::store::Example;

/// Placeholder written into migrated examples that never had a real
/// automated interpretation. Blocks rendering of an "original analysis" line.
pub const PLACEHOLDER_INTERPRETATION: &str = "Original Gemini analysis";

const BLOCK_BORDER: &str =
    "--------------------------------------------------------------------------------";

/// Maximum scene-breakdown lines rendered per correction block.
const SCENE_BREAKDOWN_LINES: usize = 4;

/// Maximum transcript-excerpt characters rendered per correction block.
const TRANSCRIPT_EXCERPT_CHARS: usize = 200;

/// Build the full instruction block for an analysis call.
///
/// With no examples this degrades to the reasoning chain alone; the chain is
/// mandatory scaffolding regardless of retrieval success, so the result is
/// never empty.
pub fn build_prompt(examples: &[Example]) -> String {
    let mut prompt = reasoning::build_prompt_section();

    if examples.is_empty() {
        return prompt;
    }

    let (confirmations, corrections): (Vec<&Example>, Vec<&Example>) = examples
        .iter()
        .partition(|e| e.example_type.is_confirmation());

    if !corrections.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str("LEARNING FROM HUMAN-VERIFIED CORRECTIONS\n");
        prompt.push_str(
            "Past analyses of similar videos were corrected by a human reviewer. \
             Study each correction before starting the reasoning chain.\n",
        );
        for example in &corrections {
            prompt.push('\n');
            prompt.push_str(&render_correction(example));
        }
    }

    if !confirmations.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str("VERIFIED CORRECT INTERPRETATIONS\n");
        prompt.push_str(
            "For similar videos, these past interpretations were verified correct. \
             They show the expected depth and specificity.\n",
        );
        for example in &confirmations {
            prompt.push('\n');
            prompt.push_str(&render_confirmation(example));
        }
    }

    if !corrections.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(MANDATORY_REQUIREMENTS);
    }

    prompt
}

fn render_correction(example: &Example) -> String {
    let mut block = String::new();
    block.push_str(BLOCK_BORDER);
    block.push('\n');
    block.push_str(&format!("VIDEO CONTEXT: {}\n", example.video_summary));

    match example.gemini_interpretation.as_deref() {
        Some(original) if original != PLACEHOLDER_INTERPRETATION => {
            block.push_str(&format!("PREVIOUS ANALYSIS (WRONG): {}\n", original));
            block.push_str(&format!(
                "CORRECTED BY HUMAN: {}\n",
                example.correct_interpretation
            ));
        }
        _ => {
            block.push_str(&format!(
                "CORRECT INTERPRETATION: {}\n",
                example.correct_interpretation
            ));
        }
    }

    block.push_str(&format!("WHY: {}\n", example.explanation));

    if let Some(correction) = &example.humor_type_correction {
        if let Some(scene) = correction
            .scene_breakdown
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            let lines: Vec<&str> = scene.lines().take(SCENE_BREAKDOWN_LINES).collect();
            block.push_str(&format!("SCENE BREAKDOWN:\n{}\n", lines.join("\n")));
        }
        if let Some(excerpt) = correction
            .transcript_excerpt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            block.push_str(&format!(
                "TRANSCRIPT: {}\n",
                excerpt_with_ellipsis(excerpt, TRANSCRIPT_EXCERPT_CHARS)
            ));
        }
    }

    block.push_str(BLOCK_BORDER);
    block.push('\n');
    block
}

fn render_confirmation(example: &Example) -> String {
    let mut block = String::new();
    block.push_str(BLOCK_BORDER);
    block.push('\n');
    block.push_str(&format!("VIDEO CONTEXT: {}\n", example.video_summary));
    block.push_str(&format!(
        "CONFIRMED CORRECT: {}\n",
        example.correct_interpretation
    ));
    block.push_str(&format!("WHY IT WAS RIGHT: {}\n", example.explanation));
    block.push_str(BLOCK_BORDER);
    block.push('\n');
    block
}

fn excerpt_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

const MANDATORY_REQUIREMENTS: &str = r#"MANDATORY REQUIREMENTS
1. Complete the full reasoning chain BEFORE assigning any humor type or other
   categorical label.
2. Your mechanism statement must be derived from, and specific to, your
   reasoning chain. A label pasted on at the end is not a mechanism.
3. Apply the explanation test: if your explanation would fit an unrelated
   video equally well, it is too generic. Rewrite it until it only fits this
   video.
4. Cross-reference the correction blocks above. If this video resembles one of
   them, do not repeat the mistake the human corrected.
5. Avoid the known failure modes: vague "subversion of expectations" labels,
   missing visual-only comedy because the transcript reads as unremarkable,
   and overexplaining simple relatable humor that viewers get instantly."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ExampleType, HumorTypeCorrection};

    fn correction_example() -> Example {
        Example::new(
            ExampleType::HumorInterpretation,
            "A roommate pretends not to hear the doorbell".to_string(),
            Some("The video mocks laziness".to_string()),
            "The joke is the escalating commitment to the bit".to_string(),
            "Each cut shows more effort spent avoiding less effort".to_string(),
            1.0,
            vec![1.0],
        )
    }

    fn confirmation_example() -> Example {
        Example::new(
            ExampleType::GoodInterpretation,
            "A dog side-eyes its owner mid-excuse".to_string(),
            Some("The dog acts as the audience surrogate".to_string()),
            "The dog acts as the audience surrogate".to_string(),
            "The reaction shot does the judging the viewer wants to do".to_string(),
            1.0,
            vec![1.0],
        )
    }

    #[test]
    fn test_empty_examples_degrade_to_reasoning_chain() {
        let prompt = build_prompt(&[]);
        assert_eq!(prompt, reasoning::build_prompt_section());
        assert!(!prompt.is_empty());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let examples = vec![correction_example(), confirmation_example()];
        let a = build_prompt(&examples);
        let b = build_prompt(&examples);
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_into_sections() {
        let correction = correction_example();
        let confirmation = confirmation_example();
        let prompt = build_prompt(&[confirmation.clone(), correction.clone()]);

        let corrections_at = prompt
            .find("LEARNING FROM HUMAN-VERIFIED CORRECTIONS")
            .unwrap();
        let confirmations_at = prompt.find("VERIFIED CORRECT INTERPRETATIONS").unwrap();

        // correction content appears only in the corrections section
        let correction_at = prompt.find(&correction.video_summary).unwrap();
        assert!(correction_at > corrections_at && correction_at < confirmations_at);

        // confirmation content appears only after the confirmations header
        let confirmation_at = prompt.find(&confirmation.video_summary).unwrap();
        assert!(confirmation_at > confirmations_at);
        assert_eq!(prompt.matches(&confirmation.video_summary).count(), 1);
        assert_eq!(prompt.matches(&correction.video_summary).count(), 1);
    }

    #[test]
    fn test_requirements_only_with_corrections() {
        let with_correction = build_prompt(&[correction_example()]);
        assert!(with_correction.contains("MANDATORY REQUIREMENTS"));

        let confirmations_only = build_prompt(&[confirmation_example()]);
        assert!(!confirmations_only.contains("MANDATORY REQUIREMENTS"));
        assert!(!confirmations_only.contains("LEARNING FROM HUMAN-VERIFIED CORRECTIONS"));
    }

    #[test]
    fn test_placeholder_interpretation_suppressed() {
        let mut example = correction_example();
        example.gemini_interpretation = Some(PLACEHOLDER_INTERPRETATION.to_string());
        let prompt = build_prompt(&[example.clone()]);

        assert!(!prompt.contains("PREVIOUS ANALYSIS"));
        assert!(!prompt.contains(PLACEHOLDER_INTERPRETATION));
        assert!(prompt.contains(&example.correct_interpretation));
        assert!(prompt.contains(&example.explanation));
    }

    #[test]
    fn test_original_vs_corrected_pair_rendered() {
        let example = correction_example();
        let prompt = build_prompt(&[example.clone()]);
        assert!(prompt.contains("PREVIOUS ANALYSIS (WRONG): The video mocks laziness"));
        assert!(prompt.contains(&format!(
            "CORRECTED BY HUMAN: {}",
            example.correct_interpretation
        )));
    }

    #[test]
    fn test_scene_breakdown_and_transcript_truncated() {
        let mut example = correction_example();
        example.humor_type_correction = Some(HumorTypeCorrection {
            correct_type: "escalation".to_string(),
            justification: "commitment escalates".to_string(),
            scene_breakdown: Some("line1\nline2\nline3\nline4\nline5\nline6".to_string()),
            transcript_excerpt: Some("x".repeat(300)),
            ..Default::default()
        });

        let prompt = build_prompt(&[example]);
        assert!(prompt.contains("line4"));
        assert!(!prompt.contains("line5"));
        assert!(prompt.contains(&format!("{}...", "x".repeat(200))));
        assert!(!prompt.contains(&"x".repeat(201)));
    }

    #[test]
    fn test_missing_optional_fields_do_not_panic() {
        let mut example = correction_example();
        example.gemini_interpretation = None;
        example.humor_type_correction = Some(HumorTypeCorrection::default());
        let prompt = build_prompt(&[example]);
        assert!(prompt.contains("CORRECT INTERPRETATION"));
        assert!(!prompt.contains("SCENE BREAKDOWN"));
        assert!(!prompt.contains("TRANSCRIPT:"));
    }
}
