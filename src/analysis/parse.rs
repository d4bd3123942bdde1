//! Tolerant JSON extraction from LLM output.
//!
//! Generation providers return free text that usually, but not always,
//! contains one JSON object. This module isolates the tolerance rules:
//! Markdown code fences are stripped, the first balanced `{...}` span is
//! extracted, and trailing commas before closing brackets are sanitized
//! before a retry. Keeping this behind one function lets the rules evolve
//! without touching the prompt assembler or the invoker.

use crate::error::{GlimtError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tracing::{debug, trace};

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid regex"))
}

/// Parse a typed value out of raw model output.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let candidate = extract_code_block(raw).unwrap_or_else(|| raw.trim());

    let span = balanced_object_span(candidate)
        .ok_or_else(|| GlimtError::analysis_parse("no JSON object found", raw))?;

    trace!("Extracted {} char JSON span from {} char response", span.len(), raw.len());

    match serde_json::from_str(span) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // Trailing commas are the most common conformance failure.
            let sanitized = trailing_comma_re().replace_all(span, "$1");
            debug!("First parse failed ({}), retrying after sanitization", first_err);
            serde_json::from_str(&sanitized)
                .map_err(|e| GlimtError::analysis_parse(e.to_string(), raw))
        }
    }
}

/// Extract the body of the first Markdown code fence, if the response leads
/// with one (an optional language tag after the opening fence is skipped).
fn extract_code_block(text: &str) -> Option<&str> {
    let text = text.trim();
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')?;
    let body = &after_fence[body_start + 1..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Find the first balanced top-level `{...}` span, ignoring braces inside
/// string literals.
fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        label: String,
        #[serde(default)]
        score: u8,
    }

    #[test]
    fn test_raw_json() {
        let probe: Probe = parse_model_json(r#"{"label": "skit", "score": 7}"#).unwrap();
        assert_eq!(probe.label, "skit");
        assert_eq!(probe.score, 7);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "Sure, here you go:\n```json\n{\"label\": \"candid\"}\n```\nLet me know!";
        let probe: Probe = parse_model_json(raw).unwrap();
        assert_eq!(probe.label, "candid");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n{\"label\": \"reaction\"}\n```";
        let probe: Probe = parse_model_json(raw).unwrap();
        assert_eq!(probe.label, "reaction");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "The analysis follows. {\"label\": \"skit\", \"score\": 3} Hope that helps.";
        let probe: Probe = parse_model_json(raw).unwrap();
        assert_eq!(probe.score, 3);
    }

    #[test]
    fn test_trailing_commas_sanitized() {
        let raw = r#"{"label": "skit", "score": 9,}"#;
        let probe: Probe = parse_model_json(raw).unwrap();
        assert_eq!(probe.score, 9);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let raw = r#"{"label": "uses {braces} inside", "score": 2}"#;
        let probe: Probe = parse_model_json(raw).unwrap();
        assert_eq!(probe.label, "uses {braces} inside");
    }

    #[test]
    fn test_nested_objects() {
        #[derive(Deserialize)]
        struct Outer {
            inner: Probe,
        }
        let raw = r#"preamble {"inner": {"label": "nested", "score": 1}} postamble"#;
        let outer: Outer = parse_model_json(raw).unwrap();
        assert_eq!(outer.inner.label, "nested");
    }

    #[test]
    fn test_no_json_is_typed_error() {
        let err = parse_model_json::<Probe>("there is no json here").unwrap_err();
        match err {
            GlimtError::AnalysisParse { snippet, .. } => {
                assert!(snippet.contains("no json here"));
            }
            other => panic!("expected AnalysisParse, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_json_is_typed_error() {
        let err = parse_model_json::<Probe>(r#"{"label": "cut of"#).unwrap_err();
        assert!(matches!(err, GlimtError::AnalysisParse { .. }));
    }
}
