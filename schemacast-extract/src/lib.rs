//! # schemacast-extract
//!
//! Payload extraction from prose-wrapped model output.
//!
//! A model response is rarely just the payload: it comes with
//! explanations before, caveats after, markdown fences around, and, in
//! a streaming session, an unfinished tail. This crate locates the most
//! likely payload span and parses it into a
//! [`RawValue`](schemacast_core::RawValue) for the coercer, tolerating
//! the almost-JSON models actually produce (single quotes, unquoted
//! scalars, trailing commas, comments).
//!
//! Extraction never errors: text with no recognizable payload yields
//! `None`, and deciding whether that is a failure belongs to the coercer,
//! which knows whether the target is optional.
//!
//! ## Example
//!
//! ```rust
//! use schemacast_extract::extract_payload;
//!
//! let text = r#"Sure! Here's the answer: {"a": "x", "b": 5} Hope that helps!"#;
//! let payload = extract_payload(text).unwrap();
//! assert_eq!(payload.as_object().unwrap()["b"], schemacast_core::RawValue::Int(5));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod lenient;
mod scan;

use schemacast_core::RawValue;

/// Extract the most likely structured payload from complete text.
///
/// Candidates are balanced brace/bracket spans and markdown fences; when
/// several parse, the last one wins: models often restate the answer
/// after their reasoning. Returns `None` when nothing parses.
#[must_use]
pub fn extract_payload(text: &str) -> Option<RawValue> {
    let candidates = scan::candidates(text, false);
    tracing::debug!(candidates = candidates.len(), "scanned complete buffer");
    candidates.into_iter().next_back().map(|c| c.value)
}

/// Extract a payload from a truncated, still-growing buffer.
///
/// Like [`extract_payload`], but the trailing span may be unterminated:
/// open containers close at the last structurally received position, an
/// unterminated string contributes its received prefix, and incomplete
/// trailing scalar tokens are dropped. The result represents only the
/// fully received part of the payload.
#[must_use]
pub fn extract_partial_payload(text: &str) -> Option<RawValue> {
    let candidates = scan::candidates(text, true);
    tracing::trace!(candidates = candidates.len(), "scanned partial buffer");
    candidates.into_iter().next_back().map(|c| c.value)
}

/// Treat the trimmed whole text as one scalar value.
///
/// The fallback when the target's root is a primitive or enum and no
/// structured span parsed: the text itself is the answer. Quoted text is
/// unwrapped; `true`/`false`/`null` and number shapes are recognized;
/// anything else stays a string.
#[must_use]
pub fn scalar_payload(text: &str) -> RawValue {
    let trimmed = text.trim();
    if trimmed.starts_with(['"', '\'']) {
        if let Some(value) = lenient::parse_complete(trimmed) {
            return value;
        }
    }
    lenient::classify_token(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_prefers_restated_answer() {
        let text = r#"I considered {"a": 1} but settled on {"a": 2}."#;
        let payload = extract_payload(text).unwrap();
        assert_eq!(payload, RawValue::from(serde_json::json!({"a": 2})));
    }

    #[test]
    fn test_extract_none_on_prose() {
        assert!(extract_payload("There is no payload here.").is_none());
    }

    #[test]
    fn test_extract_fenced_payload() {
        let text = "Result:\n```json\n{\"items\": [1, 2, 3]}\n```\nDone.";
        let payload = extract_payload(text).unwrap();
        assert_eq!(
            payload,
            RawValue::from(serde_json::json!({"items": [1, 2, 3]}))
        );
    }

    #[test]
    fn test_extract_partial_growing_object() {
        let payload = extract_partial_payload(r#"{"done": true, "note": "hal"#).unwrap();
        assert_eq!(
            payload,
            RawValue::from(serde_json::json!({"done": true, "note": "hal"}))
        );
    }

    #[test]
    fn test_scalar_payload_classification() {
        assert_eq!(scalar_payload("  42 "), RawValue::Int(42));
        assert_eq!(scalar_payload("true"), RawValue::Bool(true));
        assert_eq!(scalar_payload("\"quoted\""), RawValue::String("quoted".into()));
        assert_eq!(
            scalar_payload("Positive. The user sounds happy."),
            RawValue::String("Positive. The user sounds happy.".into())
        );
    }
}
