//! Response cleaning and structural decoding.
//!
//! The proxy (and the AI coach behind it) sometimes wraps JSON in markdown
//! code fences. [`decode`] strips that wrapping before handing the text to
//! serde, and on failure reports enough context to diagnose the payload
//! without dumping it in full.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Characters of cleaned text kept at the start of a decode error.
pub const PREFIX_EXCERPT: usize = 200;
/// Characters of cleaned text kept at the end of a decode error.
pub const SUFFIX_EXCERPT: usize = 100;

const FENCE: &str = "```";

/// Structural decode failure with a bounded excerpt of the payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "Failed to decode {target}: {message} at line {line} column {column} \
     ({original_len} bytes raw, {cleaned_len} bytes cleaned, starts with {prefix:?})"
)]
pub struct DecodeError {
    /// Type the payload was expected to decode into.
    pub target: &'static str,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub original_len: usize,
    pub cleaned_len: usize,
    pub prefix: String,
    /// Empty when the cleaned text fits entirely in `prefix`.
    pub suffix: String,
}

/// Strip surrounding whitespace and markdown code fences.
pub fn clean(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix(FENCE) {
        s = match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            Some(_) => rest,
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix(FENCE) {
        s = rest;
    }

    s.trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Clean `text` and decode it into `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let cleaned = clean(text);
    serde_json::from_str(cleaned).map_err(|e| DecodeError {
        target: std::any::type_name::<T>(),
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
        original_len: text.len(),
        cleaned_len: cleaned.len(),
        prefix: cleaned.chars().take(PREFIX_EXCERPT).collect(),
        suffix: suffix_excerpt(cleaned),
    })
}

fn suffix_excerpt(text: &str) -> String {
    let total = text.chars().count();
    if total <= PREFIX_EXCERPT {
        return String::new();
    }
    let skip = total - SUFFIX_EXCERPT.min(total);
    text.chars().skip(skip).collect()
}

/// Pull a human-readable message out of a JSON error body.
///
/// Recognizes `{"error": {"message": ..}}`, `{"error": ".."}`, and `{"message": ..}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(clean(body)).ok()?;
    let message = value
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .or_else(|| value.get("message").and_then(|m| m.as_str()))?;
    Some(message.to_string())
}
