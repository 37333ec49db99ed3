//! Input and output normalization.
//!
//! Instructions are stripped of injection-style control phrases before any
//! other stage sees them. Service responses are stripped of code fences
//! before they are merged.

use once_cell::sync::Lazy;
use regex::Regex;

static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "IGNORE previous instructions ...", "ignore all rules ..." up to end of line
        r"(?i)\bignore\s+(?:(?:all|any|the)\s+)*(?:previous|prior|above|earlier|preceding|instructions|rules|prompts)\b[^\n]*",
        // Role prefixes
        r"(?i)\b(?:system|assistant)\s*:",
        // Code fence markers with optional language tag
        r"```[A-Za-z0-9_-]*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Failed to compile sanitization pattern"))
    .collect()
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace pattern"));

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").expect("Failed to compile fence pattern")
});

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```\s*$").expect("Failed to compile fence pattern"));

/// Strip control phrases, collapse whitespace and bound the length.
///
/// Stripping is silent: the caller only ever sees the cleaned instruction.
#[must_use]
pub fn sanitize_instruction(raw: &str, max_chars: usize) -> String {
    let mut cleaned = raw.to_string();
    for pattern in INJECTION_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            tracing::debug!(pattern = pattern.as_str(), "stripped control phrase from instruction");
            cleaned = pattern.replace_all(&cleaned, " ").into_owned();
        }
    }
    let collapsed = WHITESPACE_RUN.replace_all(cleaned.trim(), " ");
    collapsed.chars().take(max_chars).collect::<String>().trim().to_string()
}

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ```` from a service response.
#[must_use]
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    let without_open = OPENING_FENCE.replace(trimmed, "");
    let without_close = CLOSING_FENCE.replace(&without_open, "");
    without_close.trim().to_string()
}

/// Truncate to `max_chars`, marking the cut with `...`.
pub(crate) fn truncate_chars(input: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
