//! Section merge engine.
//!
//! Re-integrates a generated section into the full document. Strategies run
//! in a fixed confidence order and stop at the first one that locates the
//! old section; the order lives in [`STRATEGIES`] so it stays auditable.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::EditError;
use crate::markup::{attribute_value, element_span_at, root_opening_tag};
use crate::types::{MergeMethod, MergeResult};

/// Locates the old section inside the document, returning the span to replace.
pub type LocateFn = fn(&str, &str) -> Result<Option<Range<usize>>, EditError>;

/// Merge strategies, highest confidence first.
pub const STRATEGIES: &[(MergeMethod, LocateFn)] = &[
    (MergeMethod::ExactMatch, exact_match),
    (MergeMethod::WhitespaceNormalized, whitespace_normalized),
    (MergeMethod::TagStructure, tag_structure),
    (MergeMethod::IdBased, id_based),
];

const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// MergeEngine - replaces an old section with its regenerated version.
///
/// # Example
///
/// ```rust
/// use pageforge_edit::{MergeEngine, MergeMethod};
///
/// let doc = "<header>H</header><footer>F</footer>";
/// let result = MergeEngine::merge(doc, "<header>H</header>", "<header>New</header>");
/// assert!(result.success);
/// assert_eq!(result.method, MergeMethod::ExactMatch);
/// assert_eq!(result.html, "<header>New</header><footer>F</footer>");
/// ```
pub struct MergeEngine;

impl MergeEngine {
    /// Replace `old_section` in `document` with `new_section`.
    ///
    /// On failure the document is returned unchanged with method `Failed`;
    /// callers must surface that, never drop it.
    #[must_use]
    pub fn merge(document: &str, old_section: &str, new_section: &str) -> MergeResult {
        Self::merge_from(document, 0, old_section, new_section).0
    }

    /// Like [`MergeEngine::merge`], but only matches `old_section` at or after
    /// byte `from`.
    ///
    /// Also returns the offset just past the inserted section, or `from` when
    /// the merge failed. Sequential merges chain that offset so a later
    /// section never lands on an identical earlier one.
    #[must_use]
    pub fn merge_from(
        document: &str,
        from: usize,
        old_section: &str,
        new_section: &str,
    ) -> (MergeResult, usize) {
        if old_section.trim().is_empty() {
            tracing::warn!("merge called with an empty original section");
            return (Self::failed(document), from);
        }
        let Some(tail) = document.get(from..) else {
            tracing::warn!(from, len = document.len(), "merge offset outside document");
            return (Self::failed(document), from);
        };

        for (method, locate) in STRATEGIES {
            match locate(tail, old_section) {
                Ok(Some(span)) => {
                    let span = from + span.start..from + span.end;
                    tracing::debug!(method = %method, start = span.start, end = span.end, "merge strategy matched");
                    let end = span.start + new_section.len();
                    let result = MergeResult {
                        success: true,
                        html: splice(document, span, new_section),
                        method: *method,
                    };
                    return (result, end);
                }
                Ok(None) => tracing::debug!(method = %method, "merge strategy found no match"),
                Err(error) => {
                    tracing::debug!(method = %method, error = %error, "merge strategy skipped");
                }
            }
        }

        tracing::warn!(
            section_len = old_section.len(),
            from,
            "all merge strategies failed; document left unchanged"
        );
        (Self::failed(document), from)
    }

    /// Span a single strategy would replace, for inspecting strategies in isolation.
    pub fn strategy_span(
        method: MergeMethod,
        document: &str,
        old_section: &str,
    ) -> Result<Option<Range<usize>>, EditError> {
        STRATEGIES
            .iter()
            .find(|(m, _)| *m == method)
            .map_or(Ok(None), |(_, locate)| locate(document, old_section))
    }

    fn failed(document: &str) -> MergeResult {
        MergeResult {
            success: false,
            html: document.to_string(),
            method: MergeMethod::Failed,
        }
    }
}

fn splice(document: &str, span: Range<usize>, replacement: &str) -> String {
    let mut merged = String::with_capacity(document.len() - span.len() + replacement.len());
    merged.push_str(&document[..span.start]);
    merged.push_str(replacement);
    merged.push_str(&document[span.end..]);
    merged
}

fn exact_match(document: &str, old: &str) -> Result<Option<Range<usize>>, EditError> {
    Ok(document.find(old).map(|start| start..start + old.len()))
}

/// Original whitespace runs become `\s+`; everything else is literal.
fn whitespace_normalized(document: &str, old: &str) -> Result<Option<Range<usize>>, EditError> {
    let pattern = flexible_whitespace(old);
    if pattern.is_empty() {
        return Ok(None);
    }
    let re = build(&pattern, false)?;
    Ok(re.find(document).map(|m| m.range()))
}

/// Same root tag name and attributes; the body may differ.
fn tag_structure(document: &str, old: &str) -> Result<Option<Range<usize>>, EditError> {
    let Some(root) = root_opening_tag(old) else {
        return Ok(None);
    };
    let attributes = flexible_whitespace(root.attributes);
    let pattern = if attributes.is_empty() {
        format!(r"<{}\s*>", regex::escape(&root.name))
    } else {
        format!(r"<{}\s+{}\s*>", regex::escape(&root.name), attributes)
    };
    let re = build(&pattern, true)?;
    Ok(first_complete_element(document, &re).or_else(|| {
        // Unbalanced markup: fall back to the nearest closing tag.
        let lazy = format!(r"{pattern}[\s\S]*?</{}\s*>", regex::escape(&root.name));
        build(&lazy, true)
            .ok()
            .and_then(|re| re.find(document).map(|m| m.range()))
    }))
}

/// Any element carrying the root element's `id`.
fn id_based(document: &str, old: &str) -> Result<Option<Range<usize>>, EditError> {
    let Some(id) = root_opening_tag(old).and_then(|root| attribute_value(root.attributes, "id"))
    else {
        return Ok(None);
    };
    if id.trim().is_empty() {
        return Ok(None);
    }
    let pattern = format!(
        r#"<[A-Za-z][A-Za-z0-9-]*\b[^>]*\sid\s*=\s*["']?{}["']?[\s/>]"#,
        regex::escape(id)
    );
    let re = build(&pattern, true)?;
    Ok(first_complete_element(document, &re))
}

fn first_complete_element(document: &str, re: &Regex) -> Option<Range<usize>> {
    re.find_iter(document)
        .find_map(|m| element_span_at(document, m.start()))
}

fn flexible_whitespace(text: &str) -> String {
    text.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn build(pattern: &str, case_insensitive: bool) -> Result<Regex, EditError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| EditError::Pattern(e.to_string()))
}
