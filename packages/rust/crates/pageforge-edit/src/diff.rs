//! Diff generation for accepted edits.
//!
//! Produces a line diff of the document change using the `similar` crate, so
//! callers can preview exactly what an edit touched.

use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// Unified diff of an edit, with file headers naming the edited section.
///
/// Identical inputs produce an empty string.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str, section: &str) -> String {
    if original == modified {
        return String::new();
    }
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("{section} (before)"), &format!("{section} (after)"))
        .to_string()
}

/// Count inserted and deleted lines between two documents.
#[must_use]
pub fn change_counts(original: &str, modified: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(original, modified);
    diff.iter_all_changes()
        .fold((0, 0), |(inserted, deleted), change| match change.tag() {
            ChangeTag::Insert => (inserted + 1, deleted),
            ChangeTag::Delete => (inserted, deleted + 1),
            ChangeTag::Equal => (inserted, deleted),
        })
}
