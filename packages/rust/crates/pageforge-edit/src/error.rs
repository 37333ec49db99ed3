//! Error types for the document edit pipeline.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

use crate::types::InsertPosition;

/// Error types for edit operations.
///
/// Every variant that reaches a caller means "edit not applied": the caller
/// keeps the pre-edit document unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Instruction was empty after sanitization.
    #[error("Instruction is empty after sanitization")]
    EmptyInstruction,

    /// Document has no content to edit.
    #[error("Document is empty")]
    EmptyDocument,

    /// Image edits go through the manual image replacement flow.
    #[error("Image changes are handled by the image replacement flow, not by AI editing")]
    ImageEditRedirected,

    /// An insertion anchor could not be located in the document.
    #[error("Could not find where to insert: no {anchor} section to insert {position}")]
    AnchorNotFound {
        /// Anchor name taken from the instruction (or the default anchor).
        anchor: String,
        /// Requested side of the anchor.
        position: InsertPosition,
    },

    /// All merge strategies failed to locate the original section.
    #[error("Could not locate the edited section in the document")]
    MergeFailed,

    /// The merge succeeded but the integrity check found hard issues.
    #[error("Edit rejected by integrity check: {}", issues.join("; "))]
    IntegrityRejected {
        /// Hard issues reported by the validator.
        issues: Vec<String>,
    },

    /// The generation service returned nothing usable.
    #[error("Generation service returned no markup")]
    EmptyResponse,

    /// The generation service call failed.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A merge pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(String),
}

impl EditError {
    /// Human-readable reason shown to the user when an edit is not applied.
    #[must_use]
    pub fn reason(&self) -> String {
        format!("Edit not applied: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_reason_lists_issues() {
        let error = EditError::IntegrityRejected {
            issues: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            error.reason(),
            "Edit not applied: Edit rejected by integrity check: a; b"
        );
    }

    #[test]
    fn test_anchor_reason_names_anchor() {
        let error = EditError::AnchorNotFound {
            anchor: "pricing".to_string(),
            position: InsertPosition::Before,
        };
        assert!(error.to_string().contains("no pricing section to insert before"));
    }
}
