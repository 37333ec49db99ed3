//! Version audit records.
//!
//! The core only builds the record. Persistence belongs to whatever
//! implements [`VersionStore`], which is write-only from here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sanitize::truncate_chars;
use crate::types::{Complexity, EditClassification, EditType, TargetSection};

/// Audit metadata for one accepted edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Instruction, truncated.
    pub change_description: String,
    /// Classified target.
    pub target_section: TargetSection,
    /// Classified edit type.
    pub edit_type: EditType,
    /// Classified complexity.
    pub complexity: Complexity,
    /// Whether the edit applied to several sections.
    pub is_multi_target: bool,
    /// Whether the edit inserted new content.
    pub is_insertion: bool,
    /// When the record was built.
    pub timestamp: DateTime<Utc>,
}

/// Write-only port for accepted edits.
pub trait VersionStore: Send + Sync {
    /// Persist an accepted edit and the resulting document.
    fn record(&self, metadata: &VersionMetadata, document: &str);
}

/// Builds [`VersionMetadata`] records.
pub struct VersionRecorder;

impl VersionRecorder {
    /// Record stamped with the current time.
    #[must_use]
    pub fn record(
        instruction: &str,
        classification: &EditClassification,
        max_description_chars: usize,
    ) -> VersionMetadata {
        Self::record_at(instruction, classification, max_description_chars, Utc::now())
    }

    /// Record with an explicit timestamp.
    #[must_use]
    pub fn record_at(
        instruction: &str,
        classification: &EditClassification,
        max_description_chars: usize,
        timestamp: DateTime<Utc>,
    ) -> VersionMetadata {
        VersionMetadata {
            change_description: truncate_chars(instruction.trim(), max_description_chars),
            target_section: classification.target_section,
            edit_type: classification.edit_type,
            complexity: classification.complexity,
            is_multi_target: classification.is_multi_target,
            is_insertion: classification.is_insertion,
            timestamp,
        }
    }
}
