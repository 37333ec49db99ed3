//! Engine configuration.
//!
//! Every field has a default, so a partial settings file deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Marker attribute that wires a form to the submission backend.
pub const DEFAULT_FORM_MARKER_ATTRIBUTE: &str = "data-form-submit";

/// Limits and markers used across the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditEngineConfig {
    /// Maximum instruction length after sanitization.
    pub instruction_max_chars: usize,
    /// Character budget for the insertion style-context snippet.
    pub style_context_chars: usize,
    /// Maximum length of `VersionMetadata::change_description`.
    pub change_description_chars: usize,
    /// Form-submission marker attribute preserved by every prompt.
    pub form_marker_attribute: String,
    /// Integrity thresholds.
    pub validation: ValidationPolicy,
}

impl Default for EditEngineConfig {
    fn default() -> Self {
        Self {
            instruction_max_chars: 1_000,
            style_context_chars: 1_500,
            change_description_chars: 100,
            form_marker_attribute: DEFAULT_FORM_MARKER_ATTRIBUTE.to_string(),
            validation: ValidationPolicy::default(),
        }
    }
}

/// Thresholds for the integrity validators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Image-count drop above this is a hard issue after a section merge.
    pub max_image_drop: usize,
    /// Section-count drop above this is a hard issue after a section merge.
    pub max_section_drop: usize,
    /// Merged length below this ratio of the original is a hard issue.
    pub min_size_ratio: f64,
    /// Image-count drop above this is a warning after a full-document edit.
    pub max_image_drop_warning: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_image_drop: 2,
            max_section_drop: 1,
            min_size_ratio: 0.7,
            max_image_drop_warning: 1,
        }
    }
}
