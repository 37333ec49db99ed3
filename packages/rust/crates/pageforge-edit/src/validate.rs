//! Integrity validation.
//!
//! Compares a candidate document with the original and decides whether an
//! edit may be accepted. `issues` reject the edit; `warnings` are reported
//! but never block it.

use crate::config::{EditEngineConfig, ValidationPolicy};
use crate::markup::{count_tags, has_tag};
use crate::types::{DocumentStats, IntegrityVerdict, ValidationMode};

/// Issue reported when a section merge drops the footer.
pub const FOOTER_LOST_ISSUE: &str = "Footer element was lost during merge - rejecting";
/// Issue reported when a section merge drops the header.
pub const HEADER_LOST_ISSUE: &str = "Header element was lost during merge - rejecting";

impl DocumentStats {
    /// Collect tag statistics for a document.
    #[must_use]
    pub fn collect(html: &str) -> Self {
        Self {
            images: count_tags(html, "img"),
            sections: count_tags(html, "section"),
            scripts: count_tags(html, "script"),
            size: format_size(html.len()),
        }
    }
}

/// Pre/post-edit integrity checks.
#[derive(Debug, Clone)]
pub struct IntegrityValidator {
    policy: ValidationPolicy,
    form_marker_attribute: String,
}

impl Default for IntegrityValidator {
    fn default() -> Self {
        Self::from_config(&EditEngineConfig::default())
    }
}

impl IntegrityValidator {
    /// Validator with explicit thresholds.
    pub fn new(policy: ValidationPolicy, form_marker_attribute: impl Into<String>) -> Self {
        Self {
            policy,
            form_marker_attribute: form_marker_attribute.into(),
        }
    }

    /// Validator using the config's policy and form marker.
    #[must_use]
    pub fn from_config(config: &EditEngineConfig) -> Self {
        Self::new(config.validation, config.form_marker_attribute.clone())
    }

    /// Run the validator for `mode`.
    #[must_use]
    pub fn validate(&self, original: &str, merged: &str, mode: ValidationMode) -> IntegrityVerdict {
        match mode {
            ValidationMode::Section => self.validate_section_merge(original, merged),
            ValidationMode::FullDocument => self.validate_edited_html(original, merged),
        }
    }

    /// Check a document after section merges or insertions.
    ///
    /// Every finding here is a hard issue.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn validate_section_merge(&self, original: &str, merged: &str) -> IntegrityVerdict {
        let before = DocumentStats::collect(original);
        let after = DocumentStats::collect(merged);
        let mut issues = Vec::new();

        if before.images.saturating_sub(after.images) > self.policy.max_image_drop {
            issues.push(format!(
                "Too many images lost: {} -> {}",
                before.images, after.images
            ));
        }
        if before.sections.saturating_sub(after.sections) > self.policy.max_section_drop {
            issues.push(format!(
                "Too many sections lost: {} -> {}",
                before.sections, after.sections
            ));
        }
        if after.scripts < before.scripts {
            issues.push(format!(
                "Scripts were removed: {} -> {}",
                before.scripts, after.scripts
            ));
        }
        if has_tag(original, "footer") && !has_tag(merged, "footer") {
            issues.push(FOOTER_LOST_ISSUE.to_string());
        }
        if has_tag(original, "header") && !has_tag(merged, "header") {
            issues.push(HEADER_LOST_ISSUE.to_string());
        }
        if !original.is_empty() {
            let ratio = merged.len() as f64 / original.len() as f64;
            if ratio < self.policy.min_size_ratio {
                issues.push(format!(
                    "Document shrank to {:.0}% of its original size ({} -> {}) - suspicious",
                    ratio * 100.0,
                    before.size,
                    after.size
                ));
            }
        }

        Self::verdict(issues, Vec::new(), after)
    }

    /// Check a complete replacement document.
    #[must_use]
    pub fn validate_edited_html(&self, original: &str, edited: &str) -> IntegrityVerdict {
        let before = DocumentStats::collect(original);
        let after = DocumentStats::collect(edited);
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        let marker = self.form_marker_attribute.as_str();
        if !marker.is_empty() && original.contains(marker) && !edited.contains(marker) {
            issues.push(format!("Form submission marker `{marker}` was removed"));
        }
        if contains_ignore_case(original, "<!doctype") && !contains_ignore_case(edited, "<!doctype")
        {
            issues.push("Missing <!DOCTYPE> declaration".to_string());
        }
        if has_tag(original, "html") && !has_tag(edited, "html") {
            issues.push("Missing <html> element".to_string());
        }
        if has_tag(original, "header") && !has_tag(edited, "header") {
            issues.push("Header element was lost during edit".to_string());
        }
        if has_tag(original, "footer") && !has_tag(edited, "footer") {
            issues.push("Footer element was lost during edit".to_string());
        }

        if after.scripts < before.scripts {
            warnings.push(format!(
                "Script count reduced from {} to {}",
                before.scripts, after.scripts
            ));
        }
        if before.images.saturating_sub(after.images) > self.policy.max_image_drop_warning {
            warnings.push(format!(
                "Image count reduced from {} to {}",
                before.images, after.images
            ));
        }

        Self::verdict(issues, warnings, after)
    }

    fn verdict(issues: Vec<String>, warnings: Vec<String>, stats: DocumentStats) -> IntegrityVerdict {
        if !issues.is_empty() {
            tracing::warn!(issues = ?issues, "integrity check failed");
        }
        IntegrityVerdict {
            valid: issues.is_empty(),
            issues,
            warnings,
            stats,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
