//! Core types for the edit pipeline.
//!
//! Defines the data structures passed between classification, location,
//! prompting, merging and validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page region an instruction is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetSection {
    /// `<header>` element.
    Header,
    /// Hero or banner section.
    Hero,
    /// `<footer>` element.
    Footer,
    /// Form or contact block.
    Form,
    /// Images. Never sent to the generation service.
    Image,
    /// Buttons and button-styled links.
    Button,
    /// Heading tags.
    Heading,
    /// Colors, backgrounds and other styling.
    Style,
    /// Pricing tables.
    Pricing,
    /// Body text and paragraphs.
    Text,
    /// Unrecognized target; edited by selector or as a whole.
    SpecificElement,
    /// Whole document.
    FullPage,
}

impl TargetSection {
    /// Wire name of the target.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Hero => "hero",
            Self::Footer => "footer",
            Self::Form => "form",
            Self::Image => "image",
            Self::Button => "button",
            Self::Heading => "heading",
            Self::Style => "style",
            Self::Pricing => "pricing",
            Self::Text => "text",
            Self::SpecificElement => "specific-element",
            Self::FullPage => "full-page",
        }
    }
}

impl fmt::Display for TargetSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of change requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditType {
    /// Visual change only.
    StyleChange,
    /// New content.
    Addition,
    /// Content removal.
    Removal,
    /// Rewording.
    ContentChange,
    /// Image swap.
    ImageReplacement,
    /// Anything else.
    Modification,
}

impl EditType {
    /// Wire name of the edit type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StyleChange => "style-change",
            Self::Addition => "addition",
            Self::Removal => "removal",
            Self::ContentChange => "content-change",
            Self::ImageReplacement => "image-replacement",
            Self::Modification => "modification",
        }
    }
}

impl fmt::Display for EditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated complexity of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Short, targeted request.
    Low,
    /// Multi-target, insertion or longer request.
    Medium,
    /// Long or page-wide request.
    High,
}

/// Side of an anchor where new content is spliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    /// Immediately before the anchor's opening tag.
    Before,
    /// Immediately after the anchor's closing tag.
    After,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::After => "after",
        })
    }
}

/// Where an insertion should land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionAnchor {
    /// Side of the anchor.
    pub position: InsertPosition,
    /// Anchor name (e.g. `hero`, `footer`, or an id/class fragment).
    pub anchor: String,
}

impl InsertionAnchor {
    /// Build an anchor from a position and name.
    pub fn new(position: InsertPosition, anchor: impl Into<String>) -> Self {
        Self {
            position,
            anchor: anchor.into(),
        }
    }
}

/// Structured interpretation of one edit instruction.
///
/// Derived once per request and consumed by every downstream stage.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditClassification {
    /// Region the instruction is aimed at.
    pub target_section: TargetSection,
    /// Element kind to affect across sections (multi-target only).
    pub target_type: Option<TargetSection>,
    /// `#id` or `.class` token named in the instruction.
    pub element_selector: Option<String>,
    /// Kind of change.
    pub edit_type: EditType,
    /// Estimated complexity.
    pub complexity: Complexity,
    /// Only visual properties change.
    pub is_style_only: bool,
    /// Image swap that must bypass the generation service.
    pub is_image_only: bool,
    /// Applies to every matching element.
    pub is_multi_target: bool,
    /// Adds a new element to the page.
    pub is_insertion: bool,
    /// Splice point for insertions.
    pub insertion_anchor: Option<InsertionAnchor>,
}

impl EditClassification {
    /// Conservative classification used when classification fails.
    ///
    /// Routes the edit to the full-document prompt.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            target_section: TargetSection::FullPage,
            target_type: None,
            element_selector: None,
            edit_type: EditType::Modification,
            complexity: Complexity::High,
            is_style_only: false,
            is_image_only: false,
            is_multi_target: false,
            is_insertion: false,
            insertion_anchor: None,
        }
    }
}

/// A tag-balanced substring of the document holding one complete element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionContext {
    /// Verbatim element markup.
    pub html: String,
    /// Name of the locator rule that produced it.
    pub locator_strategy: String,
    /// Target kind this section was matched for (multi-target only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetSection>,
}

impl SectionContext {
    /// Build a single-target section.
    pub fn new(html: impl Into<String>, locator_strategy: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            locator_strategy: locator_strategy.into(),
            target_type: None,
        }
    }
}

/// Output of the section locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "sections", rename_all = "kebab-case")]
pub enum LocatedSections {
    /// One section for a single-target edit.
    Single(SectionContext),
    /// Every matching section, in document order.
    Multi(Vec<SectionContext>),
}

/// Merge strategy that located the old section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMethod {
    /// Verbatim occurrence.
    ExactMatch,
    /// Occurrence modulo whitespace runs.
    WhitespaceNormalized,
    /// Same root tag and attributes.
    TagStructure,
    /// Same root `id`.
    IdBased,
    /// Nothing matched.
    Failed,
}

impl MergeMethod {
    /// Wire name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact-match",
            Self::WhitespaceNormalized => "whitespace-normalized",
            Self::TagStructure => "tag-structure",
            Self::IdBased => "id-based",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of re-integrating a generated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    /// Whether a strategy located the old section.
    pub success: bool,
    /// Merged document, or the unchanged input on failure.
    pub html: String,
    /// Strategy that succeeded.
    pub method: MergeMethod,
}

/// Tag statistics for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// `<img>` tags.
    pub images: usize,
    /// `<section>` tags.
    pub sections: usize,
    /// `<script>` tags.
    pub scripts: usize,
    /// Human-readable document size.
    pub size: String,
}

/// Validator outcome for a candidate document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityVerdict {
    /// `true` when there are no hard issues.
    pub valid: bool,
    /// Hard failures; the edit must be rejected.
    pub issues: Vec<String>,
    /// Informational findings.
    pub warnings: Vec<String>,
    /// Statistics of the candidate document.
    pub stats: DocumentStats,
}

/// Which validator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// After single or multi-target section merges and insertions.
    Section,
    /// After full-document edits.
    FullDocument,
}
