//! Prompt composition.
//!
//! Selects exactly one prompt shape per request, in priority order:
//! insertion, multi-target per section, lightweight single section, full
//! document. Every shape carries the same preservation rules.

use serde::Serialize;

use crate::config::EditEngineConfig;
use crate::error::EditError;
use crate::locate::SectionLocator;
use crate::markup::{SECTIONING_TAGS, find_element, top_level_elements};
use crate::sanitize::truncate_chars;
use crate::types::{
    Complexity, EditClassification, InsertionAnchor, LocatedSections, SectionContext,
    TargetSection,
};

/// Example placeholder token shown to the service.
pub const IMAGE_PLACEHOLDER_EXAMPLE: &str = "{{IMAGE_1:short description of the image}}";

const NO_STYLE_CONTEXT: &str = "(the page has no existing sections yet)";

/// Which of the four prompt shapes was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptShape {
    /// New element only, with a style-context snippet.
    Insertion,
    /// One prompt per matching section.
    MultiSection,
    /// One located section (or the whole document if none was located).
    Section,
    /// Whole document in, whole document out.
    FullDocument,
}

/// A per-section prompt for multi-target edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPrompt {
    /// Section the prompt edits.
    pub section: SectionContext,
    /// Prompt text.
    pub prompt: String,
}

/// Composed request(s) for the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum PromptPlan {
    /// Return only the new element.
    Insertion {
        /// Prompt text.
        prompt: String,
        /// Where the returned element will be spliced.
        anchor: InsertionAnchor,
    },
    /// Apply the change inside each section, one call per section.
    MultiSection {
        /// Prompts in document order.
        prompts: Vec<SectionPrompt>,
    },
    /// Edit one section.
    Section {
        /// Prompt text.
        prompt: String,
        /// Section sent; `None` means the whole document was sent.
        section: Option<SectionContext>,
    },
    /// Edit the whole document.
    FullDocument {
        /// Prompt text.
        prompt: String,
    },
}

impl PromptPlan {
    /// Selected shape.
    #[must_use]
    pub fn shape(&self) -> PromptShape {
        match self {
            Self::Insertion { .. } => PromptShape::Insertion,
            Self::MultiSection { .. } => PromptShape::MultiSection,
            Self::Section { .. } => PromptShape::Section,
            Self::FullDocument { .. } => PromptShape::FullDocument,
        }
    }

    /// Prompt texts in dispatch order.
    #[must_use]
    pub fn prompts(&self) -> Vec<&str> {
        match self {
            Self::Insertion { prompt, .. }
            | Self::Section { prompt, .. }
            | Self::FullDocument { prompt } => vec![prompt.as_str()],
            Self::MultiSection { prompts } => prompts.iter().map(|p| p.prompt.as_str()).collect(),
        }
    }
}

/// Builds generation-service prompts.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    style_context_chars: usize,
    form_marker_attribute: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::from_config(&EditEngineConfig::default())
    }
}

impl PromptComposer {
    /// Composer using the config's budgets and form marker.
    #[must_use]
    pub fn from_config(config: &EditEngineConfig) -> Self {
        Self {
            style_context_chars: config.style_context_chars,
            form_marker_attribute: config.form_marker_attribute.clone(),
        }
    }

    /// Compose the prompt plan for an instruction.
    ///
    /// Image edits are refused: they belong to the manual image replacement
    /// flow and must never reach the generation service.
    pub fn compose(
        &self,
        document: &str,
        instruction: &str,
        classification: &EditClassification,
    ) -> Result<PromptPlan, EditError> {
        if classification.is_image_only || classification.target_section == TargetSection::Image {
            return Err(EditError::ImageEditRedirected);
        }

        if classification.is_insertion
            && let Some(anchor) = &classification.insertion_anchor
        {
            return Ok(PromptPlan::Insertion {
                prompt: self.insertion_prompt(document, instruction),
                anchor: anchor.clone(),
            });
        }

        if classification.is_multi_target
            && let Some(LocatedSections::Multi(sections)) =
                SectionLocator::locate(document, classification)
        {
            let prompts = sections
                .into_iter()
                .map(|section| SectionPrompt {
                    prompt: self.multi_section_prompt(&section, instruction),
                    section,
                })
                .collect();
            return Ok(PromptPlan::MultiSection { prompts });
        }

        if classification.is_style_only || classification.complexity == Complexity::Low {
            let section = SectionLocator::locate_single(document, classification);
            let prompt = self.section_prompt(document, section.as_ref(), instruction);
            return Ok(PromptPlan::Section { prompt, section });
        }

        Ok(PromptPlan::FullDocument {
            prompt: self.full_document_prompt(document, instruction),
        })
    }

    /// Last top-level section before the footer, truncated to the budget.
    #[must_use]
    pub fn style_context(&self, document: &str) -> String {
        let footer_start = find_element(document, "footer").map_or(document.len(), |s| s.start);
        top_level_elements(document, SECTIONING_TAGS)
            .into_iter()
            .rev()
            .find(|span| span.end <= footer_start)
            .map_or_else(
                || NO_STYLE_CONTEXT.to_string(),
                |span| truncate_chars(&document[span], self.style_context_chars),
            )
    }

    fn insertion_prompt(&self, document: &str, instruction: &str) -> String {
        format!(
            "You are adding ONE new element to an existing web page.\n\n\
             STYLE REFERENCE (an existing section; match its classes, spacing and tone):\n\
             {context}\n\n\
             REQUEST: {instruction}\n\n\
             Return ONLY the markup of the new element. Do not repeat any existing part of the page.\n\
             For every image, write a placeholder token such as {example} instead of a URL, \
             numbering images from 1.\n\n\
             {rules}",
            context = self.style_context(document),
            example = IMAGE_PLACEHOLDER_EXAMPLE,
            rules = self.shared_rules(),
        )
    }

    fn multi_section_prompt(&self, section: &SectionContext, instruction: &str) -> String {
        let target = section
            .target_type
            .map_or("matching", TargetSection::as_str);
        format!(
            "Apply the request below to ALL {target} elements inside this one section, and only inside it.\n\n\
             REQUEST: {instruction}\n\n\
             SECTION:\n{html}\n\n\
             Return the complete updated section. Everything not covered by the request stays verbatim.\n\n\
             {rules}",
            html = section.html,
            rules = self.shared_rules(),
        )
    }

    fn section_prompt(
        &self,
        document: &str,
        section: Option<&SectionContext>,
        instruction: &str,
    ) -> String {
        let (scope, html) = match section {
            Some(section) => ("section", section.html.as_str()),
            None => ("document", document),
        };
        format!(
            "Edit the HTML {scope} below.\n\n\
             REQUEST: {instruction}\n\n\
             HTML:\n{html}\n\n\
             Return the complete updated {scope}. Add or remove nothing beyond the request.\n\n\
             {rules}",
            rules = self.shared_rules(),
        )
    }

    fn full_document_prompt(&self, document: &str, instruction: &str) -> String {
        format!(
            "Edit the complete HTML document below.\n\n\
             REQUEST: {instruction}\n\n\
             DOCUMENT:\n{document}\n\n\
             Return the complete updated document, from <!DOCTYPE html> to </html>.\n\n\
             {rules}",
            rules = self.shared_rules(),
        )
    }

    fn shared_rules(&self) -> String {
        format!(
            "RULES:\n\
             1. Make ONLY the requested change.\n\
             2. Never alter unrelated content, structure or text.\n\
             3. Never change image references: keep every src and srcset exactly as they are.\n\
             4. Preserve all attributes, including every {marker} attribute on forms.\n\
             5. Return raw HTML only: no explanations, no markdown, no code fences.",
            marker = self.form_marker_attribute,
        )
    }
}
