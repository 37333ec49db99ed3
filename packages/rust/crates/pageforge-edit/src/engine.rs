//! End-to-end edit orchestration.
//!
//! Runs one instruction through classification, prompting, the generation
//! service, merging and validation. Any failure leaves the caller's document
//! untouched: the engine only ever returns a new string on success.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Serialize;

use crate::anchor::AnchorResolver;
use crate::classify::RequestClassifier;
use crate::config::EditEngineConfig;
use crate::diff::{change_counts, generate_unified_diff};
use crate::error::EditError;
use crate::merge::MergeEngine;
use crate::placeholder::{ImagePlaceholder, scan_placeholders};
use crate::prompt::{PromptComposer, PromptPlan, SectionPrompt};
use crate::sanitize::{sanitize_instruction, strip_code_fences};
use crate::types::{
    EditClassification, InsertionAnchor, IntegrityVerdict, MergeMethod, SectionContext,
};
use crate::validate::IntegrityValidator;
use crate::version::{VersionMetadata, VersionRecorder, VersionStore};

/// External text-generation service: prompt in, markup out.
#[async_trait]
pub trait MarkupGenerator: Send + Sync {
    /// Generate markup for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, EditError>;
}

#[async_trait]
impl<T: MarkupGenerator + ?Sized> MarkupGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, EditError> {
        (**self).generate(prompt).await
    }
}

/// How an accepted edit was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AppliedVia {
    /// New element spliced at an anchor.
    Insertion {
        /// Anchor used.
        anchor: InsertionAnchor,
    },
    /// One section merged.
    Section {
        /// Strategy that located the section.
        method: MergeMethod,
    },
    /// Several sections merged in document order.
    MultiSection {
        /// Strategy per section.
        methods: Vec<MergeMethod>,
    },
    /// Whole document replaced.
    FullDocument,
}

/// An accepted edit.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedEdit {
    /// New document.
    pub html: String,
    /// Classification the edit ran under.
    pub classification: EditClassification,
    /// How the edit was applied.
    pub via: AppliedVia,
    /// Non-blocking validator findings.
    pub warnings: Vec<String>,
    /// Audit record handed to the version store.
    pub metadata: VersionMetadata,
    /// Line diff of the document change.
    pub diff: String,
    /// Unresolved image placeholder tokens in the new document.
    pub image_placeholders: Vec<ImagePlaceholder>,
}

/// Iterative document edit engine.
pub struct EditEngine<G> {
    generator: G,
    config: EditEngineConfig,
    store: Option<Arc<dyn VersionStore>>,
}

impl<G: MarkupGenerator> EditEngine<G> {
    /// Engine with default configuration and no version store.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            config: EditEngineConfig::default(),
            store: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EditEngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a store that receives every accepted edit.
    #[must_use]
    pub fn with_version_store(mut self, store: Arc<dyn VersionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EditEngineConfig {
        &self.config
    }

    /// Apply one instruction to a document.
    ///
    /// On `Err` the edit was not applied and `document` remains the current
    /// version; [`EditError::reason`] gives the user-facing explanation.
    pub async fn apply(&self, document: &str, instruction: &str) -> Result<AppliedEdit, EditError> {
        let instruction = sanitize_instruction(instruction, self.config.instruction_max_chars);
        if instruction.is_empty() {
            return Err(EditError::EmptyInstruction);
        }

        let classification = RequestClassifier::classify(&instruction, document);
        let plan = PromptComposer::from_config(&self.config).compose(
            document,
            &instruction,
            &classification,
        )?;
        tracing::info!(
            shape = ?plan.shape(),
            target = %classification.target_section,
            "applying edit"
        );

        let validator = IntegrityValidator::from_config(&self.config);
        let (html, via, warnings) = match plan {
            PromptPlan::Insertion { prompt, anchor } => {
                self.apply_insertion(document, &prompt, anchor, &validator)
                    .await?
            }
            PromptPlan::MultiSection { prompts } => {
                self.apply_multi_section(document, &prompts, &validator)
                    .await?
            }
            PromptPlan::Section { prompt, section } => {
                self.apply_section(document, &prompt, section.as_ref(), &validator)
                    .await?
            }
            PromptPlan::FullDocument { prompt } => {
                self.apply_full_document(document, &prompt, &validator)
                    .await?
            }
        };

        let metadata = VersionRecorder::record(
            &instruction,
            &classification,
            self.config.change_description_chars,
        );
        if let Some(store) = &self.store {
            store.record(&metadata, &html);
        }
        let (inserted, deleted) = change_counts(document, &html);
        tracing::info!(
            via = ?via,
            warnings = warnings.len(),
            inserted,
            deleted,
            "edit accepted"
        );

        Ok(AppliedEdit {
            diff: generate_unified_diff(document, &html, classification.target_section.as_str()),
            image_placeholders: scan_placeholders(&html),
            html,
            classification,
            via,
            warnings,
            metadata,
        })
    }

    async fn apply_insertion(
        &self,
        document: &str,
        prompt: &str,
        anchor: InsertionAnchor,
        validator: &IntegrityValidator,
    ) -> Result<(String, AppliedVia, Vec<String>), EditError> {
        // Resolve the split before spending a generation call on it.
        let point = AnchorResolver::find_insertion_point(document, &anchor.anchor, anchor.position)
            .ok_or_else(|| EditError::AnchorNotFound {
                anchor: anchor.anchor.clone(),
                position: anchor.position,
            })?;
        let markup = self.generate(prompt).await?;
        let html = point.splice(&markup);
        let warnings = accept(validator.validate_section_merge(document, &html))?;
        Ok((html, AppliedVia::Insertion { anchor }, warnings))
    }

    async fn apply_multi_section(
        &self,
        document: &str,
        prompts: &[SectionPrompt],
        validator: &IntegrityValidator,
    ) -> Result<(String, AppliedVia, Vec<String>), EditError> {
        let responses = try_join_all(prompts.iter().map(|p| self.generate(&p.prompt))).await?;

        // Merge strictly in document order against the updated document; each
        // section is matched only past the previous replacement.
        let mut current = document.to_string();
        let mut offset = 0;
        let mut methods = Vec::with_capacity(prompts.len());
        let mut warnings = Vec::new();
        for (section_prompt, response) in prompts.iter().zip(responses) {
            let (html, method, end) =
                merge_section(&current, offset, &section_prompt.section, &response)?;
            warnings.extend(accept(validator.validate_section_merge(&current, &html))?);
            current = html;
            offset = end;
            methods.push(method);
        }
        Ok((current, AppliedVia::MultiSection { methods }, warnings))
    }

    async fn apply_section(
        &self,
        document: &str,
        prompt: &str,
        section: Option<&SectionContext>,
        validator: &IntegrityValidator,
    ) -> Result<(String, AppliedVia, Vec<String>), EditError> {
        let response = self.generate(prompt).await?;
        let Some(section) = section else {
            // Whole document was sent, so the response is a whole document.
            let warnings = accept(validator.validate_edited_html(document, &response))?;
            return Ok((response, AppliedVia::FullDocument, warnings));
        };
        let (html, method, _) = merge_section(document, 0, section, &response)?;
        let warnings = accept(validator.validate_section_merge(document, &html))?;
        Ok((html, AppliedVia::Section { method }, warnings))
    }

    async fn apply_full_document(
        &self,
        document: &str,
        prompt: &str,
        validator: &IntegrityValidator,
    ) -> Result<(String, AppliedVia, Vec<String>), EditError> {
        let response = self.generate(prompt).await?;
        let warnings = accept(validator.validate_edited_html(document, &response))?;
        Ok((response, AppliedVia::FullDocument, warnings))
    }

    async fn generate(&self, prompt: &str) -> Result<String, EditError> {
        let raw = self.generator.generate(prompt).await?;
        let markup = strip_code_fences(&raw);
        if markup.is_empty() {
            return Err(EditError::EmptyResponse);
        }
        Ok(markup)
    }
}

fn merge_section(
    document: &str,
    from: usize,
    section: &SectionContext,
    response: &str,
) -> Result<(String, MergeMethod, usize), EditError> {
    let (result, end) = MergeEngine::merge_from(document, from, &section.html, response);
    if !result.success {
        return Err(EditError::MergeFailed);
    }
    Ok((result.html, result.method, end))
}

fn accept(verdict: IntegrityVerdict) -> Result<Vec<String>, EditError> {
    if verdict.valid {
        Ok(verdict.warnings)
    } else {
        Err(EditError::IntegrityRejected {
            issues: verdict.issues,
        })
    }
}
