#![allow(clippy::doc_markdown)]

//! pageforge-edit - Iterative HTML Document Editing
//!
//! Turns a free-text edit instruction plus the current page into a minimal
//! request for a text-generation service, then merges the service's output
//! back into the page with integrity checks that can reject a bad edit.
//!
//! # Features
//!
//! - **Classification**: ordered keyword tables map an instruction to a target and edit type
//! - **Section Location**: balanced-tag scanning extracts complete elements, never fragments
//! - **Prompt Shapes**: insertion, per-section, lightweight and full-document prompts
//! - **Merge Cascade**: exact, whitespace-normalized, tag-structure and id-based strategies
//! - **Integrity Checks**: reject merges that drop the header, footer, scripts or content
//!
//! # Architecture
//!
//! ```text
//! pageforge-edit/src/
//! ├── lib.rs         # Re-exports (this file)
//! ├── error.rs       # EditError enum (thiserror)
//! ├── types.rs       # Classification, SectionContext, MergeResult, IntegrityVerdict
//! ├── config.rs      # EditEngineConfig, ValidationPolicy
//! ├── sanitize.rs    # Instruction sanitization, code fence stripping
//! ├── markup.rs      # Balanced-tag scanner
//! ├── classify.rs    # RequestClassifier
//! ├── locate.rs      # SectionLocator
//! ├── anchor.rs      # AnchorResolver
//! ├── prompt.rs      # PromptComposer
//! ├── merge.rs       # MergeEngine
//! ├── validate.rs    # IntegrityValidator
//! ├── version.rs     # VersionRecorder, VersionStore port
//! ├── placeholder.rs # {{IMAGE_n:...}} token scanning
//! ├── diff.rs        # Diff preview
//! └── engine.rs      # EditEngine over the MarkupGenerator port
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pageforge_edit::EditEngine;
//!
//! let engine = EditEngine::new(my_generator);
//! match engine.apply(&page, "make the header background blue").await {
//!     Ok(edit) => page = edit.html,
//!     Err(error) => eprintln!("{}", error.reason()),
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod anchor;
mod classify;
mod config;
mod diff;
mod engine;
mod error;
mod locate;
pub mod markup;
mod merge;
mod placeholder;
mod prompt;
mod sanitize;
mod types;
mod validate;
mod version;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use anchor::{AnchorResolver, InsertionPoint};
pub use classify::{DEFAULT_INSERTION_ANCHOR, RequestClassifier};
pub use config::{DEFAULT_FORM_MARKER_ATTRIBUTE, EditEngineConfig, ValidationPolicy};
pub use engine::{AppliedEdit, AppliedVia, EditEngine, MarkupGenerator};
pub use error::EditError;
pub use locate::{SectionLocator, section_contains};
pub use merge::{LocateFn, MergeEngine, STRATEGIES};
pub use placeholder::{ImagePlaceholder, scan_placeholders};
pub use prompt::{IMAGE_PLACEHOLDER_EXAMPLE, PromptComposer, PromptPlan, PromptShape, SectionPrompt};
pub use sanitize::{sanitize_instruction, strip_code_fences};
pub use types::{
    Complexity, DocumentStats, EditClassification, EditType, InsertPosition, InsertionAnchor,
    IntegrityVerdict, LocatedSections, MergeMethod, MergeResult, SectionContext, TargetSection,
    ValidationMode,
};
pub use validate::{FOOTER_LOST_ISSUE, HEADER_LOST_ISSUE, IntegrityValidator};
pub use version::{VersionMetadata, VersionRecorder, VersionStore};

// Diff utilities for previews
pub use diff::{change_counts, generate_unified_diff};
