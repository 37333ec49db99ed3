//! Subcommand runners. Every runner prints one JSON report on stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use pageforge_edit::{
    AnchorResolver, AppliedEdit, EditEngine, EditEngineConfig, EditError, InsertPosition,
    IntegrityValidator, MergeEngine, PromptComposer, RequestClassifier, SectionLocator, ValidationMode,
    sanitize_instruction,
};
use pageforge_cli::{JsonlHistory, ReplayGenerator};
use serde::Serialize;
use serde_json::json;

pub(crate) struct ApplyRequest {
    pub(crate) document: PathBuf,
    pub(crate) instruction: String,
    pub(crate) responses: Vec<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) history: Option<PathBuf>,
}

pub(crate) fn run_classify(
    document: &Path,
    instruction: &str,
    config: &EditEngineConfig,
) -> anyhow::Result<()> {
    let html = read_document(document)?;
    let instruction = sanitize_instruction(instruction, config.instruction_max_chars);
    print_json(&RequestClassifier::classify(&instruction, &html))
}

pub(crate) fn run_locate(
    document: &Path,
    instruction: &str,
    config: &EditEngineConfig,
) -> anyhow::Result<()> {
    let html = read_document(document)?;
    let instruction = sanitize_instruction(instruction, config.instruction_max_chars);
    let classification = RequestClassifier::classify(&instruction, &html);
    print_json(&json!({
        "classification": classification,
        "located": SectionLocator::locate(&html, &classification),
    }))
}

pub(crate) fn run_prompt(
    document: &Path,
    instruction: &str,
    config: &EditEngineConfig,
) -> anyhow::Result<()> {
    let html = read_document(document)?;
    let instruction = sanitize_instruction(instruction, config.instruction_max_chars);
    let classification = RequestClassifier::classify(&instruction, &html);
    match PromptComposer::from_config(config).compose(&html, &instruction, &classification) {
        Ok(plan) => print_json(&plan),
        Err(error) => rejected(&error),
    }
}

pub(crate) fn run_anchor(
    document: &Path,
    anchor: &str,
    position: InsertPosition,
) -> anyhow::Result<()> {
    let html = read_document(document)?;
    let offset = AnchorResolver::find_insertion_point(&html, anchor, position)
        .map(|point| point.before.len());
    print_json(&json!({
        "anchor": anchor,
        "position": position,
        "found": offset.is_some(),
        "offset": offset,
    }))
}

pub(crate) fn run_merge(
    document: &Path,
    old: &Path,
    new: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let html = read_document(document)?;
    let old_section = read_document(old)?;
    let new_section = read_document(new)?;
    let result = MergeEngine::merge(&html, &old_section, &new_section);
    if let Some(output) = output
        && result.success
    {
        write_document(output, &result.html)?;
        return print_json(&json!({ "success": true, "method": result.method, "output": output }));
    }
    print_json(&result)
}

pub(crate) fn run_validate(
    original: &Path,
    candidate: &Path,
    mode: ValidationMode,
    config: &EditEngineConfig,
) -> anyhow::Result<()> {
    let original = read_document(original)?;
    let candidate = read_document(candidate)?;
    let verdict = IntegrityValidator::from_config(config).validate(&original, &candidate, mode);
    print_json(&verdict)?;
    if !verdict.valid {
        anyhow::bail!("integrity check failed with {} issue(s)", verdict.issues.len());
    }
    Ok(())
}

pub(crate) async fn run_apply(request: ApplyRequest, config: EditEngineConfig) -> anyhow::Result<()> {
    let html = read_document(&request.document)?;
    let generator = ReplayGenerator::from_files(&request.responses)?;
    let mut engine = EditEngine::new(generator).with_config(config);
    if let Some(path) = &request.history {
        engine = engine.with_version_store(Arc::new(JsonlHistory::new(path)));
    }

    match engine.apply(&html, &request.instruction).await {
        Ok(edit) => report_applied(&edit, request.output.as_deref()),
        Err(error) => rejected(&error),
    }
}

fn report_applied(edit: &AppliedEdit, output: Option<&Path>) -> anyhow::Result<()> {
    let Some(output) = output else {
        return print_json(&json!({ "applied": true, "edit": edit }));
    };
    write_document(output, &edit.html)?;
    print_json(&json!({
        "applied": true,
        "output": output,
        "via": edit.via,
        "warnings": edit.warnings,
        "metadata": edit.metadata,
        "imagePlaceholders": edit.image_placeholders,
        "diff": edit.diff,
    }))
}

fn rejected(error: &EditError) -> anyhow::Result<()> {
    print_json(&json!({ "applied": false, "reason": error.reason() }))?;
    Err(anyhow::anyhow!(error.reason()))
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_document(path: &Path, html: &str) -> anyhow::Result<()> {
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}
