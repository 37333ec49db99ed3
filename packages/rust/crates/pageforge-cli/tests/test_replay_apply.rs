#![allow(missing_docs)]

use std::sync::Arc;

use pageforge_cli::{JsonlHistory, ReplayGenerator};
use pageforge_edit::{AppliedVia, EditEngine, EditError, MergeMethod};
use tempfile::TempDir;

const DOC: &str = r#"<header>H</header><section class="hero">Hi</section><footer>F</footer>"#;

#[tokio::test]
async fn replayed_edit_is_recorded_in_history() {
    let tmp = TempDir::new().expect("tempdir");
    let history_path = tmp.path().join("history/edits.jsonl");
    let history = Arc::new(JsonlHistory::new(&history_path));

    let generator = ReplayGenerator::new([
        "```html\n<header style=\"background:blue\">H</header>\n```".to_string(),
    ]);
    let engine = EditEngine::new(generator).with_version_store(history);

    let edit = engine
        .apply(DOC, "make the header background blue")
        .await
        .expect("edit applied");
    assert_eq!(
        edit.via,
        AppliedVia::Section {
            method: MergeMethod::ExactMatch
        }
    );

    let raw = std::fs::read_to_string(&history_path).expect("history written");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(lines[0]).expect("json line");
    assert_eq!(entry["changeDescription"], "make the header background blue");
    assert_eq!(entry["targetSection"], "header");
    assert_eq!(entry["editType"], "modification");
    assert_eq!(entry["document"], edit.html);
    assert!(entry["timestamp"].is_string());
}

#[tokio::test]
async fn rejected_edit_leaves_history_untouched() {
    let tmp = TempDir::new().expect("tempdir");
    let history_path = tmp.path().join("edits.jsonl");

    let generator = ReplayGenerator::new([r#"<div class="footer">F</div>"#.to_string()]);
    let engine =
        EditEngine::new(generator).with_version_store(Arc::new(JsonlHistory::new(&history_path)));

    let error = engine
        .apply(DOC, "make the footer darker")
        .await
        .expect_err("footer loss rejected");
    assert!(matches!(error, EditError::IntegrityRejected { .. }));
    assert!(!history_path.exists());
}

#[tokio::test]
async fn exhausted_replay_is_a_generation_error() {
    let engine = EditEngine::new(ReplayGenerator::default());
    let error = engine
        .apply(DOC, "make the header background blue")
        .await
        .expect_err("nothing to replay");
    assert!(matches!(error, EditError::Generation(_)));
}

#[test]
fn missing_response_file_is_reported() {
    let tmp = TempDir::new().expect("tempdir");
    let error = ReplayGenerator::from_files(&[tmp.path().join("missing.html")])
        .expect_err("missing file");
    assert!(error.to_string().contains("missing.html"));
}
