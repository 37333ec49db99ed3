#![allow(missing_docs)]

use std::path::PathBuf;

use pageforge_cli::load_settings_from_paths;
use pageforge_edit::EditEngineConfig;
use tempfile::TempDir;

fn write_file(path: PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write yaml");
}

#[test]
fn merge_user_overrides_system() {
    let tmp = TempDir::new().expect("tempdir");
    let system = tmp.path().join("packages/conf/pageforge.yaml");
    let user = tmp.path().join(".config/pageforge/settings.yaml");

    write_file(
        system.clone(),
        r#"
engine:
  instruction_max_chars: 800
  style_context_chars: 1200
  form_marker_attribute: "data-system-form"
validation:
  max_image_drop: 3
  min_size_ratio: 0.6
"#,
    );
    write_file(
        user.clone(),
        r#"
engine:
  style_context_chars: 900
  form_marker_attribute: "data-user-form"
validation:
  min_size_ratio: 0.8
"#,
    );

    let config = load_settings_from_paths(&system, &user).into_config();
    assert_eq!(config.instruction_max_chars, 800);
    assert_eq!(config.style_context_chars, 900);
    assert_eq!(config.change_description_chars, 100);
    assert_eq!(config.form_marker_attribute, "data-user-form");
    assert_eq!(config.validation.max_image_drop, 3);
    assert_eq!(config.validation.max_section_drop, 1);
    assert!((config.validation.min_size_ratio - 0.8).abs() < f64::EPSILON);
    assert_eq!(config.validation.max_image_drop_warning, 1);
}

#[test]
fn missing_files_yield_defaults() {
    let tmp = TempDir::new().expect("tempdir");
    let config = load_settings_from_paths(
        &tmp.path().join("absent/system.yaml"),
        &tmp.path().join("absent/user.yaml"),
    )
    .into_config();
    assert_eq!(config, EditEngineConfig::default());
}

#[test]
fn malformed_user_file_is_ignored() {
    let tmp = TempDir::new().expect("tempdir");
    let system = tmp.path().join("system.yaml");
    let user = tmp.path().join("user.yaml");
    write_file(system.clone(), "engine:\n  change_description_chars: 60\n");
    write_file(user.clone(), "engine: [not, a, mapping\n");

    let config = load_settings_from_paths(&system, &user).into_config();
    assert_eq!(config.change_description_chars, 60);
}

#[test]
fn empty_file_is_treated_as_unset() {
    let tmp = TempDir::new().expect("tempdir");
    let system = tmp.path().join("system.yaml");
    let user = tmp.path().join("user.yaml");
    write_file(system.clone(), "validation:\n  max_section_drop: 2\n");
    write_file(user.clone(), "");

    let config = load_settings_from_paths(&system, &user).into_config();
    assert_eq!(config.validation.max_section_drop, 2);
}

#[test]
fn shipped_defaults_match_engine_defaults() {
    let system = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../conf/pageforge.yaml");
    let config = load_settings_from_paths(&system, &system.with_file_name("absent.yaml"))
        .into_config();
    assert_eq!(config, EditEngineConfig::default());
}
