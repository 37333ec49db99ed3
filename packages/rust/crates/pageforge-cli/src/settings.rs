//! Settings loader for the pageforge CLI.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/pageforge.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/pageforge/settings.yaml`
//!
//! Merge precedence is user over system, field by field.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pageforge_edit::{EditEngineConfig, ValidationPolicy};
use serde::Deserialize;

const SYSTEM_SETTINGS: &str = "packages/conf/pageforge.yaml";
const USER_SETTINGS: &str = "pageforge/settings.yaml";
const DEFAULT_CONFIG_HOME: &str = ".config";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Raw settings file contents. Absent fields fall through to the next layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageforgeSettings {
    /// Engine limits and markers.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Integrity thresholds.
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// `engine:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Sanitized instruction bound.
    pub instruction_max_chars: Option<usize>,
    /// Insertion style-context budget.
    pub style_context_chars: Option<usize>,
    /// Version metadata description bound.
    pub change_description_chars: Option<usize>,
    /// Form-submission marker attribute.
    pub form_marker_attribute: Option<String>,
}

/// `validation:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationSettings {
    /// Allowed image-count drop after a section merge.
    pub max_image_drop: Option<usize>,
    /// Allowed section-count drop after a section merge.
    pub max_section_drop: Option<usize>,
    /// Minimum merged/original length ratio.
    pub min_size_ratio: Option<f64>,
    /// Image-count drop that triggers a full-document warning.
    pub max_image_drop_warning: Option<usize>,
}

impl PageforgeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            engine: self.engine.merge(overlay.engine),
            validation: self.validation.merge(overlay.validation),
        }
    }

    /// Resolve into an engine config; unset fields keep their defaults.
    #[must_use]
    pub fn into_config(self) -> EditEngineConfig {
        let defaults = EditEngineConfig::default();
        let policy = ValidationPolicy::default();
        EditEngineConfig {
            instruction_max_chars: self
                .engine
                .instruction_max_chars
                .unwrap_or(defaults.instruction_max_chars),
            style_context_chars: self
                .engine
                .style_context_chars
                .unwrap_or(defaults.style_context_chars),
            change_description_chars: self
                .engine
                .change_description_chars
                .unwrap_or(defaults.change_description_chars),
            form_marker_attribute: self
                .engine
                .form_marker_attribute
                .unwrap_or(defaults.form_marker_attribute),
            validation: ValidationPolicy {
                max_image_drop: self.validation.max_image_drop.unwrap_or(policy.max_image_drop),
                max_section_drop: self
                    .validation
                    .max_section_drop
                    .unwrap_or(policy.max_section_drop),
                min_size_ratio: self.validation.min_size_ratio.unwrap_or(policy.min_size_ratio),
                max_image_drop_warning: self
                    .validation
                    .max_image_drop_warning
                    .unwrap_or(policy.max_image_drop_warning),
            },
        }
    }
}

impl EngineSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            instruction_max_chars: overlay.instruction_max_chars.or(self.instruction_max_chars),
            style_context_chars: overlay.style_context_chars.or(self.style_context_chars),
            change_description_chars: overlay
                .change_description_chars
                .or(self.change_description_chars),
            form_marker_attribute: overlay.form_marker_attribute.or(self.form_marker_attribute),
        }
    }
}

impl ValidationSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            max_image_drop: overlay.max_image_drop.or(self.max_image_drop),
            max_section_drop: overlay.max_section_drop.or(self.max_section_drop),
            min_size_ratio: overlay.min_size_ratio.or(self.min_size_ratio),
            max_image_drop_warning: overlay
                .max_image_drop_warning
                .or(self.max_image_drop_warning),
        }
    }
}

/// Load merged settings from the default locations.
#[must_use]
pub fn load_settings() -> PageforgeSettings {
    let (system_path, user_path) = settings_paths();
    load_settings_from_paths(&system_path, &user_path)
}

/// System and user settings paths.
///
/// The project root is `PRJ_ROOT` or the working directory. The config home
/// is the `--conf` override, then `PRJ_CONFIG_HOME`, then `.config`; relative
/// values resolve against the project root.
#[must_use]
pub fn settings_paths() -> (PathBuf, PathBuf) {
    let root = env_path("PRJ_ROOT")
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let config_home = CONFIG_HOME_OVERRIDE
        .get()
        .cloned()
        .or_else(|| env_path("PRJ_CONFIG_HOME"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_HOME));
    settings_paths_under(&root, &config_home)
}

/// Point the user settings lookup at another config home (CLI `--conf`).
///
/// Only the first non-empty value takes effect.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if let Err(ignored) = CONFIG_HOME_OVERRIDE.set(path) {
        tracing::warn!(ignored = %ignored.display(), "config home already overridden");
    }
}

/// Load and merge two explicit settings files, `user` over `system`.
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> PageforgeSettings {
    load_one(system).merge(load_one(user))
}

fn settings_paths_under(root: &Path, config_home: &Path) -> (PathBuf, PathBuf) {
    // `join` keeps an absolute config home as is.
    (
        root.join(SYSTEM_SETTINGS),
        root.join(config_home).join(USER_SETTINGS),
    )
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// A missing file is an unset layer. Unreadable or malformed files are logged
/// and skipped.
fn load_one(path: &Path) -> PageforgeSettings {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return PageforgeSettings::default(),
        Err(error) => return skip_layer(path, &error),
    };
    serde_yaml::from_str::<Option<PageforgeSettings>>(&raw)
        .map_or_else(|error| skip_layer(path, &error), Option::unwrap_or_default)
}

fn skip_layer(path: &Path, error: &dyn std::fmt::Display) -> PageforgeSettings {
    tracing::warn!(path = %path.display(), error = %error, "ignoring pageforge settings layer");
    PageforgeSettings::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_under_project_root() {
        let root = Path::new("/srv/site");
        let (system, user) = settings_paths_under(root, Path::new(".config"));
        assert_eq!(system, PathBuf::from("/srv/site/packages/conf/pageforge.yaml"));
        assert_eq!(user, PathBuf::from("/srv/site/.config/pageforge/settings.yaml"));

        let (_, user) = settings_paths_under(root, Path::new("/etc/xdg"));
        assert_eq!(user, PathBuf::from("/etc/xdg/pageforge/settings.yaml"));
    }

    #[test]
    fn test_empty_settings_resolve_to_defaults() {
        assert_eq!(
            PageforgeSettings::default().into_config(),
            EditEngineConfig::default()
        );
    }
}
