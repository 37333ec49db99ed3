//! JSON Lines version history.
//!
//! One line per accepted edit: the version metadata plus the full document.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use pageforge_edit::{VersionMetadata, VersionStore};
use serde::Serialize;

#[derive(Serialize)]
struct HistoryLine<'a> {
    #[serde(flatten)]
    metadata: &'a VersionMetadata,
    document: &'a str,
}

/// Append-only history file.
#[derive(Debug, Clone)]
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    /// History stored at `path`; parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the history is appended to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, metadata: &VersionMetadata, document: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(&HistoryLine { metadata, document })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl VersionStore for JsonlHistory {
    fn record(&self, metadata: &VersionMetadata, document: &str) {
        match self.append(metadata, document) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "version recorded"),
            // Accepted edits stand even when the audit line is lost.
            Err(error) => tracing::warn!(
                path = %self.path.display(),
                error = %error,
                "failed to append version history"
            ),
        }
    }
}
