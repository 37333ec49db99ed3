//! Offline generation service.
//!
//! Serves recorded responses instead of calling a live service, so a full
//! edit can be replayed and audited from files.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use pageforge_edit::{EditError, MarkupGenerator};

/// Replays recorded responses in dispatch order.
///
/// Multi-section edits dispatch one prompt per section in document order, so
/// responses must be supplied in that order.
#[derive(Debug, Default)]
pub struct ReplayGenerator {
    responses: Mutex<VecDeque<String>>,
}

impl ReplayGenerator {
    /// Replay the given responses.
    pub fn new(responses: impl IntoIterator<Item = String>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Replay the contents of the given files, in order.
    pub fn from_files(paths: &[PathBuf]) -> anyhow::Result<Self> {
        let responses = paths
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read response file {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(responses))
    }

    /// Responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().map_or(0, |queue| queue.len())
    }
}

#[async_trait]
impl MarkupGenerator for ReplayGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, EditError> {
        let next = self
            .responses
            .lock()
            .map_err(|_| EditError::Generation("replay queue lock poisoned".to_string()))?
            .pop_front();
        tracing::debug!(
            prompt_chars = prompt.chars().count(),
            found = next.is_some(),
            "replaying recorded response"
        );
        next.ok_or_else(|| EditError::Generation("no recorded response left to replay".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_errors() {
        let generator = ReplayGenerator::new(["a".to_string(), "b".to_string()]);
        assert_eq!(generator.generate("p1").await, Ok("a".to_string()));
        assert_eq!(generator.remaining(), 1);
        assert_eq!(generator.generate("p2").await, Ok("b".to_string()));
        assert!(matches!(
            generator.generate("p3").await,
            Err(EditError::Generation(_))
        ));
    }
}
