use crate::domain::error::DomainError;
use crate::domain::ports::event_source::EventSource;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_EVENTS_FILE: &str = "./events/whale-sell.json";

/// Serves a static JSON event record from disk. The question is ignored:
/// every call returns the whole file.
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, _question: &str) -> Result<Value, DomainError> {
        debug!(path = %self.path.display(), "Reading events file");
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::EventSource(format!("Cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::EventSource(format!("Invalid JSON in {}: {e}", self.path.display()))
        })
    }
}
