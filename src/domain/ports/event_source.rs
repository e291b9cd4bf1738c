use crate::domain::error::DomainError;
use async_trait::async_trait;
use serde_json::Value;

/// Supplies market events to the retrieval tool.
///
/// File-backed and HTTP-backed implementations are interchangeable; the
/// payload schema belongs to the source, the pipeline treats it as opaque.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Name of this source (e.g., "file", "http")
    fn name(&self) -> &str;

    async fn fetch(&self, question: &str) -> Result<Value, DomainError>;
}
