use crate::domain::entities::signal::Signal;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Report of a persistence attempt. Failures are reported here, they never
/// invalidate the signal that was saved.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SaveOutcome {
    pub fn saved(data: Value) -> Self {
        Self {
            success: true,
            message: "Trading signal saved successfully".into(),
            data: Some(data),
        }
    }

    pub fn failed(err: &DomainError) -> Self {
        Self {
            success: false,
            message: format!("Failed to save trading signal: {err}"),
            data: None,
        }
    }
}

/// Remote store for final signals.
#[async_trait]
pub trait SignalSink: Send + Sync {
    fn name(&self) -> &str;

    /// Persist a signal, returning whatever the store echoes back.
    /// Failures are `DomainError::Sink`.
    async fn save(&self, signal: &Signal) -> Result<Value, DomainError>;
}
