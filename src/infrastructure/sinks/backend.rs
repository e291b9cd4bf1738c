use crate::domain::entities::signal::Signal;
use crate::domain::error::DomainError;
use crate::domain::ports::signal_sink::SignalSink;
use crate::domain::values::signal_side::SignalSide;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Persists signals through the backend's `/api/signals` route.
pub struct BackendSignalSink {
    base_url: String,
    client: reqwest::Client,
}

/// Wire shape expected by the backend: camelCase field names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload<'a> {
    pub signal: SignalSide,
    pub symbol: &'a str,
    pub quantity: f64,
    pub confidence_score: f64,
    pub event_id: i64,
    pub motivation: &'a str,
}

impl<'a> From<&'a Signal> for SignalPayload<'a> {
    fn from(s: &'a Signal) -> Self {
        Self {
            signal: s.side(),
            symbol: s.symbol(),
            quantity: s.quantity(),
            confidence_score: s.confidence_score(),
            event_id: s.event_id(),
            motivation: s.motivation(),
        }
    }
}

impl BackendSignalSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn signals_url(&self) -> String {
        format!("{}/api/signals", self.base_url)
    }

    /// Every signal the backend has stored.
    pub async fn list(&self) -> Result<Vec<Value>, DomainError> {
        let resp = self
            .client
            .get(self.signals_url())
            .send()
            .await
            .map_err(|e| DomainError::Sink(format!("Failed to list signals: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Sink(format!("Backend {status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| DomainError::Sink(format!("Parse error: {e}")))
    }
}

#[async_trait]
impl SignalSink for BackendSignalSink {
    fn name(&self) -> &str {
        "backend"
    }

    async fn save(&self, signal: &Signal) -> Result<Value, DomainError> {
        let payload = SignalPayload::from(signal);
        debug!(?payload, "Posting signal");

        let resp = self
            .client
            .post(self.signals_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::Sink(format!("Request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Sink(format!("Backend {status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| DomainError::Sink(format!("Parse error: {e}")))
    }
}
