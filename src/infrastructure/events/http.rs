use crate::domain::error::DomainError;
use crate::domain::ports::event_source::EventSource;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Recent token prices from the backend (last 24h window).
pub struct HttpEventSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEventSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .user_agent("signalchain/0.1")
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/token-prices/last24h", self.base_url)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, _question: &str) -> Result<Value, DomainError> {
        let url = self.endpoint();
        debug!(%url, "Fetching token prices");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::EventSource(format!("Failed to fetch token prices: {e}")))?;

        if !resp.status().is_success() {
            return Err(DomainError::EventSource(format!(
                "Failed to fetch token prices: backend returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| DomainError::EventSource(format!("Failed to parse token prices: {e}")))
    }
}
