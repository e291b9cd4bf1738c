use crate::domain::entities::tool::ToolSpec;
use crate::domain::ports::event_source::EventSource;
use crate::domain::ports::tool_handler::ToolHandler;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub const RETRIEVE_EVENTS: &str = "retrieve_events";

/// Tool that lets the model pull market events from the configured source.
pub struct RetrieveEventsTool {
    source: Arc<dyn EventSource>,
}

impl RetrieveEventsTool {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self { source }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            RETRIEVE_EVENTS,
            "Retrieve the latest market events from the knowledge base to generate a trading signal.",
            json!({
                "type": "object",
                "properties": {
                    "question": { "type": "string" }
                },
                "required": ["question"],
                "additionalProperties": false
            }),
        )
    }
}

#[async_trait]
impl ToolHandler for RetrieveEventsTool {
    async fn call(&self, args: Value) -> Result<Value, String> {
        let question = args["question"]
            .as_str()
            .ok_or_else(|| "retrieve_events needs a string 'question' argument".to_string())?;
        self.source
            .fetch(question)
            .await
            .map_err(|e| format!("Failed to fetch events from {}: {e}", self.source.name()))
    }
}
