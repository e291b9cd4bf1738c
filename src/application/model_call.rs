//! Helpers shared by the stages that talk to the model.

use crate::domain::entities::signal::Signal;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::{ChatModel, ChatRequest, ModelReply, ResponseSchema};
use crate::domain::values::quantity_semantics::QuantitySemantics;
use std::time::Duration;

pub const SIGNAL_SCHEMA_NAME: &str = "GeneratedSignal";

pub fn signal_response_schema(semantics: QuantitySemantics) -> ResponseSchema {
    ResponseSchema {
        name: SIGNAL_SCHEMA_NAME.to_string(),
        schema: Signal::json_schema(semantics),
    }
}

/// Run one model call, bounded by `limit`. Expiry is a generation error.
pub async fn call_model(
    model: &dyn ChatModel,
    request: ChatRequest<'_>,
    limit: Duration,
) -> Result<ModelReply, DomainError> {
    match tokio::time::timeout(limit, model.complete(request)).await {
        Ok(reply) => reply,
        Err(_) => Err(DomainError::Generation(format!(
            "{} did not answer within {}s",
            model.name(),
            limit.as_secs_f64()
        ))),
    }
}

/// Turn a structured-mode reply into a validated signal.
pub fn signal_from_reply(
    reply: ModelReply,
    semantics: QuantitySemantics,
) -> Result<Signal, DomainError> {
    match reply {
        ModelReply::Structured(value) => Signal::from_value(value, semantics),
        ModelReply::Text(text) => Err(DomainError::Generation(format!(
            "model answered with free text instead of a signal: {text}"
        ))),
        ModelReply::ToolCalls { calls, .. } => Err(DomainError::Generation(format!(
            "model requested {} tool call(s) instead of producing a signal",
            calls.len()
        ))),
    }
}
