use crate::application::model_call::{call_model, signal_from_reply, signal_response_schema};
use crate::application::prompts::{AGGREGATOR_QUESTION, AGGREGATOR_SYSTEM_PROMPT};
use crate::domain::entities::conversation::Conversation;
use crate::domain::entities::signal::Signal;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::{ChatModel, ChatRequest, ResponseSchema};
use crate::domain::values::quantity_semantics::QuantitySemantics;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Synthesizes raw signals into one final signal with a single model call.
pub struct SignalAggregator {
    model: Arc<dyn ChatModel>,
    schema: ResponseSchema,
    semantics: QuantitySemantics,
    timeout: Duration,
}

impl SignalAggregator {
    pub fn new(model: Arc<dyn ChatModel>, semantics: QuantitySemantics, timeout: Duration) -> Self {
        Self {
            model,
            schema: signal_response_schema(semantics),
            semantics,
            timeout,
        }
    }

    pub async fn aggregate(&self, raw_signals: &[Signal]) -> Result<Signal, DomainError> {
        if raw_signals.is_empty() {
            return Err(DomainError::InsufficientInput(
                "aggregation needs at least one raw signal".into(),
            ));
        }

        let conversation = synthesis_conversation(raw_signals);
        info!(n = raw_signals.len(), "Aggregating raw signals");

        let request = ChatRequest::new(&conversation).with_schema(&self.schema);
        let reply = call_model(self.model.as_ref(), request, self.timeout).await?;
        let signal = signal_from_reply(reply, self.semantics)?;
        if raw_signals.iter().all(|s| s.event_id() != signal.event_id()) {
            return Err(DomainError::SchemaValidation(format!(
                "final signal cites event {} which no raw signal references",
                signal.event_id()
            )));
        }
        debug!(%signal, "Final signal");
        Ok(signal)
    }
}

/// System instruction plus one user message embedding every raw signal, in
/// the order given.
pub fn synthesis_conversation(raw_signals: &[Signal]) -> Conversation {
    let context = raw_signals
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Raw signal {}: {s}", i + 1))
        .collect::<Vec<_>>()
        .join("; ");
    debug!(%context, "Synthesis context");

    Conversation::with_system(AGGREGATOR_SYSTEM_PROMPT).push_user(format!(
        "{AGGREGATOR_QUESTION} These are the raw signals: {context}."
    ))
}
