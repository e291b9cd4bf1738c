use crate::application::model_call::{call_model, signal_from_reply, signal_response_schema};
use crate::domain::entities::conversation::Conversation;
use crate::domain::entities::signal::Signal;
use crate::domain::entities::tool::ToolSpec;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::{ChatModel, ChatRequest, ResponseSchema};
use crate::domain::values::quantity_semantics::QuantitySemantics;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Asks the model for a structured signal over an enriched conversation.
pub struct SignalGenerator {
    model: Arc<dyn ChatModel>,
    /// Declared tools, sent along so tool turns in the conversation stay valid.
    tools: Vec<ToolSpec>,
    schema: ResponseSchema,
    semantics: QuantitySemantics,
    timeout: Duration,
}

impl SignalGenerator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: Vec<ToolSpec>,
        semantics: QuantitySemantics,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            tools,
            schema: signal_response_schema(semantics),
            semantics,
            timeout,
        }
    }

    pub async fn generate(&self, conversation: &Conversation) -> Result<Signal, DomainError> {
        let request = ChatRequest::new(conversation)
            .with_tools(&self.tools)
            .with_schema(&self.schema);
        let reply = call_model(self.model.as_ref(), request, self.timeout).await?;
        let signal = signal_from_reply(reply, self.semantics)?;
        debug!(%signal, "Raw signal generated");
        Ok(signal)
    }

    /// Draw `n` independent samples concurrently from the same conversation.
    ///
    /// All samples must succeed; the first failure fails the batch and drops
    /// the calls still in flight.
    pub async fn generate_many(
        &self,
        conversation: &Conversation,
        n: usize,
    ) -> Result<Vec<Signal>, DomainError> {
        if n == 0 {
            return Err(DomainError::InvalidInput(
                "parallelism must be at least 1".into(),
            ));
        }
        info!(n, model = self.model.name(), "Generating raw signals");
        try_join_all((0..n).map(|_| self.generate(conversation))).await
    }
}
