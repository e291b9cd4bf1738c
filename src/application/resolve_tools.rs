use crate::application::model_call::call_model;
use crate::application::tool_registry::ToolRegistry;
use crate::domain::entities::conversation::Conversation;
use crate::domain::entities::tool::ToolCallRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::{ChatModel, ChatRequest, ModelReply};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lets the model pick tools, runs them and feeds the results back.
pub struct ToolResolver {
    model: Arc<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolResolver {
    pub fn new(model: Arc<dyn ChatModel>, registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self {
            model,
            registry,
            timeout,
        }
    }

    /// Returns the conversation unchanged when the model asks for no tool.
    /// Otherwise appends the assistant's tool-call turn followed by one
    /// correlated result per call, in request order.
    pub async fn resolve(&self, conversation: Conversation) -> Result<Conversation, DomainError> {
        let request = ChatRequest::new(&conversation).with_tools(self.registry.declared());
        let reply = call_model(self.model.as_ref(), request, self.timeout).await?;

        let (text, calls) = match reply {
            ModelReply::ToolCalls { text, calls } if !calls.is_empty() => (text, calls),
            _ => {
                info!("Model requested no tool, continuing without enrichment");
                return Ok(conversation);
            }
        };

        // Fail on an unknown name before anything is executed.
        for call in &calls {
            self.registry.lookup(&call.name)?;
        }

        info!(count = calls.len(), "Resolving tool calls");
        let mut conversation = conversation.push_tool_calls(text, calls.clone());
        for call in &calls {
            let payload = self.dispatch(call).await?;
            conversation = conversation.push_tool_result(&call.id, payload.to_string())?;
        }
        Ok(conversation)
    }

    async fn dispatch(&self, call: &ToolCallRequest) -> Result<Value, DomainError> {
        let (spec, handler) = self.registry.lookup(&call.name)?;

        let args: Value = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, "Unparseable tool arguments: {e}");
                return Ok(json!({ "error": format!("Invalid arguments for {}: {e}", call.name) }));
            }
        };
        if let Err(e) = spec.validate_arguments(&args) {
            warn!(tool = %call.name, "Tool arguments rejected: {e}");
            return Ok(json!({ "error": format!("Invalid arguments for {}: {e}", call.name) }));
        }

        debug!(tool = %call.name, id = %call.id, %args, "Calling tool");
        Ok(match handler.call(args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %call.name, "Tool failed, passing error to the model: {e}");
                json!({ "error": e })
            }
        })
    }
}
