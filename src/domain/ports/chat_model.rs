//! Chat model port: the one black box the pipeline is built around.
//!
//! A single [`ChatModel::complete`] call covers the three modes the pipeline
//! uses: free text, tool selection (when tools are declared) and strict
//! structured output (when a [`ResponseSchema`] is given).

use crate::domain::entities::conversation::Conversation;
use crate::domain::entities::tool::{ToolCallRequest, ToolSpec};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use serde_json::Value;

/// Required output shape for structured completions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

/// One model invocation.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub conversation: &'a Conversation,
    pub tools: &'a [ToolSpec],
    pub response_schema: Option<&'a ResponseSchema>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(conversation: &'a Conversation) -> Self {
        Self {
            conversation,
            tools: &[],
            response_schema: None,
        }
    }

    pub fn with_tools(mut self, tools: &'a [ToolSpec]) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_schema(mut self, schema: &'a ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// What the model answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    ToolCalls {
        text: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
    /// Parsed JSON matching the requested schema (not yet domain-validated).
    Structured(Value),
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logging.
    fn name(&self) -> &str;

    /// Transport, auth and refusal failures are `DomainError::Generation`.
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ModelReply, DomainError>;
}
