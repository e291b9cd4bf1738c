//! Chat conversation passed between pipeline stages.
//!
//! A [`Conversation`] is append-only: stages take it by value, push new
//! messages and hand it on. Concurrent generation calls only ever borrow it.

use crate::domain::entities::tool::ToolCallRequest;
use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    /// Assistant turn asking for tool invocations, with any text it carried.
    ToolCalls {
        text: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
    ToolResult { tool_call_id: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text { text: text.into() },
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text { text: text.into() },
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text { text: text.into() },
        }
    }

    /// Plain text of the message, if it has any.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text } => Some(text),
            MessageContent::ToolCalls { text, .. } => text.as_deref(),
            MessageContent::ToolResult { content, .. } => Some(content),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(system: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::user(text));
        self
    }

    pub fn push_assistant(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(text));
        self
    }

    pub fn push_tool_calls(mut self, text: Option<String>, calls: Vec<ToolCallRequest>) -> Self {
        self.messages.push(Message {
            role: Role::Assistant,
            content: MessageContent::ToolCalls { text, calls },
        });
        self
    }

    /// Append a tool result. The id must belong to an earlier assistant
    /// tool-invocation request.
    pub fn push_tool_result(
        mut self,
        tool_call_id: &str,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if !self.has_tool_call(tool_call_id) {
            return Err(DomainError::InvalidInput(format!(
                "tool result references unknown tool call id {tool_call_id}"
            )));
        }
        self.messages.push(Message {
            role: Role::Tool,
            content: MessageContent::ToolResult {
                tool_call_id: tool_call_id.to_string(),
                content: content.into(),
            },
        });
        Ok(self)
    }

    fn has_tool_call(&self, id: &str) -> bool {
        self.messages.iter().any(|m| match &m.content {
            MessageContent::ToolCalls { calls, .. } => calls.iter().any(|c| c.id == id),
            _ => false,
        })
    }
}
