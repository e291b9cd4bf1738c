use crate::domain::entities::conversation::{Message, MessageContent, Role};
use crate::domain::entities::tool::{ToolCallRequest, ToolSpec};
use crate::domain::error::DomainError;
use crate::domain::ports::chat_model::{ChatModel, ChatRequest, ModelReply, ResponseSchema};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Chat-completions client with function calling and strict structured output.
pub struct OpenAiChatModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: Role,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
    strict: bool,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

fn function_kind() -> String {
    "function".into()
}

impl OpenAiChatModel {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest<'_>) -> Result<ModelReply, DomainError> {
        let body = build_request(&self.model, &request);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Generation(format!("OpenAI API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Generation(format!("OpenAI API {status}: {body}")));
        }

        let result: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Generation(format!("Parse error: {e}")))?;
        parse_reply(result, request.response_schema.is_some())
    }
}

fn build_request<'a>(model: &'a str, request: &ChatRequest<'a>) -> CompletionRequest<'a> {
    let tools: Vec<WireTool<'a>> = request.tools.iter().map(wire_tool).collect();
    let structured = request.response_schema.is_some();

    CompletionRequest {
        model,
        messages: request.conversation.messages().iter().map(wire_message).collect(),
        // Tools only ride along for context when a structured answer is due.
        tool_choice: (structured && !tools.is_empty()).then_some("none"),
        tools,
        response_format: request.response_schema.map(response_format),
    }
}

fn wire_tool(spec: &ToolSpec) -> WireTool<'_> {
    WireTool {
        kind: "function",
        function: WireFunction {
            name: &spec.name,
            description: &spec.description,
            parameters: &spec.parameters,
            strict: spec.strict,
        },
    }
}

fn response_format(schema: &ResponseSchema) -> ResponseFormat<'_> {
    ResponseFormat {
        kind: "json_schema",
        json_schema: JsonSchemaFormat {
            name: &schema.name,
            schema: &schema.schema,
            strict: true,
        },
    }
}

fn wire_message(message: &Message) -> WireMessage {
    match &message.content {
        MessageContent::Text { text } => WireMessage {
            role: message.role,
            content: Some(text.clone()),
            tool_calls: None,
            tool_call_id: None,
        },
        MessageContent::ToolCalls { text, calls } => WireMessage {
            role: message.role,
            content: text.clone(),
            tool_calls: Some(
                calls
                    .iter()
                    .map(|c| WireToolCall {
                        id: c.id.clone(),
                        kind: function_kind(),
                        function: WireFunctionCall {
                            name: c.name.clone(),
                            arguments: c.arguments.clone(),
                        },
                    })
                    .collect(),
            ),
            tool_call_id: None,
        },
        MessageContent::ToolResult {
            tool_call_id,
            content,
        } => WireMessage {
            role: message.role,
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.clone()),
        },
    }
}

fn parse_reply(response: CompletionResponse, structured: bool) -> Result<ModelReply, DomainError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::Generation("OpenAI returned no choices".into()))?;
    let message = choice.message;

    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(DomainError::Generation(format!("model refused: {refusal}")));
    }

    let calls: Vec<ToolCallRequest> = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|c| ToolCallRequest {
            id: c.id,
            name: c.function.name,
            arguments: c.function.arguments,
        })
        .collect();
    if !calls.is_empty() {
        return Ok(ModelReply::ToolCalls {
            text: message.content,
            calls,
        });
    }

    let content = message.content.unwrap_or_default();
    if !structured {
        return Ok(ModelReply::Text(content));
    }

    if choice.finish_reason.as_deref() == Some("length") {
        return Err(DomainError::Generation(
            "structured output truncated by the token limit".into(),
        ));
    }
    serde_json::from_str(&content)
        .map(ModelReply::Structured)
        .map_err(|e| DomainError::SchemaValidation(format!("structured output is not JSON: {e}")))
}
