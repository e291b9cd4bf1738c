use async_trait::async_trait;
use serde_json::Value;

/// Executes one named tool.
///
/// An `Err` is not fatal to the pipeline: it is handed back to the model as
/// an `{"error": ...}` tool result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Value) -> Result<Value, String>;
}
