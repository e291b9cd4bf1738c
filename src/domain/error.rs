use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Event source error: {0}")]
    EventSource(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),
}
