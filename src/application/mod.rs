pub mod aggregate_signals;
pub mod generate_signal;
pub mod model_call;
pub mod pipeline;
pub mod prompts;
pub mod resolve_tools;
pub mod tool_registry;
