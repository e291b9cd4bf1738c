pub mod events;
pub mod llm;
pub mod sinks;
pub mod tools;
