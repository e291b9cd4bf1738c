pub mod chat_model;
pub mod event_source;
pub mod signal_sink;
pub mod tool_handler;
