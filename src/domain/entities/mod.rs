pub mod conversation;
pub mod signal;
pub mod tool;
