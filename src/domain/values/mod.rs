pub mod confidence;
pub mod quantity_semantics;
pub mod signal_side;
pub mod source_kind;
