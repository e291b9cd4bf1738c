use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which event source backs the retrieval tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Http,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Http => write!(f, "http"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "http" => Ok(SourceKind::Http),
            _ => Err(format!("Unknown event source: {s} (expected file or http)")),
        }
    }
}
