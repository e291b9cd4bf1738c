use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl fmt::Display for SignalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSide::Buy => write!(f, "BUY"),
            SignalSide::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for SignalSide {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(SignalSide::Buy),
            "SELL" => Ok(SignalSide::Sell),
            _ => Err(format!("Unknown signal side: {s} (expected BUY or SELL)")),
        }
    }
}
