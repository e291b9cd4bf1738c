use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the `quantity` field of a signal is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantitySemantics {
    /// Absolute amount of the token to buy or sell.
    Absolute,
    /// Percentage (0-100) of the user's portfolio to put into the trade.
    Percentage,
}

impl QuantitySemantics {
    /// Field description handed to the model in the output schema.
    pub fn describe(&self) -> &'static str {
        match self {
            QuantitySemantics::Absolute => "The quantity of the token to buy or sell.",
            QuantitySemantics::Percentage => {
                "The percentage of the user's portfolio to invest in the token, from 0 to 100."
            }
        }
    }

    pub fn check(&self, quantity: f64) -> Result<(), String> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(format!("quantity must be a non-negative number, got {quantity}"));
        }
        if *self == QuantitySemantics::Percentage && quantity > 100.0 {
            return Err(format!(
                "quantity is a portfolio percentage and must be at most 100, got {quantity}"
            ));
        }
        Ok(())
    }
}

impl fmt::Display for QuantitySemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantitySemantics::Absolute => write!(f, "absolute"),
            QuantitySemantics::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for QuantitySemantics {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(QuantitySemantics::Absolute),
            "percentage" | "percent" => Ok(QuantitySemantics::Percentage),
            _ => Err(format!("Unknown quantity semantics: {s}")),
        }
    }
}
