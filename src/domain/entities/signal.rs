use crate::domain::error::DomainError;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::quantity_semantics::QuantitySemantics;
use crate::domain::values::signal_side::SignalSide;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// A structured trading decision produced by the model.
///
/// Only obtainable through validation, so every `Signal` in hand satisfies
/// its invariants. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    signal: SignalSide,
    symbol: String,
    quantity: f64,
    confidence_score: Confidence,
    event_id: i64,
    motivation: String,
}

/// Shape the model is asked to emit, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSignal {
    signal: String,
    symbol: String,
    quantity: f64,
    confidence_score: f64,
    event_id: i64,
    motivation: String,
}

impl Signal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        signal: SignalSide,
        symbol: &str,
        quantity: f64,
        confidence_score: f64,
        event_id: i64,
        motivation: &str,
        semantics: QuantitySemantics,
    ) -> Result<Self, DomainError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DomainError::SchemaValidation("symbol must not be empty".into()));
        }
        semantics.check(quantity).map_err(DomainError::SchemaValidation)?;
        let confidence_score =
            Confidence::new(confidence_score).map_err(DomainError::SchemaValidation)?;

        Ok(Self {
            signal,
            symbol,
            quantity,
            confidence_score,
            event_id,
            motivation: motivation.trim().to_string(),
        })
    }

    /// Validate a structured model output into a signal.
    pub fn from_value(value: Value, semantics: QuantitySemantics) -> Result<Self, DomainError> {
        let raw: RawSignal = serde_json::from_value(value)
            .map_err(|e| DomainError::SchemaValidation(format!("malformed signal: {e}")))?;
        let side: SignalSide = raw.signal.parse().map_err(DomainError::SchemaValidation)?;
        Self::new(
            side,
            &raw.symbol,
            raw.quantity,
            raw.confidence_score,
            raw.event_id,
            &raw.motivation,
            semantics,
        )
    }

    /// Strict JSON schema for structured output.
    pub fn json_schema(semantics: QuantitySemantics) -> Value {
        json!({
            "type": "object",
            "properties": {
                "signal": {
                    "type": "string",
                    "enum": ["BUY", "SELL"],
                    "description": "Either BUY or SELL."
                },
                "symbol": {
                    "type": "string",
                    "description": "The symbol of the token to buy or sell."
                },
                "quantity": {
                    "type": "number",
                    "description": semantics.describe()
                },
                "confidence_score": {
                    "type": "number",
                    "description": "A coefficient from 0 to 1 that represents the confidence you have that the signal will generate a positive return for the user."
                },
                "event_id": {
                    "type": "integer",
                    "description": "The event id of the event chosen as the source for the generated signal."
                },
                "motivation": {
                    "type": "string",
                    "description": "A brief explanation of the signal."
                }
            },
            "required": ["signal", "symbol", "quantity", "confidence_score", "event_id", "motivation"],
            "additionalProperties": false
        })
    }

    pub fn side(&self) -> SignalSide {
        self.signal
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score.value()
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn motivation(&self) -> &str {
        &self.motivation
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(
                f,
                "{} {} x{} (confidence {}, event {})",
                self.signal, self.symbol, self.quantity, self.confidence_score, self.event_id
            ),
        }
    }
}
