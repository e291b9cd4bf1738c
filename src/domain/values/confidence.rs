use serde::{Deserialize, Serialize};
use std::fmt;

/// Model confidence that a signal yields a positive return, in `[0, 1]`.
///
/// Out-of-range values are rejected rather than clamped, including on
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {value}"
            ));
        }
        Ok(Confidence(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Confidence::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
    }

    #[test]
    fn test_out_of_range_is_rejected_not_clamped() {
        assert!(Confidence::new(1.5).is_err());
        assert!(Confidence::new(-0.01).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Confidence = serde_json::from_str("0.8").unwrap();
        assert_eq!(ok.value(), 0.8);
        assert!(serde_json::from_str::<Confidence>("1.5").is_err());
    }
}
