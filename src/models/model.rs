//! The predictor interface and verdict normalization.

use thiserror::Error;

use crate::domain::{Decision, EncodedFeatureVector, RawVerdict};

/// Errors raised by a predictor call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Feature layout does not match the model: {0}")]
    LayoutMismatch(String),

    #[error("Model produced a non-finite score")]
    NonFinite,

    #[error("Prediction failed: {0}")]
    Failed(String),
}

/// A trained classifier treated as a black box.
pub trait Predictor {
    /// Classify one encoded applicant.
    fn predict(&self, features: &EncodedFeatureVector) -> Result<RawVerdict, PredictError>;

    /// Probability of the approving class, when the model exposes one.
    fn approval_probability(&self, _features: &EncodedFeatureVector) -> Option<f64> {
        None
    }
}

/// Collapse a raw verdict into a decision.
///
/// Approved iff the verdict is `"Y"`, `"Yes"`, or the number `1`; anything else
/// is a rejection.
pub fn normalize_verdict(verdict: &RawVerdict) -> Decision {
    let approved = match verdict {
        RawVerdict::Text(s) => s == "Y" || s == "Yes",
        RawVerdict::Number(n) => *n == 1.0,
    };
    if approved { Decision::Approved } else { Decision::Rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approving_verdicts() {
        for v in [
            RawVerdict::Text("Y".to_string()),
            RawVerdict::Text("Yes".to_string()),
            RawVerdict::Number(1.0),
        ] {
            assert_eq!(normalize_verdict(&v), Decision::Approved, "{v}");
        }
    }

    #[test]
    fn everything_else_rejects() {
        for v in [
            RawVerdict::Text("N".to_string()),
            RawVerdict::Text("No".to_string()),
            RawVerdict::Text("y".to_string()),
            RawVerdict::Text("1".to_string()),
            RawVerdict::Number(0.0),
            RawVerdict::Number(2.0),
        ] {
            assert_eq!(normalize_verdict(&v), Decision::Rejected, "{v}");
        }
    }

    #[test]
    fn verdicts_deserialize_from_strings_or_numbers() {
        let v: Vec<RawVerdict> = serde_json::from_str(r#"["Y", 0, 1.0]"#).unwrap();
        assert_eq!(normalize_verdict(&v[0]), Decision::Approved);
        assert_eq!(normalize_verdict(&v[1]), Decision::Rejected);
        assert_eq!(normalize_verdict(&v[2]), Decision::Approved);
    }
}
