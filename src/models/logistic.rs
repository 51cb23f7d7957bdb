//! Logistic-regression classifier loaded from a JSON artifact.
//!
//! The artifact carries everything the encoder needs to reproduce the training
//! layout: feature names (column order), which numeric columns were scaled, and
//! how the loan term was measured.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{EncodedFeatureVector, FeatureColumn, FeatureLayout, LoanTermPolicy, RawVerdict};
use crate::encode::FeatureEncoder;
use crate::models::{PredictError, Predictor};

pub const LOGISTIC_KIND: &str = "logistic_regression";

/// On-disk form of a logistic-regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Training column names, in training order.
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// `[negative, positive]` class labels as the model emits them.
    #[serde(default = "default_classes")]
    pub classes: [RawVerdict; 2],
    /// Numeric columns the model expects rescaled, in fitted order.
    #[serde(default)]
    pub scaled_columns: Vec<String>,
    #[serde(default)]
    pub loan_term: LoanTermPolicy,
}

fn default_kind() -> String {
    LOGISTIC_KIND.to_string()
}

fn default_threshold() -> f64 {
    0.5
}

fn default_classes() -> [RawVerdict; 2] {
    [RawVerdict::Text("N".to_string()), RawVerdict::Text("Y".to_string())]
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    layout: FeatureLayout,
    weights: DVector<f64>,
    intercept: f64,
    threshold: f64,
    classes: [RawVerdict; 2],
}

impl LogisticModel {
    /// Validate an artifact and split it into the model and the encoder it implies.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<(Self, FeatureEncoder), String> {
        if artifact.kind != LOGISTIC_KIND {
            return Err(format!("unsupported model kind '{}' (expected '{LOGISTIC_KIND}')", artifact.kind));
        }

        let layout = FeatureLayout::from_names(&artifact.feature_names).map_err(|e| e.to_string())?;
        if artifact.coefficients.len() != layout.len() {
            return Err(format!(
                "{} coefficient(s) for {} feature(s)",
                artifact.coefficients.len(),
                layout.len()
            ));
        }
        if artifact.coefficients.iter().any(|c| !c.is_finite()) || !artifact.intercept.is_finite() {
            return Err("coefficients and intercept must be finite".to_string());
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(format!("threshold {} must lie in (0, 1)", artifact.threshold));
        }
        if let Some(allowed) = &artifact.loan_term.allowed {
            if allowed.is_empty() {
                return Err("loan_term.allowed must list at least one term".to_string());
            }
            if let Some(bad) = allowed.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
                return Err(format!("loan_term.allowed contains non-positive term {bad}"));
            }
        }

        let scaled = artifact
            .scaled_columns
            .iter()
            .map(|n| FeatureColumn::from_name(n).ok_or_else(|| format!("unknown scaled column '{n}'")))
            .collect::<Result<Vec<_>, _>>()?;

        let encoder = FeatureEncoder::new(layout.clone(), artifact.loan_term)
            .with_scaled_columns(scaled)
            .map_err(|e| e.to_string())?;

        let model = Self {
            layout,
            weights: DVector::from_vec(artifact.coefficients),
            intercept: artifact.intercept,
            threshold: artifact.threshold,
            classes: artifact.classes,
        };
        Ok((model, encoder))
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    fn probability(&self, features: &EncodedFeatureVector) -> Result<f64, PredictError> {
        if features.layout() != &self.layout {
            let got: Vec<&str> = features.layout().columns().iter().map(|c| c.name()).collect();
            return Err(PredictError::LayoutMismatch(format!("got [{}]", got.join(", "))));
        }

        let x = DVector::from_column_slice(features.values());
        let z = self.weights.dot(&x) + self.intercept;
        let p = sigmoid(z);
        if p.is_finite() { Ok(p) } else { Err(PredictError::NonFinite) }
    }
}

impl Predictor for LogisticModel {
    fn predict(&self, features: &EncodedFeatureVector) -> Result<RawVerdict, PredictError> {
        let p = self.probability(features)?;
        let class = if p >= self.threshold { &self.classes[1] } else { &self.classes[0] };
        Ok(class.clone())
    }

    fn approval_probability(&self, features: &EncodedFeatureVector) -> Option<f64> {
        self.probability(features).ok()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicantRecord, CreditHistory, TermUnit};

    /// Approves on good credit history, ignores everything else.
    fn credit_only_artifact() -> LogisticArtifact {
        let mut coefficients = vec![0.0; 11];
        coefficients[9] = 4.0;
        LogisticArtifact {
            kind: LOGISTIC_KIND.to_string(),
            feature_names: FeatureColumn::ALL.iter().map(|c| c.name().to_string()).collect(),
            coefficients,
            intercept: -2.0,
            threshold: 0.5,
            classes: default_classes(),
            scaled_columns: Vec::new(),
            loan_term: LoanTermPolicy::default(),
        }
    }

    #[test]
    fn predicts_positive_class_above_threshold() {
        let (model, encoder) = LogisticModel::from_artifact(credit_only_artifact()).unwrap();
        let good = encoder.encode(&ApplicantRecord::default()).unwrap();
        assert_eq!(model.predict(&good).unwrap(), RawVerdict::Text("Y".to_string()));
        let p = model.approval_probability(&good).unwrap();
        assert!((p - sigmoid(2.0)).abs() < 1e-12);

        let bad = encoder
            .encode(&ApplicantRecord {
                credit_history: CreditHistory::Bad,
                ..ApplicantRecord::default()
            })
            .unwrap();
        assert_eq!(model.predict(&bad).unwrap(), RawVerdict::Text("N".to_string()));
    }

    #[test]
    fn numeric_classes_are_passed_through() {
        let artifact = LogisticArtifact {
            classes: [RawVerdict::Number(0.0), RawVerdict::Number(1.0)],
            ..credit_only_artifact()
        };
        let (model, encoder) = LogisticModel::from_artifact(artifact).unwrap();
        let v = encoder.encode(&ApplicantRecord::default()).unwrap();
        assert_eq!(model.predict(&v).unwrap(), RawVerdict::Number(1.0));
    }

    #[test]
    fn rejects_vectors_in_another_layout() {
        let (model, _) = LogisticModel::from_artifact(credit_only_artifact()).unwrap();
        let mut cols = FeatureColumn::ALL.to_vec();
        cols.reverse();
        let other = FeatureEncoder::new(FeatureLayout::from_columns(cols).unwrap(), LoanTermPolicy::default());
        let v = other.encode(&ApplicantRecord::default()).unwrap();
        assert!(matches!(model.predict(&v), Err(PredictError::LayoutMismatch(_))));
    }

    #[test]
    fn artifact_configures_encoder() {
        let artifact = LogisticArtifact {
            scaled_columns: vec!["ApplicantIncome".to_string(), "LoanAmount".to_string()],
            loan_term: LoanTermPolicy { unit: TermUnit::Days, allowed: None },
            ..credit_only_artifact()
        };
        let (_, encoder) = LogisticModel::from_artifact(artifact).unwrap();
        assert_eq!(
            encoder.scaled_columns(),
            &[FeatureColumn::ApplicantIncome, FeatureColumn::LoanAmount]
        );
        assert_eq!(encoder.loan_term().unit, TermUnit::Days);
    }

    #[test]
    fn invalid_artifacts_are_reported() {
        let short = LogisticArtifact {
            coefficients: vec![1.0; 3],
            ..credit_only_artifact()
        };
        assert!(LogisticModel::from_artifact(short).unwrap_err().contains("coefficient"));

        let kind = LogisticArtifact {
            kind: "random_forest".to_string(),
            ..credit_only_artifact()
        };
        assert!(LogisticModel::from_artifact(kind).unwrap_err().contains("unsupported"));

        let scaled_category = LogisticArtifact {
            scaled_columns: vec!["Gender".to_string()],
            ..credit_only_artifact()
        };
        assert!(LogisticModel::from_artifact(scaled_category).is_err());
    }

    #[test]
    fn empty_or_non_positive_term_lists_are_rejected() {
        let empty = LogisticArtifact {
            loan_term: LoanTermPolicy { unit: TermUnit::Days, allowed: Some(vec![]) },
            ..credit_only_artifact()
        };
        assert!(LogisticModel::from_artifact(empty).unwrap_err().contains("at least one term"));

        for bad in [0.0, -360.0, f64::NAN] {
            let artifact = LogisticArtifact {
                loan_term: LoanTermPolicy { unit: TermUnit::Months, allowed: Some(vec![360.0, bad]) },
                ..credit_only_artifact()
            };
            assert!(LogisticModel::from_artifact(artifact).unwrap_err().contains("non-positive"));
        }
    }

    #[test]
    fn artifact_json_defaults() {
        let names: Vec<&str> = FeatureColumn::ALL.iter().map(|c| c.name()).collect();
        let json = serde_json::json!({
            "feature_names": names,
            "coefficients": vec![0.0; 11],
            "intercept": 0.0,
        });
        let artifact: LogisticArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(artifact.kind, LOGISTIC_KIND);
        assert_eq!(artifact.threshold, 0.5);
        assert_eq!(artifact.loan_term, LoanTermPolicy::default());
        assert!(artifact.scaled_columns.is_empty());
    }
}
