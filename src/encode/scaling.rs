//! Fitted linear rescaling of numeric columns.
//!
//! `value' = (value - mean) / scale` per column. The column list and its order
//! must equal the list the model was fitted with; a mismatch would not fail on
//! its own, it would just produce wrong predictions, so it is checked up front.

use crate::domain::{EncodedFeatureVector, FeatureColumn};
use crate::encode::EncodeError;

/// Per-column `(mean, scale)` pairs from a fitted scaler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingStage {
    columns: Vec<FeatureColumn>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl ScalingStage {
    pub fn new(columns: Vec<FeatureColumn>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, EncodeError> {
        if columns.is_empty() {
            return Err(EncodeError::InvalidScaler("no columns".to_string()));
        }
        if mean.len() != columns.len() || scale.len() != columns.len() {
            return Err(EncodeError::InvalidScaler(format!(
                "{} column(s) but {} mean(s) and {} scale(s)",
                columns.len(),
                mean.len(),
                scale.len()
            )));
        }
        if let Some(col) = columns.iter().find(|c| !c.is_numeric()) {
            return Err(EncodeError::InvalidScaler(format!("{col} is categorical and cannot be scaled")));
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].contains(col) {
                return Err(EncodeError::InvalidScaler(format!("{col} listed more than once")));
            }
        }
        for ((col, m), s) in columns.iter().zip(&mean).zip(&scale) {
            if !m.is_finite() || !(s.is_finite() && *s > 0.0) {
                return Err(EncodeError::InvalidScaler(format!(
                    "{col} has mean={m} scale={s}; scale must be finite and positive"
                )));
            }
        }

        Ok(Self { columns, mean, scale })
    }

    /// Build from column names as stored in a scaler artifact.
    pub fn from_names<S: AsRef<str>>(names: &[S], mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, EncodeError> {
        let columns = names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                FeatureColumn::from_name(n).ok_or_else(|| EncodeError::InvalidScaler(format!("unknown column '{n}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns, mean, scale)
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    fn transform(&self, mut vector: EncodedFeatureVector) -> EncodedFeatureVector {
        for ((&col, m), s) in self.columns.iter().zip(&self.mean).zip(&self.scale) {
            let v = vector.get(col);
            vector.set(col, (v - m) / s);
        }
        vector
    }
}

/// Guard and run the scaling step a model expects.
///
/// - nothing expected, no scaler: the vector passes through
/// - otherwise the scaler's columns must equal `expected`, in order
pub fn apply_scaling(
    expected: &[FeatureColumn],
    stage: Option<&ScalingStage>,
    vector: EncodedFeatureVector,
) -> Result<EncodedFeatureVector, EncodeError> {
    let actual: &[FeatureColumn] = stage.map(|s| s.columns()).unwrap_or(&[]);
    if actual != expected {
        return Err(EncodeError::ScalingColumnMismatch {
            expected: names(expected),
            actual: names(actual),
        });
    }

    Ok(match stage {
        Some(stage) => stage.transform(vector),
        None => vector,
    })
}

fn names(columns: &[FeatureColumn]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}
