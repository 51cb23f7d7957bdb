//! Column ordering and the encoded model input.
//!
//! The order of columns is part of a trained model's contract. It is carried as
//! data (`FeatureLayout`) next to the values instead of being implied by code.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::FeatureColumn;
use crate::encode::EncodeError;

/// An ordering of all model-input columns, each appearing exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureLayout(Vec<FeatureColumn>);

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FeatureLayout {
    /// The column order of the loan training data.
    pub fn canonical() -> Self {
        Self(FeatureColumn::ALL.to_vec())
    }

    pub fn from_columns(columns: Vec<FeatureColumn>) -> Result<Self, EncodeError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(*col) {
                return Err(EncodeError::LayoutMismatch(format!("column {col} appears more than once")));
            }
        }

        let missing: Vec<&str> = FeatureColumn::ALL
            .iter()
            .filter(|c| !seen.contains(c))
            .map(|c| c.name())
            .collect();
        if !missing.is_empty() {
            return Err(EncodeError::LayoutMismatch(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self(columns))
    }

    /// Build a layout from training-data column names (e.g. a model's feature list).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, EncodeError> {
        let columns = names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                FeatureColumn::from_name(n)
                    .ok_or_else(|| EncodeError::LayoutMismatch(format!("unknown column '{n}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_columns(columns)
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.0
    }

    pub fn position(&self, column: FeatureColumn) -> Option<usize> {
        self.0.iter().position(|&c| c == column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Model input: one value per layout column, in layout order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedFeatureVector {
    columns: FeatureLayout,
    values: Vec<f64>,
}

impl EncodedFeatureVector {
    /// # Panics
    /// Panics if `values` does not have one entry per layout column.
    pub(crate) fn new(columns: FeatureLayout, values: Vec<f64>) -> Self {
        assert_eq!(columns.len(), values.len(), "one value per layout column");
        Self { columns, values }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: FeatureColumn) -> f64 {
        // Layouts always contain every column.
        let idx = self.columns.position(column).unwrap_or_default();
        self.values[idx]
    }

    pub(crate) fn set(&mut self, column: FeatureColumn, value: f64) {
        if let Some(idx) = self.columns.position(column) {
            self.values[idx] = value;
        }
    }

    /// `(column, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureColumn, f64)> + '_ {
        self.columns.columns().iter().copied().zip(self.values.iter().copied())
    }
}
