//! Encoding errors.

use thiserror::Error;

use crate::domain::{FeatureColumn, TermUnit};

/// Errors raised while turning an applicant record into model input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A categorical value outside its defined enumeration (label or code).
    #[error("Unmapped value '{value}' for {column}; expected one of: {expected}")]
    UnmappedCategory {
        column: FeatureColumn,
        value: String,
        expected: String,
    },

    /// A numeric field that is negative, NaN or infinite.
    #[error("{column} must be a finite, non-negative number (got {value})")]
    InvalidNumeric { column: FeatureColumn, value: f64 },

    /// A loan term the model artifact does not accept.
    #[error("Loan term {value} {unit} is not supported by this model (allowed: {allowed})")]
    UnsupportedLoanTerm { value: f64, unit: TermUnit, allowed: String },

    /// The scaler's columns differ from the columns the model was fitted with.
    #[error(
        "Scaling columns do not match the model: expected [{}], scaler provides [{}]",
        .expected.join(", "),
        .actual.join(", ")
    )]
    ScalingColumnMismatch { expected: Vec<String>, actual: Vec<String> },

    /// A fitted scaler whose parameters cannot be applied.
    #[error("Invalid scaler: {0}")]
    InvalidScaler(String),

    /// A column ordering that does not name every column exactly once.
    #[error("Invalid feature layout: {0}")]
    LayoutMismatch(String),
}
