//! Predictors.
//!
//! A predictor is an explicit handle passed into the pipeline (never a global),
//! so front-ends load it once and tests substitute fakes.

pub mod logistic;
pub mod model;

pub use logistic::*;
pub use model::*;
