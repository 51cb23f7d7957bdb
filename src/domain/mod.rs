//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the applicant record, typed (`ApplicantRecord`) and as entered (`RawApplicant`)
//! - model-input columns and their ordering (`FeatureColumn`, `FeatureLayout`)
//! - the encoded model input (`EncodedFeatureVector`)
//! - predictor outputs (`RawVerdict`, `Decision`)

pub mod features;
pub mod types;

pub use features::*;
pub use types::*;
