//! Shared "predict pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parse -> encode -> scale -> predict -> normalize verdict
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::domain::{ApplicantRecord, Decision, EncodedFeatureVector, RawApplicant, RawVerdict};
use crate::encode::{EncodeError, FeatureEncoder, ScalingStage};
use crate::models::{PredictError, Predictor, normalize_verdict};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Model is not loaded. Add the model artifact and restart.")]
    ModelUnavailable,

    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Borrowed handles for one submission.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    pub encoder: &'a FeatureEncoder,
    pub scaler: Option<&'a ScalingStage>,
    pub predictor: Option<&'a dyn Predictor>,
}

/// Everything computed for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub record: ApplicantRecord,
    pub features: EncodedFeatureVector,
    pub verdict: RawVerdict,
    pub decision: Decision,
    pub approval_probability: Option<f64>,
    pub generated_at: NaiveDateTime,
}

impl<'a> Pipeline<'a> {
    /// Encode (and scale, when configured) without calling the predictor.
    pub fn encode(&self, record: &ApplicantRecord) -> Result<EncodedFeatureVector, EncodeError> {
        self.encoder.encode_scaled(record, self.scaler)
    }

    pub fn run_raw(&self, raw: &RawApplicant) -> Result<Outcome, PipelineError> {
        let record = self.encoder.parse(raw)?;
        self.run(&record)
    }

    pub fn run(&self, record: &ApplicantRecord) -> Result<Outcome, PipelineError> {
        self.run_at(record, Local::now().naive_local())
    }

    /// Run with an explicit generation timestamp.
    pub fn run_at(&self, record: &ApplicantRecord, generated_at: NaiveDateTime) -> Result<Outcome, PipelineError> {
        let predictor = self.predictor.ok_or(PipelineError::ModelUnavailable)?;

        let features = self.encode(record)?;
        debug!(values = ?features.values(), "encoded applicant");

        let verdict = predictor.predict(&features)?;
        let decision = normalize_verdict(&verdict);
        let approval_probability = predictor.approval_probability(&features);
        debug!(%verdict, ?decision, "prediction complete");

        Ok(Outcome {
            record: record.clone(),
            features,
            verdict,
            decision,
            approval_probability,
            generated_at,
        })
    }
}
