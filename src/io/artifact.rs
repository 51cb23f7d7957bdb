//! Load model and scaler artifacts.
//!
//! Artifacts are loaded once at startup. A missing or malformed artifact never
//! aborts the program: the affected feature is disabled and a warning is kept
//! for the front-end to show.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::app::pipeline::Pipeline;
use crate::encode::{FeatureEncoder, ScalingStage};
use crate::models::{LogisticArtifact, LogisticModel, Predictor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => f.write_str("model"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found at '{}'", .path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error("Failed to read {kind} artifact '{}': {reason}", .path.display())]
    Unreadable {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid {kind} artifact '{}': {reason}", .path.display())]
    Invalid {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

/// On-disk form of a fitted standard scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Where to find the artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: Option<PathBuf>,
}

/// Read a logistic-regression model and the encoder configuration it carries.
pub fn read_model(path: &Path) -> Result<(LogisticModel, FeatureEncoder), ArtifactError> {
    let artifact: LogisticArtifact = read_json(ArtifactKind::Model, path)?;
    LogisticModel::from_artifact(artifact).map_err(|reason| ArtifactError::Invalid {
        kind: ArtifactKind::Model,
        path: path.to_path_buf(),
        reason,
    })
}

/// Read a fitted scaler.
pub fn read_scaler(path: &Path) -> Result<ScalingStage, ArtifactError> {
    let artifact: ScalerArtifact = read_json(ArtifactKind::Scaler, path)?;
    ScalingStage::from_names(&artifact.columns, artifact.mean, artifact.scale).map_err(|e| {
        ArtifactError::Invalid {
            kind: ArtifactKind::Scaler,
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })
}

fn read_json<T: serde::de::DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Unreadable {
                kind,
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| ArtifactError::Invalid {
        kind,
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Immutable, process-lifetime handles to the loaded artifacts.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub model: Option<LogisticModel>,
    /// Encoder configured by the model (canonical layout when no model is loaded).
    pub encoder: FeatureEncoder,
    pub scaler: Option<ScalingStage>,
    /// Human-readable problems found while loading.
    pub warnings: Vec<String>,
}

impl Artifacts {
    /// Load whatever is available; problems become warnings.
    pub fn load(paths: &ArtifactPaths) -> Self {
        let mut out = Artifacts::default();

        match read_model(&paths.model) {
            Ok((model, encoder)) => {
                info!(path = %paths.model.display(), "loaded model artifact");
                out.model = Some(model);
                out.encoder = encoder;
            }
            Err(err) => {
                warn!(error = %err, "model unavailable; prediction disabled");
                out.warnings
                    .push(format!("{err}. Prediction will fail until the model file is present."));
            }
        }

        if let Some(path) = &paths.scaler {
            match read_scaler(path) {
                Ok(stage) => {
                    info!(path = %path.display(), columns = stage.columns().len(), "loaded scaler artifact");
                    out.scaler = Some(stage);
                }
                Err(err) => {
                    warn!(error = %err, "scaler unavailable");
                    out.warnings.push(format!("{err}. Scaling disabled."));
                }
            }
        }

        if out.model.is_some() && !out.encoder.scaled_columns().is_empty() && out.scaler.is_none() {
            let warning = "Model expects scaled inputs but no scaler is loaded; predictions will be refused.";
            warn!("{warning}");
            out.warnings.push(warning.to_string());
        }

        out
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Borrow the artifacts as a pipeline for one submission.
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            encoder: &self.encoder,
            scaler: self.scaler.as_ref(),
            predictor: self.model.as_ref().map(|m| m as &dyn Predictor),
        }
    }
}
