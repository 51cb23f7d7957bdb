use crate::app::pipeline::PipelineError;
use crate::encode::EncodeError;
use crate::models::PredictError;

/// Exit code for I/O failures (input files, exports).
pub const EXIT_IO: u8 = 2;
/// Exit code for input that cannot be encoded.
pub const EXIT_ENCODE: u8 = 3;
/// Exit code for prediction and terminal failures.
pub const EXIT_RUNTIME: u8 = 4;
/// Exit code when prediction is requested but no model could be loaded.
pub const EXIT_NO_MODEL: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::new(EXIT_ENCODE, err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::new(EXIT_RUNTIME, err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Encode(e) => e.into(),
            PipelineError::Predict(e) => e.into(),
            other @ PipelineError::ModelUnavailable => AppError::new(EXIT_NO_MODEL, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureColumn;

    #[test]
    fn pipeline_errors_map_to_exit_codes() {
        let encode = PipelineError::Encode(EncodeError::InvalidNumeric {
            column: FeatureColumn::LoanAmount,
            value: -1.0,
        });
        assert_eq!(AppError::from(encode).exit_code(), EXIT_ENCODE);
        assert_eq!(AppError::from(PipelineError::ModelUnavailable).exit_code(), EXIT_NO_MODEL);
        assert_eq!(
            AppError::from(PipelineError::Predict(PredictError::NonFinite)).exit_code(),
            EXIT_RUNTIME
        );
    }
}
