use staffcast_core::CoreError;
use thiserror::Error;

/// Errors raised while fitting or querying tree models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("insufficient training data: {reason}")]
    InsufficientTrainingData { reason: String },

    #[error("model fitted on {expected} features, input has {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        ModelError::InsufficientTrainingData {
            reason: reason.into(),
        }
    }
}
