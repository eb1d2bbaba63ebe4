//! Error types shared across the core crate.

use thiserror::Error;

/// Errors produced by the series model and the forecasting algorithms.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A model parameter is outside its valid range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Not enough observations to fit or transform
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Predict was called before fit
    #[error("model has not been fitted")]
    NotFitted,

    /// A series operation was attempted on an empty series
    #[error("series is empty")]
    EmptySeries,

    /// A period string did not match the `YYYY MON` layout
    #[error("unrecognised period `{0}`")]
    BadPeriod(String),

    /// A date string did not match any supported layout
    #[error("unrecognised date `{0}`")]
    BadDate(String),
}

impl CoreError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
