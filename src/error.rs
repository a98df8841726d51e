//! Error types for tally-rs.

use thiserror::Error;

/// A filter or transaction field that failed its type or format check.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to obtain usable structured output from the language model.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("completion request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed model output: {0}")]
    Malformed(String),

    #[error("model output failed validation: {0}")]
    Invalid(#[from] ValidationError),
}

impl ExtractionError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Completion(_) => "completion",
            ExtractionError::Timeout(_) => "timeout",
            ExtractionError::Malformed(_) => "malformed",
            ExtractionError::Invalid(_) => "invalid",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("transaction not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
