//! Error types for model construction, training, and persistence.

use std::path::PathBuf;
use thiserror::Error;
use widedeep_data::DataError;
use widedeep_layers::LayerError;
use widedeep_ops::OpsError;

/// Errors that can occur while building or running a classifier.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A layer raised an error during a forward or backward pass.
    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),

    /// A loss, metric, or optimizer operation failed.
    #[error("Op error: {0}")]
    Op(#[from] OpsError),

    /// The input pipeline failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A checkpoint payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No checkpoint exists at the given path.
    #[error("No checkpoint found at {}", .0.display())]
    CheckpointNotFound(PathBuf),

    /// A restored checkpoint does not line up with the model being restored.
    #[error("Checkpoint mismatch: {message}")]
    CheckpointMismatch {
        /// Human-readable description of the disagreement.
        message: String,
    },

    /// The classifier was built without any predictors.
    #[error("Joint classifier has no predictors")]
    NoPredictors,

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable description of the problem.
        message: String,
    },
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
