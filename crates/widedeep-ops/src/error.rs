//! Error types for the widedeep-ops crate.

use thiserror::Error;

/// Error type for loss, optimizer, and schedule operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Optimizer was constructed with a configuration for a different type.
    #[error("Config mismatch: expected {expected}, got {got}")]
    ConfigMismatch {
        /// Name of the optimizer type being constructed
        expected: String,
        /// Name of the optimizer type the config describes
        got: String,
    },

    /// Invalid hyperparameter value or combination.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Logits and labels disagree on shape.
    #[error("Shape mismatch: {message}")]
    ShapeMismatch {
        /// Description of the mismatched shapes
        message: String,
    },

    /// A class label at or above the class count.
    #[error("Label {label} out of range for {num_classes} classes")]
    LabelOutOfRange {
        /// The offending label value
        label: usize,
        /// The number of classes the logits cover
        num_classes: usize,
    },

    /// Gradient requested before a forward pass cached its inputs.
    #[error("No cached forward pass: call forward before grad")]
    NotReady,
}

/// Result type alias for ops operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OpsError::ConfigMismatch {
            expected: "Sgd".to_string(),
            got: "Momentum".to_string(),
        };
        assert!(err.to_string().contains("expected Sgd"));

        let err = OpsError::LabelOutOfRange {
            label: 4,
            num_classes: 4,
        };
        assert!(err.to_string().contains("Label 4 out of range"));

        let err = OpsError::InvalidParameter("decay_rate must be positive".to_string());
        assert!(err.to_string().contains("decay_rate"));
    }
}
