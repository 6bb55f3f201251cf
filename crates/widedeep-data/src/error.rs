//! Error types for the widedeep-data crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or batching a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// One-based line number within the CSV file
        line: usize,
        /// Description of the parse failure
        message: String,
    },

    /// A required column was absent from the header row.
    #[error("Missing column {name:?} in header")]
    MissingColumn {
        /// The column name that could not be resolved
        name: String,
    },

    /// The file contained a header but no data rows.
    #[error("No data rows found in {}", path.display())]
    EmptyDataset {
        /// The file that was read
        path: PathBuf,
    },

    /// Invalid dataset configuration.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::MissingColumn {
            name: "medv".to_string(),
        };
        assert!(err.to_string().contains("\"medv\""));

        let err = DataError::Parse {
            line: 12,
            message: "invalid number".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }
}
