//! Dataset error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the training dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The file could not be opened
    #[error("Failed to open dataset {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell could not be parsed
    #[error("Invalid value {value:?} in column {column} at line {line}")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::MissingColumn("boneage");
        assert_eq!(err.to_string(), "Missing required column: boneage");

        let err = DatasetError::InvalidValue {
            line: 3,
            column: "male",
            value: "maybe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"maybe\" in column male at line 3"
        );
    }
}
