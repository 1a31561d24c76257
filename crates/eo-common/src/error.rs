//! Error types for the raster data model.

use thiserror::Error;

/// Result type alias using EoError.
pub type EoResult<T> = Result<T, EoError>;

/// Primary error type for data model operations.
#[derive(Debug, Error, PartialEq)]
pub enum EoError {
    // === Shape Errors ===
    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, found {found_rows}x{found_cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("Buffer length {len} does not match grid shape {rows}x{cols}")]
    BufferLength { rows: usize, cols: usize, len: usize },

    // === Series Errors ===
    #[error("Band not present in scene: {0}")]
    MissingBand(String),

    #[error("Timestamps must be strictly increasing: {0}")]
    UnorderedTimestamps(String),

    #[error("Date not found in series: {0}")]
    DateNotFound(String),

    // === Input Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),
}

impl EoError {
    /// Create a ShapeMismatch error from two `(rows, cols)` pairs.
    pub fn shape_mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            expected_rows: expected.0,
            expected_cols: expected.1,
            found_rows: found.0,
            found_cols: found.1,
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this error stems from inconsistent grid shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, EoError::ShapeMismatch { .. } | EoError::BufferLength { .. })
    }
}

impl From<std::io::Error> for EoError {
    fn from(err: std::io::Error) -> Self {
        EoError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for EoError {
    fn from(err: serde_json::Error) -> Self {
        EoError::DataReadError(format!("JSON error: {}", err))
    }
}
