//! Error types for index processing.

use eo_common::EoError;
use thiserror::Error;

/// Errors that can occur while deriving indices and statistics.
///
/// Missing data is never an error here; it surfaces as no-data values in
/// the outputs. Only inconsistent inputs and bad configuration fail.
#[derive(Error, Debug, PartialEq)]
pub enum ProcessorError {
    /// Invalid input raster (shape mismatch, missing band, bad ordering).
    #[error(transparent)]
    Data(#[from] EoError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Two per-timestep sequences that must line up have different lengths.
    #[error("length mismatch: {what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ProcessorError {
    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check two sequence lengths agree.
    pub fn ensure_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                what,
                expected,
                found,
            })
        }
    }

    /// Whether this error stems from inconsistent grid shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Data(e) if e.is_shape_error())
    }
}

/// Result type for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
