//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// LUT file content is malformed: wrong entry count, non-numeric value,
    /// missing size header.
    #[error("malformed LUT: {0}")]
    Malformed(String),

    /// Requested LUT name is not in the catalog.
    #[error("LUT not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
