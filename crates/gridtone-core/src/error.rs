//! Error types for gridtone-core.
//!
//! # Usage
//!
//! ```rust
//! use gridtone_core::{Error, Image};
//!
//! let err = Image::from_data(2, 2, vec![0.0; 3]).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by image buffers and the parameter model.
#[derive(Debug, Error)]
pub enum Error {
    /// Image dimensions are zero or don't match the supplied data.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// A parameter field carried a value that is not a finite number.
    ///
    /// Raised by the flat wire decoder. Missing fields are not an error;
    /// they fall back to their defaults.
    #[error("invalid value for field '{field}': {value:?}")]
    InvalidField {
        /// Wire name of the field
        field: String,
        /// Raw value that failed to parse
        value: String,
    },

    /// Field name that is not part of the parameter set.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidField`] error.
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}
