//! Render error types.

use gridtone_lut::LutError;
use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised by the render surface and its backends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Render or capture requested before a texture was attached.
    #[error("render surface not ready")]
    SurfaceNotReady,

    /// Selected LUT failed to parse. Rendering continues without a LUT.
    #[error("malformed LUT '{name}': {reason}")]
    MalformedLut {
        /// Requested LUT name
        name: String,
        /// Parser message
        reason: String,
    },

    /// Selected LUT is not in the catalog. Rendering continues without a LUT.
    #[error("LUT not found: {0}")]
    LutNotFound(String),

    /// Source image could not be decoded.
    #[error("texture load failed: {0}")]
    TextureLoadFailure(String),

    /// Readback or encoding produced no data.
    #[error("capture failed: {0}")]
    CaptureFailure(String),

    /// Backend initialization or execution failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Maps a LUT loading failure for `name` onto the render error space.
    pub fn from_lut(name: &str, err: LutError) -> Self {
        match err {
            LutError::NotFound(n) => Self::LutNotFound(n),
            other => Self::MalformedLut {
                name: name.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
