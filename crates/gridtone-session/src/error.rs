//! Session error types.

use gridtone_render::RenderError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised by sessions and persistence backends.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No post or blob with this id/url.
    #[error("not found: {0}")]
    NotFound(String),

    /// Saving requires a signed-in user.
    #[error("no signed-in user")]
    Unauthorized,

    /// The store rejected the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Rendering or capture failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A property value could not be applied.
    #[error(transparent)]
    Properties(#[from] gridtone_core::Error),

    /// Post record (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
