//! Home Assistant adapter error types.

use thiserror::Error;

/// Errors raised while resolving or executing a tool call.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The entity id is not of the form `<domain>.<name>`.
    #[error("invalid entity id '{0}': expected <domain>.<name>")]
    InvalidEntityId(String),

    /// The requested operation type is not known.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An operation value is missing or out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Home Assistant answered with a non-success status.
    #[error("service call failed with status {status}")]
    ServiceCallFailed { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response carried a body we could not decode.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceCallFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extra detail for the caller, such as the response body.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::ServiceCallFailed { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
