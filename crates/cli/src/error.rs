//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The `--target` argument was not a valid operation object.
    #[error("invalid target JSON: {0}")]
    InvalidTarget(String),

    /// A tool ran but reported failure.
    #[error("tool failed: {0}")]
    ToolFailed(String),

    /// An error occurred in the MCP server.
    #[error(transparent)]
    Mcp(#[from] mcp::Error),

    /// Output could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
