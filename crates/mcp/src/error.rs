//! MCP error types.

use crate::protocol::{JsonRpcError, codes};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("input too large: {size} bytes (max {max})")]
    InputTooLarge { size: usize, max: usize },
}

impl Error {
    /// Convert into the JSON-RPC error sent back to the client.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let code = match self {
            Self::InvalidParams(_) | Self::ToolNotFound(_) => codes::INVALID_PARAMS,
            Self::InputTooLarge { .. } => codes::INVALID_REQUEST,
            Self::Io(_) | Self::Serialize(_) => codes::INTERNAL_ERROR,
        };
        JsonRpcError::new(code, self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
