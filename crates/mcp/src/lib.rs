//! MCP (Model Context Protocol) server library.
//!
//! This crate serves tools to an MCP client over line-delimited JSON-RPC
//! on stdio. Implement [`ToolHandler`] and hand it to a [`Server`].
//!
//! # Example
//!
//! ```no_run
//! use mcp::{CallToolResult, Server, ServerConfig, Tool, ToolHandler};
//! use serde_json::{Value, json};
//!
//! struct Clock;
//!
//! impl ToolHandler for Clock {
//!     fn tools(&self) -> Vec<Tool> {
//!         vec![Tool {
//!             name: "now".to_string(),
//!             description: Some("Current time".to_string()),
//!             input_schema: json!({"type": "object"}),
//!         }]
//!     }
//!
//!     async fn call(&self, _name: &str, _arguments: Value) -> mcp::Result<CallToolResult> {
//!         Ok(CallToolResult::text("noon", false))
//!     }
//! }
//!
//! # async fn example() -> mcp::Result<()> {
//! let config = ServerConfig {
//!     name: "clock".to_string(),
//!     version: "0.1.0".to_string(),
//! };
//! Server::new(config, Clock).serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod protocol;
mod server;

pub use error::{Error, Result};
pub use protocol::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, LATEST_PROTOCOL_VERSION, ListToolsResult,
    RequestId, SUPPORTED_PROTOCOL_VERSIONS, ServerCapabilities, ServerInfo, Tool, ToolContent,
    ToolsCapability, codes,
};
pub use server::{MAX_INPUT_SIZE, Server, ServerConfig, ToolHandler};
