//! MCP stdio server (read requests, dispatch to tools, write responses).

use std::future::Future;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{Error, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, LATEST_PROTOCOL_VERSION, ListToolsResult,
    SUPPORTED_PROTOCOL_VERSIONS, ServerCapabilities, ServerInfo, Tool, ToolsCapability, codes,
};

/// Maximum accepted request line (1MB).
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Trait for the tools a server exposes.
///
/// Implementations publish tool definitions and execute calls by name.
pub trait ToolHandler: Send + Sync {
    /// Tool definitions returned by `tools/list`.
    fn tools(&self) -> Vec<Tool>;

    /// Execute a tool call.
    fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> impl Future<Output = Result<CallToolResult>> + Send;
}

/// Identity reported to clients during `initialize`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

/// An MCP server bound to one tool handler.
pub struct Server<H> {
    config: ServerConfig,
    handler: H,
}

impl<H: ToolHandler> Server<H> {
    pub fn new(config: ServerConfig, handler: H) -> Self {
        Self { config, handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve line-delimited JSON-RPC from `reader`, writing replies to `writer`.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(name = %self.config.name, "mcp server listening on stdio");
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                tracing::info!("input closed, shutting down");
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.len() > MAX_INPUT_SIZE {
            let err = Error::InputTooLarge {
                size: line.len(),
                max: MAX_INPUT_SIZE,
            };
            return Some(JsonRpcResponse::failure(None, err.to_rpc_error()));
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                return Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::new(codes::PARSE_ERROR, format!("parse error: {e}")),
                ));
            }
        };

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "malformed request");
                Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::new(codes::INVALID_REQUEST, format!("invalid request: {e}")),
                ))
            }
        }
    }

    /// Handle a parsed request. Returns `None` for notifications.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }
        let id = request.id.clone();

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(codes::INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }

        tracing::debug!(method = %request.method, ?id, "request");
        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            other => {
                let message = format!("method not found: {other}");
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(codes::METHOD_NOT_FOUND, message),
                ));
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                JsonRpcResponse::failure(id, e.to_rpc_error())
            }
        })
    }

    // --- Method handlers ---

    fn initialize(&self, params: Option<Value>) -> Result<Value> {
        let params: InitializeParams = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| Error::InvalidParams(e.to_string()))?,
            None => InitializeParams::default(),
        };

        let protocol_version = params
            .protocol_version
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(&v.as_str()))
            .unwrap_or_else(|| LATEST_PROTOCOL_VERSION.to_string());

        if let Some(client) = &params.client_info {
            tracing::info!(client = %client.name, %protocol_version, "client initialized");
        }

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };
        Ok(serde_json::to_value(result)?)
    }

    fn list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.handler.tools(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params = params.ok_or_else(|| Error::InvalidParams("missing params".to_string()))?;
        let params: CallToolParams =
            serde_json::from_value(params).map_err(|e| Error::InvalidParams(e.to_string()))?;

        if !self.handler.tools().iter().any(|t| t.name == params.name) {
            return Err(Error::ToolNotFound(params.name));
        }

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        let result = self.handler.call(&params.name, arguments).await?;
        Ok(serde_json::to_value(result)?)
    }
}
