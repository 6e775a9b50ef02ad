//! MCP Server protocol implementation
//!
//! This module handles the MCP JSON-RPC protocol over stdio, one message
//! per line. Requests without an `id` are notifications and never get a
//! response.

use std::sync::Arc;

use obsidian_core::{Dispatcher, SchemaCatalog};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{McpError, McpResult};
use crate::tools::ToolCall;
use crate::{PROTOCOL_VERSION, SERVER_INSTRUCTIONS, SERVER_NAME, SERVER_VERSION};

/// MCP JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct MCPRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct MCPResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

#[derive(Debug, Serialize)]
pub struct MCPError {
    pub code: i32,
    pub message: String,
}

impl MCPResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response; `id` is `null` when the request could not be read
    pub fn failure(id: Value, error: &McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error.to_mcp_error()),
        }
    }
}

/// MCP server fronting the tool dispatcher
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Server backed by the real CLI with the built-in catalog
    pub fn from_config(config: &ServerConfig) -> Self {
        let dispatcher = Dispatcher::new(
            SchemaCatalog::builtin(),
            Arc::new(config.runner()),
            config.run_options(),
        );
        Self::new(dispatcher)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&self) -> McpResult<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches EOF. A line
    /// that is not UTF-8 gets a parse error reply; the loop keeps reading.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line).await,
                Err(e) => {
                    debug!(error = %e, "undecodable input line");
                    Some(MCPResponse::failure(
                        Value::Null,
                        &McpError::Parse(format!("invalid UTF-8: {e}")),
                    ))
                }
            };
            let Some(response) = response else {
                continue;
            };

            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line
    pub async fn handle_line(&self, line: &str) -> Option<MCPResponse> {
        if line.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<MCPRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(MCPResponse::failure(
                Value::Null,
                &McpError::Parse(e.to_string()),
            )),
        }
    }

    /// Handle an MCP request
    pub async fn handle_request(&self, request: MCPRequest) -> Option<MCPResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        Some(match result {
            Ok(value) => MCPResponse::success(id, value),
            Err(err) => {
                debug!(method = %request.method, error = %err, "request failed");
                MCPResponse::failure(id, &err)
            }
        })
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "instructions": SERVER_INSTRUCTIONS
        })
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let tools: Vec<Value> = self
            .dispatcher
            .catalog()
            .definitions()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        Ok(json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, params: Value) -> McpResult<Value> {
        let call = ToolCall::from_params(params)?;
        let result = self.handle_tool_call(call).await;
        Ok(serde_json::to_value(result)?)
    }
}
