//! Error types for the Obsidian MCP Server
//!
//! These are protocol-level failures. A tool that runs and fails is not an
//! `McpError`; it is reported inside a successful `tools/call` result with
//! `isError` set.

use thiserror::Error;

use crate::server::MCPError;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// Line was not valid JSON-RPC
    #[error("Parse error: {0}")]
    Parse(String),

    /// Method is not implemented
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Method params have the wrong shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// I/O error on the transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Parse(_) => -32700,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::Io(_) | McpError::Serialization(_) => -32603,
        }
    }

    /// JSON-RPC error object for this failure
    pub fn to_mcp_error(&self) -> MCPError {
        MCPError {
            code: self.error_code(),
            message: self.to_string(),
        }
    }
}
