//! Obsidian MCP Server Library
//!
//! This crate exposes the Obsidian CLI to agents over the Model Context
//! Protocol. Every tool call is validated against the catalog and turned
//! into one or more `obsidian` invocations by `obsidian-core`.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  JSON-RPC over stdio
//!        ▼
//! ┌─────────────────┐
//! │   MCP Server    │ ◄── This crate
//! │                 │
//! │  initialize     │
//! │  tools/list     │ ── catalog definitions
//! │  tools/call     │ ── Dispatcher::invoke
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  obsidian-core  │
//! │                 │
//! │ validate │ args │
//! │ dispatch │ run  │
//! └────────┬────────┘
//!          ▼
//!     obsidian CLI
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use obsidian_mcp::{McpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::builder().vault("Work").build();
//!     McpServer::from_config(&config).run_stdio().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{McpError, McpResult};
pub use server::{MCPError, MCPRequest, MCPResponse, McpServer};
pub use tools::{ToolCall, ToolContent, ToolResult};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "obsidian";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_INSTRUCTIONS: &str = "Read, write, search and organize notes in an Obsidian vault. \
Every tool accepts an optional `vault` argument to target a vault other than the default.";

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";
