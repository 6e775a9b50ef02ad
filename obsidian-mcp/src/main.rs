//! Obsidian MCP Server Binary
//!
//! Serves Obsidian CLI operations to agents over stdio.
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio)
//! obsidian-mcp
//!
//! # Default vault and a longer timeout
//! OBSIDIAN_VAULT=Work obsidian-mcp --timeout-ms 30000
//!
//! # Print the tool catalog and exit
//! obsidian-mcp --list-tools
//! ```

use clap::Parser;
use obsidian_core::{SchemaCatalog, DEFAULT_BINARY};
use obsidian_mcp::config::DEFAULT_TIMEOUT_MS;
use obsidian_mcp::{McpServer, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "obsidian-mcp")]
#[command(about = "MCP server exposing the Obsidian CLI as agent tools")]
#[command(version)]
struct Args {
    /// Obsidian CLI executable name or path
    #[arg(long, env = "OBSIDIAN_BIN", default_value = DEFAULT_BINARY)]
    binary: String,

    /// Vault to target when a tool call does not name one
    #[arg(long, env = "OBSIDIAN_VAULT")]
    vault: Option<String>,

    /// Timeout for each CLI invocation, in milliseconds
    #[arg(long, env = "OBSIDIAN_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Print the tool catalog as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.list_tools {
        let catalog = SchemaCatalog::builtin();
        let tools: Vec<_> = catalog.definitions().collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obsidian_mcp=info,obsidian_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServerConfig::builder()
        .binary(args.binary)
        .maybe_vault(args.vault)
        .timeout_ms(args.timeout_ms)
        .build();

    tracing::info!(
        binary = %config.binary,
        vault = ?config.vault,
        timeout_ms = config.timeout_ms,
        "Starting Obsidian MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let server = McpServer::from_config(&config);
    tracing::info!("MCP server ready, listening on stdio");
    server.run_stdio().await?;

    Ok(())
}
