//! Process runners
//!
//! The single choke point for external-process interaction:
//!
//! - `CliRunner`: spawns the Obsidian CLI with `tokio::process`
//! - `MockRunner`: records argument vectors and replays canned outcomes
//!
//! Both share `classify_exit`, so trimming and diagnostic precedence are
//! identical whether a process really ran or not.

mod cli;
mod mock;

pub use cli::CliRunner;
pub use mock::MockRunner;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ToolError, ToolResult};
use crate::VAULT_KEY;

/// Default wall-clock budget per invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Ceiling on captured bytes per output stream (10 MiB)
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Message used when a failed process printed nothing
pub const FALLBACK_FAILURE_MESSAGE: &str = "Command failed";

/// Per-invocation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Wall-clock timeout
    pub timeout: Duration,
    /// Vault to target, appended as the final argument
    pub vault: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            vault: None,
        }
    }
}

impl RunOptions {
    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the vault; blank names count as unset
    pub fn with_vault(mut self, vault: Option<String>) -> Self {
        self.vault = vault.filter(|v| !v.trim().is_empty());
        self
    }

    /// Options for one call: an explicit override beats the configured
    /// default, which beats no vault at all.
    pub fn resolve(&self, vault_override: Option<&str>) -> Self {
        let vault = vault_override
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.vault.clone());
        Self {
            timeout: self.timeout,
            vault,
        }
    }

    /// Append the vault token, if any, after all other arguments
    pub fn apply_vault(&self, args: &mut Vec<String>) {
        if let Some(vault) = self.vault.as_deref().filter(|v| !v.is_empty()) {
            args.push(format!("{VAULT_KEY}={vault}"));
        }
    }
}

/// Raw outcome of a process that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status; `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Turn a completed process into trimmed stdout or `NonZeroExit`.
///
/// The failure message is trimmed stderr if non-empty, else trimmed stdout
/// if non-empty, else `"Command failed"`.
pub fn classify_exit(output: ProcessOutput) -> ToolResult<String> {
    if output.exit_code == Some(0) {
        return Ok(output.stdout.trim().to_string());
    }

    let stderr = output.stderr.trim();
    let stdout = output.stdout.trim();
    let message = if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        FALLBACK_FAILURE_MESSAGE.to_string()
    };

    Err(ToolError::NonZeroExit {
        message,
        exit_code: output.exit_code,
        stderr: output.stderr,
    })
}

/// Render a command line for diagnostics
pub fn display_command(binary: &str, args: &[String]) -> String {
    std::iter::once(binary)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Executes the external program
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run with `args` (subcommand first). The vault from `options` is
    /// appended by the runner, never by the caller.
    async fn run(&self, args: Vec<String>, options: &RunOptions) -> ToolResult<String>;
}
