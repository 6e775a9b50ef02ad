//! Obsidian CLI runner

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{classify_exit, display_command, ProcessOutput, ProcessRunner, RunOptions, MAX_OUTPUT_BYTES};
use crate::error::{ToolError, ToolResult};
use crate::DEFAULT_BINARY;

/// Runs the CLI as a child process.
///
/// Arguments are passed as a vector straight to the executable; no shell is
/// involved, so no token is ever subject to expansion.
#[derive(Debug, Clone)]
pub struct CliRunner {
    binary: String,
    max_output: usize,
}

impl CliRunner {
    /// Runner for the default `obsidian` executable
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    /// Runner for another executable name or path
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            max_output: MAX_OUTPUT_BYTES,
        }
    }

    /// Override the per-stream capture ceiling
    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for CliRunner {
    async fn run(&self, mut args: Vec<String>, options: &RunOptions) -> ToolResult<String> {
        options.apply_vault(&mut args);
        let command_line = display_command(&self.binary, &args);
        debug!(command = %command_line, "running CLI");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolError::SpawnFailed {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = self.max_output;

        let collect = async {
            let (out, err, status) = tokio::join!(
                read_capped(stdout, cap),
                read_capped(stderr, cap),
                child.wait()
            );
            (out, err, status)
        };

        let finished = tokio::time::timeout(options.timeout, collect).await;
        match finished {
            Ok(((out, _), (err, _), status)) => {
                let status = status.map_err(|e| ToolError::SpawnFailed {
                    command: command_line.clone(),
                    reason: e.to_string(),
                })?;
                let output = ProcessOutput {
                    exit_code: status.code(),
                    stdout: String::from_utf8_lossy(&out).into_owned(),
                    stderr: String::from_utf8_lossy(&err).into_owned(),
                };
                debug!(exit_code = ?output.exit_code, "CLI finished");
                classify_exit(output)
            }
            Err(_) => {
                let _ = child.kill().await;
                let timeout_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(command = %command_line, timeout_ms, "CLI timed out, killed");
                Err(ToolError::Timeout {
                    timeout_ms,
                    command: command_line,
                })
            }
        }
    }
}

/// Read a stream to EOF, keeping at most `cap` bytes. The rest is drained
/// and dropped so the child never blocks on a full pipe.
/// Returns the kept bytes and the count of bytes dropped past the cap.
async fn read_capped<R: AsyncRead + Unpin>(reader: Option<R>, cap: usize) -> (Vec<u8>, usize) {
    let Some(mut reader) = reader else {
        return (Vec::new(), 0);
    };

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let room = cap.saturating_sub(kept.len());
                let take = n.min(room);
                kept.extend_from_slice(&chunk[..take]);
                dropped += n - take;
            }
            Err(e) => {
                debug!(error = %e, "CLI output stream read failed");
                break;
            }
        }
    }

    if dropped > 0 {
        warn!(bytes = cap, dropped, "CLI output truncated");
    }
    (kept, dropped)
}
