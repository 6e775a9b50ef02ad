//! Server configuration

use std::time::Duration;

use obsidian_core::{CliRunner, RunOptions, DEFAULT_BINARY};

/// Default CLI timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Executable name or path of the Obsidian CLI
    pub binary: String,
    /// Vault targeted when a call does not name one
    pub vault: Option<String>,
    /// Wall-clock limit per CLI invocation
    pub timeout_ms: u64,
}

impl ServerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Invocation defaults handed to the dispatcher
    pub fn run_options(&self) -> RunOptions {
        RunOptions::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_vault(self.vault.clone())
    }

    /// Process runner for the configured binary
    pub fn runner(&self) -> CliRunner {
        CliRunner::with_binary(self.binary.clone())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            vault: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    binary: Option<String>,
    vault: Option<String>,
    timeout_ms: Option<u64>,
}

impl ServerConfigBuilder {
    /// Set the CLI executable
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Set the default vault. Blank names leave it unset.
    pub fn vault(mut self, vault: impl Into<String>) -> Self {
        let vault = vault.into();
        self.vault = if vault.trim().is_empty() { None } else { Some(vault) };
        self
    }

    /// Set the default vault from an optional value
    pub fn maybe_vault(self, vault: Option<String>) -> Self {
        match vault {
            Some(vault) => self.vault(vault),
            None => self,
        }
    }

    /// Set the per-invocation timeout
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            binary: self
                .binary
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BINARY.to_string()),
            vault: self.vault,
            timeout_ms: self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        }
    }
}
