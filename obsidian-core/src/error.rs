//! Error types for tool invocation
//!
//! Every failure in the pipeline is a value. The taxonomy splits into:
//! - validation failures, raised before any process is spawned
//! - process failures, carrying the CLI's own diagnostics verbatim
//! - compound-operation failures (`NotFound`, `PartialFailure`)
//!
//! Each variant has a stable error code for clients and log aggregation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tool invocation
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller input rejected before execution
    Validation,
    /// A compound operation could not find its target record
    NotFound,
    /// The external program failed, timed out or could not start
    Process,
}

/// Errors that can occur while invoking a tool
#[derive(Error, Debug)]
pub enum ToolError {
    // ═══════════════════════════════════════════════════════════════════════
    // Validation errors (no process spawned)
    // ═══════════════════════════════════════════════════════════════════════

    /// Tool name is not in the catalog
    #[error("Unknown tool: '{tool}'")]
    UnknownTool { tool: String },

    /// Required parameter is absent or null
    #[error("Missing required parameter '{param}' for tool '{tool}'")]
    MissingRequired { tool: String, param: String },

    /// Required string parameter is blank
    #[error("Required parameter '{param}' for tool '{tool}' must not be empty")]
    EmptyRequired { tool: String, param: String },

    /// Parameter value has the wrong runtime type
    #[error("Parameter '{param}' must be of type {expected}, got {actual}")]
    TypeMismatch {
        param: String,
        expected: String,
        actual: String,
    },

    /// Parameter value is outside its declared value set
    #[error("Parameter '{param}' must be one of [{}], got '{value}'", .allowed.join(", "))]
    InvalidEnum {
        param: String,
        allowed: Vec<String>,
        value: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Process errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Process exceeded its wall-clock budget and was killed
    #[error("Command timed out after {timeout_ms}ms: {command}")]
    Timeout { timeout_ms: u64, command: String },

    /// Process ran and reported failure
    #[error("{message}")]
    NonZeroExit {
        message: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Process could not be started at all
    #[error("Failed to start '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Compound operation errors
    // ═══════════════════════════════════════════════════════════════════════

    /// A search step inside a compound operation found nothing
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// A later step failed after an earlier one already took effect
    #[error("{completed} succeeded, but the next step failed: {source}")]
    PartialFailure {
        completed: String,
        #[source]
        source: Box<ToolError>,
    },
}

impl ToolError {
    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::UnknownTool { .. }
            | ToolError::MissingRequired { .. }
            | ToolError::EmptyRequired { .. }
            | ToolError::TypeMismatch { .. }
            | ToolError::InvalidEnum { .. } => ErrorCategory::Validation,

            ToolError::NotFound { .. } => ErrorCategory::NotFound,

            ToolError::Timeout { .. }
            | ToolError::NonZeroExit { .. }
            | ToolError::SpawnFailed { .. } => ErrorCategory::Process,

            ToolError::PartialFailure { source, .. } => source.category(),
        }
    }

    /// Returns true if the error was raised before any process was spawned
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::UnknownTool { .. } => "UNKNOWN_TOOL",
            ToolError::MissingRequired { .. } => "MISSING_REQUIRED",
            ToolError::EmptyRequired { .. } => "EMPTY_REQUIRED",
            ToolError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ToolError::InvalidEnum { .. } => "INVALID_ENUM",
            ToolError::Timeout { .. } => "TIMEOUT",
            ToolError::NonZeroExit { .. } => "NON_ZERO_EXIT",
            ToolError::SpawnFailed { .. } => "SPAWN_FAILED",
            ToolError::NotFound { .. } => "NOT_FOUND",
            ToolError::PartialFailure { .. } => "PARTIAL_FAILURE",
        }
    }

    /// Exit status of the failed process, when there was one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ToolError::NonZeroExit { exit_code, .. } => *exit_code,
            ToolError::PartialFailure { source, .. } => source.exit_code(),
            _ => None,
        }
    }

    /// Converts this error to a JSON-serializable response object
    ///
    /// ```json
    /// {
    ///   "error": {
    ///     "code": "NON_ZERO_EXIT",
    ///     "message": "Vault not found",
    ///     "category": "process",
    ///     "exit_code": 1
    ///   }
    /// }
    /// ```
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                exit_code: self.exit_code(),
            },
        }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "MISSING_REQUIRED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
    /// Exit status of the external program, if it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}
