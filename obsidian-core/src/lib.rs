//! # Obsidian Core - tool invocation pipeline
//!
//! Turns a named tool call (`create_note`, `search_vault`, `set_property`, ...)
//! into exactly one or a short ordered sequence of Obsidian CLI invocations.
//!
//! ## Pipeline
//!
//! ```text
//!  tool name + ParamBag
//!         │
//!         ▼
//! ┌─────────────────┐   UnknownTool / MissingRequired / EmptyRequired
//! │  SchemaCatalog  │ ─ TypeMismatch / InvalidEnum  (no process spawned)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │   Dispatcher    │ ── per-tool mapping, fixed flag injections,
//! └────────┬────────┘    compound operations (compound.rs)
//!          ▼
//! ┌─────────────────┐
//! │   build_args    │ ── ["create", "name=Session 1", "silent"]
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐   Timeout / NonZeroExit / SpawnFailed
//! │ ProcessRunner   │ ── CliRunner (tokio::process) or MockRunner
//! └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use obsidian_core::{Dispatcher, MockRunner, ParamBag, RunOptions, SchemaCatalog};
//!
//! let runner = Arc::new(MockRunner::new());
//! runner.push_ok("ok\n");
//!
//! let dispatcher = Dispatcher::new(SchemaCatalog::builtin(), runner.clone(), RunOptions::default());
//! let bag = ParamBag::new().with("name", "Session 1");
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! let text = rt.block_on(dispatcher.invoke("create_note", &bag)).unwrap();
//!
//! assert_eq!(text, "ok");
//! assert_eq!(runner.calls()[0], vec!["create", "name=Session 1", "silent"]);
//! ```

pub mod args;
pub mod catalog;
pub mod compound;
pub mod dispatch;
pub mod error;
pub mod params;
pub mod runner;
pub mod validator;

pub use args::build_args;
pub use catalog::{builtin_tools, ToolDefinition};
pub use dispatch::Dispatcher;
pub use error::{ErrorCategory, ErrorResponse, ToolError, ToolResult};
pub use params::{ParamBag, ParamValue};
pub use runner::{CliRunner, MockRunner, ProcessRunner, RunOptions};
pub use validator::{ParamKind, PropertySchema, SchemaCatalog, ToolSchema};

/// Name of the external executable resolved through `PATH`
pub const DEFAULT_BINARY: &str = "obsidian";

/// Argument key used to target a vault; always the last token
pub const VAULT_KEY: &str = "vault";
