//! Tool dispatch
//!
//! Maps a validated tool call onto one CLI invocation, or onto a short
//! ordered sequence of invocations for the compound tools:
//!
//! - `complete_task` / `complete_project_task`: read → rewrite → overwrite
//! - `list_projects`: list files → group by project folder
//! - `create_project`: create README → create Tasks.md
//!
//! Multi-step tools are not transactional. If a later step fails, earlier
//! steps stay applied and the error says which step already took effect.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::args::build_args;
use crate::compound::{
    completion_stamp, group_first_segments, mark_line_done, project_readme, project_readme_content,
    project_tasks, OPEN_TASK_MARKER, PROJECTS_PREFIX,
};
use crate::error::{ToolError, ToolResult};
use crate::params::{ParamBag, ParamValue};
use crate::runner::{ProcessRunner, RunOptions};
use crate::validator::SchemaCatalog;
use crate::VAULT_KEY;

/// A single CLI call: subcommand plus its parameters, in argument order
struct Invocation {
    command: &'static str,
    params: ParamBag,
}

impl Invocation {
    fn new(command: &'static str) -> Self {
        Self {
            command,
            params: ParamBag::new(),
        }
    }

    /// Copy `keys` from the caller's bag, in the order given
    fn copy(mut self, source: &ParamBag, keys: &[&str]) -> Self {
        for key in keys {
            if let Some(value) = source.get(key) {
                self.params.insert(*key, value.clone());
            }
        }
        self
    }

    fn set(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Fixed bare flag, independent of caller input
    fn flag(self, key: &str) -> Self {
        self.set(key, true)
    }
}

/// Routes tool calls to the CLI
pub struct Dispatcher {
    catalog: SchemaCatalog,
    runner: Arc<dyn ProcessRunner>,
    defaults: RunOptions,
}

impl Dispatcher {
    /// Create a dispatcher. `defaults` carries the configured timeout and
    /// default vault.
    pub fn new(catalog: SchemaCatalog, runner: Arc<dyn ProcessRunner>, defaults: RunOptions) -> Self {
        Self {
            catalog,
            runner,
            defaults,
        }
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &RunOptions {
        &self.defaults
    }

    /// Validate and execute a tool call, returning the CLI's text output
    pub async fn invoke(&self, tool: &str, params: &ParamBag) -> ToolResult<String> {
        self.catalog.validate(tool, params)?;
        let options = self.defaults.resolve(params.get_str(VAULT_KEY));
        debug!(tool, vault = ?options.vault, "invoking tool");

        match tool {
            "complete_task" => {
                let path = required(params, tool, "path")?;
                let marker = params.get_str("marker").unwrap_or(OPEN_TASK_MARKER);
                self.complete_task(path, required(params, tool, "match")?, marker, &options)
                    .await
            }
            "complete_project_task" => {
                let path = project_tasks(project_name(params, tool)?);
                self.complete_task(&path, required(params, tool, "match")?, OPEN_TASK_MARKER, &options)
                    .await
            }
            "list_projects" => self.list_projects(&options).await,
            "create_project" => self.create_project(params, &options).await,
            _ => {
                let invocation = plan(tool, params)?;
                self.execute(invocation, &options).await
            }
        }
    }

    async fn execute(&self, invocation: Invocation, options: &RunOptions) -> ToolResult<String> {
        let args = build_args(invocation.command, &invocation.params);
        debug!(?args, "built arguments");
        self.runner.run(args, options).await
    }

    /// Read a note, mark the first matching open task done, write it back
    async fn complete_task(
        &self,
        path: &str,
        needle: &str,
        marker: &str,
        options: &RunOptions,
    ) -> ToolResult<String> {
        let current = self
            .execute(Invocation::new("read").set("path", path), options)
            .await?;

        let updated = mark_line_done(&current, marker, needle, &completion_stamp()).ok_or_else(|| {
            ToolError::NotFound {
                what: format!("open task matching '{needle}' in {path}"),
            }
        })?;

        self.execute(
            Invocation::new("create")
                .set("path", path)
                .set("content", updated)
                .flag("overwrite")
                .flag("silent"),
            options,
        )
        .await?;

        Ok(format!("Completed task matching '{needle}' in {path}"))
    }

    /// Project names, one per line, from the folder listing
    async fn list_projects(&self, options: &RunOptions) -> ToolResult<String> {
        let folder = PROJECTS_PREFIX.trim_end_matches('/');
        let listing = self
            .execute(Invocation::new("files").set("folder", folder), options)
            .await?;

        Ok(group_first_segments(&listing, PROJECTS_PREFIX).join("\n"))
    }

    /// Create README then an empty task list. The README is not removed if
    /// the second step fails.
    async fn create_project(&self, params: &ParamBag, options: &RunOptions) -> ToolResult<String> {
        let name = project_name(params, "create_project")?;
        let status = params.get_str("status").unwrap_or("active");
        let created = Local::now().format("%Y-%m-%d").to_string();
        let readme = project_readme(name);
        let tasks = project_tasks(name);

        let content = project_readme_content(name, status, params.get_str("description"), &created);
        self.execute(
            Invocation::new("create")
                .set("path", readme.as_str())
                .set("content", content)
                .flag("silent"),
            options,
        )
        .await?;

        let second = self
            .execute(
                Invocation::new("create")
                    .set("path", tasks.as_str())
                    .set("content", "")
                    .flag("silent"),
                options,
            )
            .await;

        if let Err(source) = second {
            warn!(project = name, error = %source, "task list creation failed after README was created");
            return Err(ToolError::PartialFailure {
                completed: format!("Created {readme}"),
                source: Box::new(source),
            });
        }

        Ok(format!("Created project '{name}' ({readme}, {tasks})"))
    }
}

/// Required string parameter; validation has already rejected blanks
fn required<'a>(params: &'a ParamBag, tool: &str, name: &str) -> ToolResult<&'a str> {
    params.get_str(name).ok_or_else(|| ToolError::MissingRequired {
        tool: tool.to_string(),
        param: name.to_string(),
    })
}

/// Project name as used in paths; surrounding whitespace is not part of it
fn project_name<'a>(params: &'a ParamBag, tool: &str) -> ToolResult<&'a str> {
    required(params, tool, "name").map(str::trim)
}

/// Single-invocation tools
fn plan(tool: &str, p: &ParamBag) -> ToolResult<Invocation> {
    let invocation = match tool {
        // Notes
        "create_note" => Invocation::new("create")
            .copy(p, &["name", "content", "template", "overwrite"])
            .flag("silent"),
        "read_note" => Invocation::new("read").copy(p, &["file"]),
        "append_note" => Invocation::new("append").copy(p, &["file", "content"]),
        "prepend_note" => Invocation::new("prepend").copy(p, &["file", "content"]),
        "delete_note" => Invocation::new("delete").copy(p, &["file", "permanent"]),
        "move_note" => Invocation::new("move").copy(p, &["file", "to"]),
        "rename_note" => Invocation::new("rename").copy(p, &["file", "name"]),
        "list_files" => Invocation::new("files").copy(p, &["folder", "ext"]),
        "list_folders" => Invocation::new("folders").copy(p, &["folder"]),
        "read_daily_note" => Invocation::new("daily:read"),
        "append_daily_note" => Invocation::new("daily:append")
            .copy(p, &["content"])
            .flag("silent"),

        // Search
        "search_vault" => Invocation::new("search")
            .copy(p, &["query", "path", "limit"])
            .set("format", p.get_str("format").unwrap_or("json")),
        "search_with_context" => {
            Invocation::new("search:context").copy(p, &["query", "path", "limit"])
        }
        "list_tags" => Invocation::new("tags")
            .flag("all")
            .flag("counts")
            .copy(p, &["sort"]),
        "get_tag" => Invocation::new("tag").copy(p, &["name"]).flag("verbose"),
        "get_backlinks" => Invocation::new("backlinks").copy(p, &["file"]).flag("counts"),
        "get_outgoing_links" => Invocation::new("links").copy(p, &["file"]),
        "list_orphans" => Invocation::new("orphans"),
        "get_outline" => Invocation::new("outline").copy(p, &["file"]),

        // Metadata
        "list_properties" => match p.get_str("file") {
            Some(file) => Invocation::new("properties").set("file", file),
            None => Invocation::new("properties").flag("all").flag("counts"),
        },
        "read_property" => Invocation::new("property:read").copy(p, &["name", "file"]),
        "set_property" => {
            Invocation::new("property:set").copy(p, &["name", "value", "type", "file"])
        }
        "remove_property" => Invocation::new("property:remove").copy(p, &["name", "file"]),

        // Tasks
        "list_tasks" => {
            let invocation = Invocation::new("tasks").copy(p, &["file"]);
            let invocation = match p.get_str("status") {
                Some("todo") => invocation.flag("todo"),
                Some("done") => invocation.flag("done"),
                _ => invocation,
            };
            invocation.flag("verbose")
        }
        "add_task" => Invocation::new("append")
            .copy(p, &["file"])
            .set("content", task_line(required(p, tool, "text")?)),

        // Projects
        "get_project" => {
            Invocation::new("read").set("path", project_readme(project_name(p, tool)?))
        }
        "list_project_tasks" => Invocation::new("tasks")
            .set("path", project_tasks(project_name(p, tool)?))
            .flag("verbose"),
        "add_project_task" => Invocation::new("append")
            .set("path", project_tasks(project_name(p, tool)?))
            .set("content", task_line(required(p, tool, "text")?)),

        // Vaults
        "list_vaults" => Invocation::new("vaults").flag("verbose"),

        _ => {
            return Err(ToolError::UnknownTool {
                tool: tool.to_string(),
            })
        }
    };

    Ok(invocation)
}

fn task_line(text: &str) -> String {
    format!("{OPEN_TASK_MARKER} {}", text.trim())
}
