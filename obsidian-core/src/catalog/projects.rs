//! Project tools
//!
//! A project is a folder under `Projects/` holding a `README.md` with
//! frontmatter and a `Tasks.md` checklist.

use serde_json::json;

use super::ToolDefinition;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_projects",
            "List project names (folders under Projects/).",
            &[],
            json!({}),
        ),
        ToolDefinition::new(
            "create_project",
            "Create a project folder with a README and an empty task list.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Project name" },
                "description": { "type": "string", "description": "One-paragraph summary" },
                "status": {
                    "type": "string",
                    "enum": ["active", "paused", "done"],
                    "description": "Initial status (default active)"
                }
            }),
        ),
        ToolDefinition::new(
            "get_project",
            "Read a project's README.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Project name" }
            }),
        ),
        ToolDefinition::new(
            "list_project_tasks",
            "List the tasks of a project.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Project name" }
            }),
        ),
        ToolDefinition::new(
            "add_project_task",
            "Add an open task to a project.",
            &["name", "text"],
            json!({
                "name": { "type": "string", "description": "Project name" },
                "text": { "type": "string", "description": "Task text" }
            }),
        ),
        ToolDefinition::new(
            "complete_project_task",
            "Mark the first open project task containing the given text as done.",
            &["name", "match"],
            json!({
                "name": { "type": "string", "description": "Project name" },
                "match": { "type": "string", "description": "Text the task line must contain" }
            }),
        ),
    ]
}
