//! Checklist task tools

use serde_json::json;

use super::ToolDefinition;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_tasks",
            "List checklist tasks with line numbers, optionally for one note.",
            &[],
            json!({
                "file": { "type": "string", "description": "Note name; omit for the whole vault" },
                "status": {
                    "type": "string",
                    "enum": ["todo", "done", "all"],
                    "description": "Which tasks to list (default all)"
                }
            }),
        ),
        ToolDefinition::new(
            "add_task",
            "Append an open checklist task to a note.",
            &["file", "text"],
            json!({
                "file": { "type": "string", "description": "Note name" },
                "text": { "type": "string", "description": "Task text" }
            }),
        ),
        ToolDefinition::new(
            "complete_task",
            "Mark the first open task containing the given text as done, stamping the completion time.",
            &["path", "match"],
            json!({
                "path": { "type": "string", "description": "Vault-relative path of the note, e.g. Inbox.md" },
                "match": { "type": "string", "description": "Text the task line must contain" },
                "marker": { "type": "string", "description": "Open-task prefix (default \"- [ ]\"); leading indentation is ignored" }
            }),
        ),
    ]
}
