//! Note CRUD tools

use serde_json::json;

use super::ToolDefinition;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "create_note",
            "Create a new note. Fails if the note exists unless overwrite is set.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Note name (without .md)" },
                "content": { "type": "string", "description": "Initial Markdown content" },
                "template": { "type": "string", "description": "Template to apply" },
                "overwrite": { "type": "boolean", "description": "Replace an existing note" }
            }),
        ),
        ToolDefinition::new(
            "read_note",
            "Read the full Markdown content of a note.",
            &["file"],
            json!({
                "file": { "type": "string", "description": "Note name, resolved like a wikilink" }
            }),
        ),
        ToolDefinition::new(
            "append_note",
            "Append content to the end of a note.",
            &["file", "content"],
            json!({
                "file": { "type": "string", "description": "Note name" },
                "content": { "type": "string", "description": "Markdown to append" }
            }),
        ),
        ToolDefinition::new(
            "prepend_note",
            "Insert content at the top of a note, after its frontmatter.",
            &["file", "content"],
            json!({
                "file": { "type": "string", "description": "Note name" },
                "content": { "type": "string", "description": "Markdown to prepend" }
            }),
        ),
        ToolDefinition::new(
            "delete_note",
            "Delete a note. Moves it to the trash unless permanent is set.",
            &["file"],
            json!({
                "file": { "type": "string", "description": "Note name" },
                "permanent": { "type": "boolean", "description": "Skip the trash" }
            }),
        ),
        ToolDefinition::new(
            "move_note",
            "Move a note to another folder, updating links.",
            &["file", "to"],
            json!({
                "file": { "type": "string", "description": "Note name" },
                "to": { "type": "string", "description": "Destination folder path" }
            }),
        ),
        ToolDefinition::new(
            "rename_note",
            "Rename a note, updating links.",
            &["file", "name"],
            json!({
                "file": { "type": "string", "description": "Current note name" },
                "name": { "type": "string", "description": "New note name" }
            }),
        ),
        ToolDefinition::new(
            "list_files",
            "List files in the vault, optionally limited to a folder or extension.",
            &[],
            json!({
                "folder": { "type": "string", "description": "Folder to list" },
                "ext": { "type": "string", "description": "File extension filter, e.g. md" }
            }),
        ),
        ToolDefinition::new(
            "list_folders",
            "List folders in the vault.",
            &[],
            json!({
                "folder": { "type": "string", "description": "Parent folder" }
            }),
        ),
        ToolDefinition::new(
            "read_daily_note",
            "Read today's daily note.",
            &[],
            json!({}),
        ),
        ToolDefinition::new(
            "append_daily_note",
            "Append content to today's daily note, creating it if needed.",
            &["content"],
            json!({
                "content": { "type": "string", "description": "Markdown to append" }
            }),
        ),
    ]
}
