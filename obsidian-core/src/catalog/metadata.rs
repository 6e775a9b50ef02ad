//! Frontmatter property tools

use serde_json::json;

use super::ToolDefinition;

/// Property types understood by Obsidian
pub const PROPERTY_TYPES: &[&str] = &["text", "list", "number", "checkbox", "date", "datetime"];

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_properties",
            "List frontmatter properties of a note, or of the whole vault with counts.",
            &[],
            json!({
                "file": { "type": "string", "description": "Note name; omit for the whole vault" }
            }),
        ),
        ToolDefinition::new(
            "read_property",
            "Read one frontmatter property.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Property name" },
                "file": { "type": "string", "description": "Note name; defaults to the active note" }
            }),
        ),
        ToolDefinition::new(
            "set_property",
            "Set a frontmatter property, creating it if needed.",
            &["name", "value"],
            json!({
                "name": { "type": "string", "description": "Property name" },
                "value": { "type": "string", "description": "Property value" },
                "type": {
                    "type": "string",
                    "enum": PROPERTY_TYPES,
                    "description": "Property type"
                },
                "file": { "type": "string", "description": "Note name; defaults to the active note" }
            }),
        ),
        ToolDefinition::new(
            "remove_property",
            "Remove a frontmatter property.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Property name" },
                "file": { "type": "string", "description": "Note name; defaults to the active note" }
            }),
        ),
    ]
}
