//! Search and link-graph tools

use serde_json::json;

use super::ToolDefinition;

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "search_vault",
            "Full-text search across the vault. Returns matching files.",
            &["query"],
            json!({
                "query": { "type": "string", "description": "Search query (Obsidian search syntax)" },
                "path": { "type": "string", "description": "Limit to a folder" },
                "limit": { "type": "integer", "description": "Maximum number of results" },
                "format": {
                    "type": "string",
                    "enum": ["text", "json"],
                    "description": "Output format (default json)"
                }
            }),
        ),
        ToolDefinition::new(
            "search_with_context",
            "Full-text search returning the matching lines around each hit.",
            &["query"],
            json!({
                "query": { "type": "string", "description": "Search query" },
                "path": { "type": "string", "description": "Limit to a folder" },
                "limit": { "type": "integer", "description": "Maximum number of results" }
            }),
        ),
        ToolDefinition::new(
            "list_tags",
            "List every tag in the vault with its usage count.",
            &[],
            json!({
                "sort": {
                    "type": "string",
                    "enum": ["count", "name"],
                    "description": "Sort order"
                }
            }),
        ),
        ToolDefinition::new(
            "get_tag",
            "Show the files that use a tag.",
            &["name"],
            json!({
                "name": { "type": "string", "description": "Tag name, with or without #" }
            }),
        ),
        ToolDefinition::new(
            "get_backlinks",
            "List notes linking to a note, with link counts.",
            &["file"],
            json!({
                "file": { "type": "string", "description": "Note name" }
            }),
        ),
        ToolDefinition::new(
            "get_outgoing_links",
            "List the links going out of a note.",
            &["file"],
            json!({
                "file": { "type": "string", "description": "Note name" }
            }),
        ),
        ToolDefinition::new(
            "list_orphans",
            "List notes with no incoming links.",
            &[],
            json!({}),
        ),
        ToolDefinition::new(
            "get_outline",
            "Show the heading outline of a note.",
            &["file"],
            json!({
                "file": { "type": "string", "description": "Note name" }
            }),
        ),
    ]
}
