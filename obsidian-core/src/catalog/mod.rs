//! Tool catalog
//!
//! Declarative definitions of every tool exposed to agents. Validation,
//! `tools/list` and dispatch all key off these names.

pub mod metadata;
pub mod notes;
pub mod projects;
pub mod search;
pub mod tasks;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Define a tool whose schema takes the shared `vault` override on top
    /// of its own properties.
    pub(crate) fn new(name: &str, description: &str, required: &[&str], properties: Value) -> Self {
        let mut properties = match properties {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        properties.insert(
            "vault".to_string(),
            json!({
                "type": "string",
                "description": "Vault to target. Defaults to the server's configured vault."
            }),
        );

        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({
                "type": "object",
                "required": required,
                "properties": properties
            }),
        }
    }
}

/// Get all tool definitions
pub fn builtin_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(notes::tools());
    tools.extend(search::tools());
    tools.extend(metadata::tools());
    tools.extend(tasks::tools());
    tools.extend(projects::tools());
    tools.push(list_vaults_tool());
    tools
}

/// list_vaults tool definition
fn list_vaults_tool() -> ToolDefinition {
    ToolDefinition::new(
        "list_vaults",
        "List the vaults known to Obsidian, with their paths.",
        &[],
        json!({}),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = builtin_tools();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_every_tool_accepts_vault_override() {
        for tool in builtin_tools() {
            assert_eq!(
                tool.input_schema["properties"]["vault"]["type"], "string",
                "{} lacks vault property",
                tool.name
            );
        }
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for tool in builtin_tools() {
            let schema = &tool.input_schema;
            for req in schema["required"].as_array().unwrap() {
                let name = req.as_str().unwrap();
                assert!(
                    schema["properties"].get(name).is_some(),
                    "{}: required '{}' not in properties",
                    tool.name,
                    name
                );
            }
        }
    }

    #[test]
    fn test_definition_serializes_with_input_schema_key() {
        let json = serde_json::to_value(list_vaults_tool()).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }
}
