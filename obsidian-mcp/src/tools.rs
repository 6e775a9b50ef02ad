//! MCP tool call handling

use obsidian_core::{ParamBag, ToolError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{McpError, McpResult};
use crate::server::McpServer;

/// Tool call request
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Parse `tools/call` params. The name must be a non-empty string and
    /// `arguments`, when present, a JSON object.
    pub fn from_params(params: Value) -> McpResult<Self> {
        if !params.is_object() {
            return Err(McpError::InvalidParams(
                "tools/call params must be an object".to_string(),
            ));
        }

        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if call.name.trim().is_empty() {
            return Err(McpError::InvalidParams("missing tool name".to_string()));
        }
        if !(call.arguments.is_null() || call.arguments.is_object()) {
            return Err(McpError::InvalidParams(format!(
                "arguments for '{}' must be an object",
                call.name
            )));
        }

        Ok(call)
    }
}

/// Tool call response
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    /// Successful result carrying CLI output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    /// Failed result; the caller sees `Error: <message>`
    pub fn error(err: &ToolError) -> Self {
        let mut result = Self::text(format!("Error: {err}"));
        result.is_error = true;
        result
    }

    /// The text of the first content block
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| c.text.as_str())
    }
}

impl McpServer {
    /// Handle a tool call
    pub async fn handle_tool_call(&self, call: ToolCall) -> ToolResult {
        let params = ParamBag::from_json(&call.arguments);
        debug!(tool = %call.name, params = params.len(), "tool call");

        match self.dispatcher().invoke(&call.name, &params).await {
            Ok(output) => ToolResult::text(output),
            Err(err) => {
                info!(tool = %call.name, code = err.error_code(), error = %err, "tool call failed");
                ToolResult::error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_params() {
        let call = ToolCall::from_params(json!({
            "name": "read_note",
            "arguments": { "file": "Inbox" }
        }))
        .unwrap();
        assert_eq!(call.name, "read_note");
        assert_eq!(call.arguments["file"], "Inbox");
    }

    #[test]
    fn test_arguments_may_be_omitted() {
        let call = ToolCall::from_params(json!({ "name": "list_vaults" })).unwrap();
        assert!(call.arguments.is_null());
    }

    #[test]
    fn test_malformed_params() {
        for params in [
            json!(null),
            json!("read_note"),
            json!({}),
            json!({ "name": 42 }),
            json!({ "name": "" }),
            json!({ "name": "read_note", "arguments": [1, 2] }),
        ] {
            let err = ToolCall::from_params(params.clone()).unwrap_err();
            assert_eq!(err.error_code(), -32602, "{params}");
        }
    }

    #[test]
    fn test_error_result_shape() {
        let err = ToolError::NotFound {
            what: "open task matching 'x' in Inbox.md".to_string(),
        };
        let value = serde_json::to_value(ToolResult::error(&err)).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{
                    "type": "text",
                    "text": "Error: Not found: open task matching 'x' in Inbox.md"
                }],
                "isError": true
            })
        );
    }
}
