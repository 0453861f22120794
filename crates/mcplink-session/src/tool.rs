//! Tool descriptors, call requests and call results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MCP tool definition discovered from the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input schema (JSON Schema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

/// Raw result of a tool call, exactly as the endpoint returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolResult(Value);

impl ToolResult {
    /// Wrap an endpoint payload
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Whether the endpoint flagged this result as an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.0
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Borrow the payload
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the payload
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// One entry of a batch call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool name
    #[serde(alias = "tool")]
    pub name: String,
    /// Arguments forwarded unchanged
    #[serde(default, alias = "args")]
    pub arguments: Map<String, Value>,
}

impl ToolRequest {
    /// Build a request
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome of one batch entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchResult {
    /// The call returned a result
    Success {
        /// Tool name
        tool: String,
        /// Endpoint payload
        result: ToolResult,
    },
    /// The call failed locally or at the endpoint
    Failure {
        /// Tool name
        tool: String,
        /// Error message
        error: String,
    },
}

impl BatchResult {
    /// Tool this entry belongs to
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::Success { tool, .. } | Self::Failure { tool, .. } => tool,
        }
    }

    /// Whether the call produced a result
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_error_reads_flag_only() {
        assert!(ToolResult::new(json!({"content": [], "isError": true})).is_error());
        assert!(!ToolResult::new(json!({"content": []})).is_error());
        assert!(!ToolResult::new(json!("plain")).is_error());
    }

    #[test]
    fn request_accepts_short_aliases() {
        let req: ToolRequest =
            serde_json::from_value(json!({"tool": "Topic", "args": {"topic": "bitcoin"}}))
                .unwrap();
        assert_eq!(req.name, "Topic");
        assert_eq!(req.arguments.get("topic"), Some(&json!("bitcoin")));

        let bare: ToolRequest = serde_json::from_value(json!({"name": "List"})).unwrap();
        assert!(bare.arguments.is_empty());
    }

    #[test]
    fn batch_result_shapes() {
        let ok = BatchResult::Success {
            tool: "A".into(),
            result: ToolResult::new(json!({"content": []})),
        };
        let failed = BatchResult::Failure {
            tool: "B".into(),
            error: "boom".into(),
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"tool": "A", "result": {"content": []}})
        );
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"tool": "B", "error": "boom"})
        );
    }

    #[test]
    fn definition_uses_camel_case() {
        let def: ToolDefinition = serde_json::from_value(json!({
            "name": "Topic",
            "inputSchema": {"type": "object"}
        }))
        .unwrap();
        assert_eq!(def.input_schema, Some(json!({"type": "object"})));
        assert_eq!(def.description, None);
    }
}
