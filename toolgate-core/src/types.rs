//! Wire and conversation types shared across the pipeline
//!
//! These types abstract over the model provider API and the gateway wire
//! format so the agent loop, transport client, and gateway dispatcher all
//! speak the same vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Delimiter separating a gateway registration prefix from the tool name.
///
/// Raw tool identifiers arriving at the gateway look like
/// `orderLambdaTarget___get_order_tool`. The resolved tool name is
/// everything after the first occurrence of this marker; identifiers
/// without the marker are already plain tool names (direct invocation).
pub const TOOL_NAME_DELIMITER: &str = "___";

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// Create a new assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// Create a user message carrying tool results
    pub fn tool_results(results: Vec<ToolResultBlock>) -> Self {
        Self {
            role: Role::User,
            content: results.into_iter().map(ContentBlock::ToolResult).collect(),
        }
    }

    /// Get all text content concatenated
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ContentBlock::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Get all tool use blocks
    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.content
            .iter()
            .filter_map(|c| match c {
                ContentBlock::ToolUse(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

/// Content block within a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text(String),
    /// Tool use request from the assistant
    ToolUse(ToolUseBlock),
    /// Tool result fed back to the model
    ToolResult(ToolResultBlock),
}

/// A tool use request from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUseBlock {
    /// Unique ID for this tool use (used to match with its result)
    pub id: String,
    /// Tool name as the model saw it
    pub name: String,
    /// Tool input parameters as JSON
    pub input: Value,
}

/// Result of a tool execution, fed back into the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultBlock {
    /// ID of the tool use this is a result for
    pub tool_use_id: String,
    /// Result payload
    pub content: Value,
    /// Whether the tool execution succeeded
    pub status: ToolResultStatus,
}

/// Status of a tool result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
}

/// A tool exposed by the gateway: name, description, and input schema.
///
/// Immutable once registered. The agent references discovered descriptors
/// but never owns or mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// An inbound tool invocation as the gateway dispatcher sees it.
///
/// `raw_tool_id` may carry a registration prefix before
/// [`TOOL_NAME_DELIMITER`]; resolution strips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub raw_tool_id: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocationRequest {
    pub fn new(raw_tool_id: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            raw_tool_id: raw_tool_id.into(),
            arguments,
        }
    }
}

/// The normalized response envelope produced by exactly one handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub status_code: u16,
    pub body: Value,
}

impl ToolInvocationResult {
    /// True when the handler reported success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// Model wants to use a tool
    ToolUse,
    /// Hit max token limit
    MaxTokens,
    /// Stop sequence encountered
    StopSequence,
    /// Unknown/other reason
    #[default]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::User), "user");
        assert_eq!(format!("{}", Role::Assistant), "assistant");
    }

    #[test]
    fn test_message_text_concatenation() {
        let message = Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::Text("Hello ".to_string()),
                ContentBlock::ToolUse(ToolUseBlock {
                    id: "t1".to_string(),
                    name: "get_order_tool".to_string(),
                    input: json!({"orderId": "123"}),
                }),
                ContentBlock::Text("world".to_string()),
            ],
        };

        assert_eq!(message.text(), "Hello world");
        assert_eq!(message.tool_uses().len(), 1);
        assert_eq!(message.tool_uses()[0].name, "get_order_tool");
    }

    #[test]
    fn test_tool_results_message_role() {
        let message = Message::tool_results(vec![ToolResultBlock {
            tool_use_id: "t1".to_string(),
            content: json!({"ok": true}),
            status: ToolResultStatus::Success,
        }]);

        assert_eq!(message.role, Role::User);
        assert_eq!(message.content.len(), 1);
    }

    #[test]
    fn test_invocation_result_success_range() {
        let ok = ToolInvocationResult {
            status_code: 200,
            body: json!({}),
        };
        let err = ToolInvocationResult {
            status_code: 400,
            body: json!({"error": "Unknown tool: x"}),
        };

        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let descriptor = ToolDescriptor {
            name: "get_order_tool".to_string(),
            description: "Fetch an order".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"orderId": {"type": "string"}},
                "required": ["orderId"]
            }),
        };

        let encoded = serde_json::to_string(&descriptor).unwrap();
        let decoded: ToolDescriptor = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, descriptor);
    }
}
