//! Shared types used across Colloquy modules
//!
//! Contains the conversation message, tool call and tool definition structures.

use serde::{Deserialize, Serialize};

use crate::core::error::{ToolError, ToolErrorKind};

/// A message in the shared group conversation
///
/// A message is either a conversational turn (optionally carrying one tool
/// call) or a tool result authored by the controller. The constructors are the
/// only way the crate builds messages, so both optional fields are never set
/// together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Name of the participant that produced the message
    pub sender: String,
    /// Text content (may be empty for a pure tool call)
    pub content: String,
    /// Tool invocation requested by the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Result of a completed tool invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl Message {
    /// Create a plain conversational message
    pub fn text(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            tool_call: None,
            tool_result: None,
        }
    }

    /// Create a message that requests a tool invocation
    pub fn with_tool_call(
        sender: impl Into<String>,
        content: impl Into<String>,
        call: ToolCall,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            tool_call: Some(call),
            tool_result: None,
        }
    }

    /// Create a tool-result message; the content is the JSON rendering of the result
    pub fn tool_result(sender: impl Into<String>, result: ToolResult) -> Self {
        Self {
            sender: sender.into(),
            content: result.render(),
            tool_call: None,
            tool_result: Some(result),
        }
    }

    pub fn is_tool_call(&self) -> bool {
        self.tool_call.is_some()
    }

    pub fn is_tool_result(&self) -> bool {
        self.tool_result.is_some()
    }
}

/// A tool call made by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier pairing the call with its result
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call with a fresh id
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: format!("call_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            arguments,
        }
    }

    /// Create a tool call with an id assigned by the backend
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Definition of a tool advertised to an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Result of a tool dispatch, as recorded in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers
    pub call_id: String,
    /// Name of the tool that was requested
    pub tool_name: String,
    /// Handler payload, or an error object when dispatch failed
    pub data: serde_json::Value,
    /// Set when the registry refused the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolErrorKind>,
}

impl ToolResult {
    /// Wrap a handler payload
    pub fn success(call: &ToolCall, data: serde_json::Value) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            data,
            error: None,
        }
    }

    /// Record a refused dispatch
    pub fn from_error(call: &ToolCall, error: &ToolError) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            data: serde_json::json!({
                "error": error.to_string(),
                "kind": error.kind(),
            }),
            error: Some(error.kind()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text form placed in the message content
    pub fn render(&self) -> String {
        serde_json::to_string(&self.data).unwrap_or_else(|_| self.data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_constructors_keep_fields_exclusive() {
        let call = ToolCall::new("search_knowledge_base", json!({"topic": "docker"}));
        let asking = Message::with_tool_call("Researcher", "", call.clone());
        assert!(asking.is_tool_call());
        assert!(!asking.is_tool_result());

        let answer = Message::tool_result("Admin", ToolResult::success(&call, json!({"success": true})));
        assert!(answer.is_tool_result());
        assert!(!answer.is_tool_call());
        assert_eq!(answer.content, r#"{"success":true}"#);
        assert_eq!(answer.tool_result.unwrap().call_id, call.id);
    }

    #[test]
    fn test_tool_call_ids_are_unique() {
        let a = ToolCall::new("x", json!({}));
        let b = ToolCall::new("x", json!({}));
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("call_"));
    }

    #[test]
    fn test_error_result() {
        let call = ToolCall::new("summon_dragon", json!({}));
        let result = ToolResult::from_error(&call, &ToolError::unknown("summon_dragon"));
        assert!(result.is_error());
        assert_eq!(result.data["kind"], "unknown_tool");
    }

    #[test]
    fn test_definition_serialization() {
        let def = ToolDefinition::function("lookup", "Look things up", json!({"type": "object"}));
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "lookup");
        assert_eq!(def.name(), "lookup");
    }
}
