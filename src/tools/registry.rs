//! Tool registry - validates and dispatches tool calls
//!
//! The set of tools is closed: every tool is a [`Tool`] variant and dispatch
//! is an exhaustive `match`. Names only matter at the edge, where a call
//! coming from a model is resolved to a variant or rejected.

use serde_json::{json, Value};

use crate::core::{ToolCall, ToolDefinition, ToolError, ToolResult};
use crate::tools::{guidelines, knowledge};

/// Every tool this crate knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    SearchKnowledgeBase,
    GetWritingGuidelines,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::SearchKnowledgeBase, Tool::GetWritingGuidelines];

    pub fn name(self) -> &'static str {
        match self {
            Tool::SearchKnowledgeBase => "search_knowledge_base",
            Tool::GetWritingGuidelines => "get_writing_guidelines",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Schema advertised to agents and used for argument validation
    pub fn definition(self) -> ToolDefinition {
        match self {
            Tool::SearchKnowledgeBase => ToolDefinition::function(
                self.name(),
                "Search the knowledge base for information on a topic. Returns key points, examples, and common pitfalls.",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {
                            "type": "string",
                            "description": "The topic to search (e.g., 'python asyncio', 'autogen agents', 'machine learning')"
                        }
                    },
                    "required": ["topic"]
                }),
            ),
            Tool::GetWritingGuidelines => ToolDefinition::function(
                self.name(),
                "Get writing guidelines for specific content types including structure, style, and checklists.",
                json!({
                    "type": "object",
                    "properties": {
                        "content_type": {
                            "type": "string",
                            "enum": guidelines::available_types(),
                            "description": "The type of content to get guidelines for"
                        }
                    },
                    "required": ["content_type"]
                }),
            ),
        }
    }

    /// Run the handler on already-validated arguments
    fn run(self, arguments: &Value) -> Value {
        match self {
            Tool::SearchKnowledgeBase => knowledge::search_knowledge_base(str_arg(arguments, "topic")),
            Tool::GetWritingGuidelines => {
                guidelines::get_writing_guidelines(str_arg(arguments, "content_type"))
            }
        }
    }
}

fn str_arg<'a>(arguments: &'a Value, key: &str) -> &'a str {
    arguments.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Registry of tools available to a session
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    /// Registered tools with their definitions, in registration order
    tools: Vec<(Tool, ToolDefinition)>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with the knowledge base and guideline lookups
    pub fn with_content_tools() -> Self {
        let mut registry = Self::new();
        for tool in Tool::ALL {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool; registering twice is a no-op
    pub fn register(&mut self, tool: Tool) {
        if !self.contains(tool.name()) {
            self.tools.push((tool, tool.definition()));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions of every registered tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, def)| def.clone()).collect()
    }

    fn lookup(&self, name: &str) -> Option<&(Tool, ToolDefinition)> {
        self.tools.iter().find(|(tool, _)| tool.name() == name)
    }

    /// Validate and run a tool call
    ///
    /// Business-level misses (unknown topic, unknown content type) come back
    /// as `Ok` with `success: false` in the payload.
    pub async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let (tool, definition) = self
            .lookup(&call.name)
            .ok_or_else(|| ToolError::unknown(&call.name))?;

        validate_arguments(&definition.function.parameters, &call.arguments)
            .map_err(|reason| ToolError::invalid(&call.name, reason))?;

        tracing::debug!(tool = tool.name(), call_id = %call.id, "invoking tool");
        Ok(ToolResult::success(call, tool.run(&call.arguments)))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check required fields and primitive types against a JSON object schema
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), String> {
    let args = arguments
        .as_object()
        .ok_or_else(|| format!("arguments must be a JSON object, got {}", type_name(arguments)))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(format!("missing required field '{}'", field));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (field, value) in args {
            let expected = properties
                .get(field)
                .and_then(|p| p.get("type"))
                .and_then(Value::as_str);

            if let Some(expected) = expected {
                if !matches_type(expected, value) {
                    return Err(format!(
                        "field '{}' must be {}, got {}",
                        field,
                        expected,
                        type_name(value)
                    ));
                }
            }
        }
    }

    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
