//! Conversational agents
//!
//! An agent is immutable for the life of a session. It turns the shared
//! history into a prompt from its own point of view and asks its backend for
//! the next message.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::core::{ColloquyError, Message, Result, ToolDefinition};
use crate::llm::{ChatMessage, GenerateOptions, LLMProvider};

/// Backend capability bound to an agent at construction time
#[derive(Clone)]
pub struct ModelBinding {
    provider: Arc<dyn LLMProvider>,
    model: String,
    options: GenerateOptions,
}

impl ModelBinding {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Where an agent's replies come from
#[derive(Clone)]
enum ReplySource {
    Model(ModelBinding),
    /// Fixed reply, used by the controller
    AutoReply(String),
}

/// A named participant in the group conversation
#[derive(Clone)]
pub struct Agent {
    name: String,
    role_prompt: String,
    tool_schemas: Vec<ToolDefinition>,
    /// None means uncapped
    max_consecutive_auto_replies: Option<usize>,
    accepts_human_input: bool,
    source: ReplySource,
}

/// Builder for model-backed agents
pub struct AgentBuilder {
    name: String,
    role_prompt: Option<String>,
    tool_schemas: Vec<ToolDefinition>,
    max_consecutive_auto_replies: Option<usize>,
    binding: Option<ModelBinding>,
}

impl AgentBuilder {
    /// Create a new builder with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_prompt: None,
            tool_schemas: Vec::new(),
            max_consecutive_auto_replies: None,
            binding: None,
        }
    }

    /// Set the role prompt
    pub fn role_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.role_prompt = Some(prompt.into());
        self
    }

    /// Tools this agent may call
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tool_schemas = tools;
        self
    }

    /// Cap on turns in a row without another speaker in between
    pub fn max_consecutive_auto_replies(mut self, max: usize) -> Self {
        self.max_consecutive_auto_replies = Some(max);
        self
    }

    /// Backend used to generate replies
    pub fn model(mut self, binding: ModelBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<Agent> {
        if self.name.trim().is_empty() {
            return Err(ColloquyError::config("Agent name must not be empty"));
        }

        let binding = self.binding.ok_or_else(|| {
            ColloquyError::config(format!("Agent '{}' has no model binding", self.name))
        })?;

        Ok(Agent {
            role_prompt: self.role_prompt.unwrap_or_else(|| {
                format!("You are a helpful agent named '{}'.", self.name)
            }),
            name: self.name,
            tool_schemas: self.tool_schemas,
            max_consecutive_auto_replies: self.max_consecutive_auto_replies,
            accepts_human_input: false,
            source: ReplySource::Model(binding),
        })
    }
}

impl Agent {
    /// Create a builder for a model-backed agent
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    /// Create the controller: uncapped, never blocks for input, and answers
    /// with a fixed nudge when asked to speak.
    pub fn controller(
        name: impl Into<String>,
        description: impl Into<String>,
        auto_reply: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role_prompt: description.into(),
            tool_schemas: Vec::new(),
            max_consecutive_auto_replies: None,
            accepts_human_input: false,
            source: ReplySource::AutoReply(auto_reply.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role_prompt(&self) -> &str {
        &self.role_prompt
    }

    pub fn tool_schemas(&self) -> &[ToolDefinition] {
        &self.tool_schemas
    }

    pub fn max_consecutive_auto_replies(&self) -> Option<usize> {
        self.max_consecutive_auto_replies
    }

    pub fn accepts_human_input(&self) -> bool {
        self.accepts_human_input
    }

    /// Model identifier, if the agent is model-backed
    pub fn model(&self) -> Option<&str> {
        match &self.source {
            ReplySource::Model(binding) => Some(binding.model()),
            ReplySource::AutoReply(_) => None,
        }
    }

    /// Produce this agent's next message for the given history
    ///
    /// Backend failures surface as [`ColloquyError::Generation`]; no partial
    /// message is ever returned.
    pub async fn generate_reply(&self, history: &[Message]) -> Result<Message> {
        let binding = match &self.source {
            ReplySource::AutoReply(text) => return Ok(Message::text(&self.name, text.clone())),
            ReplySource::Model(binding) => binding,
        };

        let prompt = self.build_prompt(history);
        let response = binding
            .provider
            .chat(
                &binding.model,
                &prompt,
                &self.tool_schemas,
                Some(binding.options.clone()),
            )
            .await
            .map_err(|e| ColloquyError::generation(&self.name, e.to_string()))?;

        let mut calls = response.tool_calls.into_iter();
        match calls.next() {
            Some(call) => {
                let dropped = calls.count();
                if dropped > 0 {
                    tracing::warn!(agent = %self.name, dropped, "keeping only the first tool call");
                }
                Ok(Message::with_tool_call(&self.name, response.content, call))
            }
            None => Ok(Message::text(&self.name, response.content)),
        }
    }

    /// Render the shared history as a prompt seen from this agent
    ///
    /// Own turns become assistant messages, results of own tool calls become
    /// tool messages, everything else is a user message prefixed with its
    /// sender.
    pub fn build_prompt(&self, history: &[Message]) -> Vec<ChatMessage> {
        let mut prompt = Vec::with_capacity(history.len() + 1);
        prompt.push(ChatMessage::system(&self.role_prompt));

        let mut own_calls: HashSet<&str> = HashSet::new();

        for msg in history {
            if let Some(ref result) = msg.tool_result {
                if own_calls.contains(result.call_id.as_str()) {
                    prompt.push(ChatMessage::tool(&result.call_id, &msg.content));
                } else {
                    prompt.push(ChatMessage::user(format!(
                        "{} (result of {}): {}",
                        msg.sender, result.tool_name, msg.content
                    )));
                }
                continue;
            }

            if msg.sender == self.name {
                match msg.tool_call {
                    Some(ref call) => {
                        own_calls.insert(call.id.as_str());
                        prompt.push(ChatMessage::assistant_tool_call(&msg.content, call.clone()));
                    }
                    None => prompt.push(ChatMessage::assistant(&msg.content)),
                }
                continue;
            }

            let mut content = format!("{}: {}", msg.sender, msg.content);
            if let Some(ref call) = msg.tool_call {
                content.push_str(&format!("\n[called {} with {}]", call.name, call.arguments));
            }
            prompt.push(ChatMessage::user(content));
        }

        prompt
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("tools", &self.tool_schemas.len())
            .field("max_consecutive_auto_replies", &self.max_consecutive_auto_replies)
            .field("model", &self.model())
            .finish()
    }
}
