//! LLM module - generation backends
//!
//! Provides the provider abstraction, an OpenAI-compatible client and a
//! scripted provider for tests and offline runs.

pub mod openai;
pub mod scripted;
pub mod traits;

pub use openai::OpenAiClient;
pub use scripted::{ScriptStep, ScriptedProvider};
pub use traits::{ChatMessage, ChatRole, GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
