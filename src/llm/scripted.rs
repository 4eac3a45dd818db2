//! Scripted provider
//!
//! Replays pre-configured responses in order. Used by the test suite and for
//! running the pipeline without a backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::core::{ColloquyError, Result, ToolDefinition};
use crate::llm::traits::{ChatMessage, GenerateOptions, LLMProvider, LLMResponse};

/// One scripted backend behaviour
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Return this response
    Reply(LLMResponse),
    /// Fail as an unreachable backend would
    Fail(String),
    /// Never complete
    Hang,
}

/// A provider that returns pre-configured responses
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<ScriptStep>>,
    /// Response used once the script runs out
    fallback: Option<LLMResponse>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    /// Create a provider that plays `steps` and then fails
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that plays text replies in order
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            replies
                .into_iter()
                .map(|r| ScriptStep::Reply(LLMResponse::text(r)))
                .collect(),
        )
    }

    /// Create a provider that always returns the same text
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(Vec::new()).with_fallback(LLMResponse::text(reply))
    }

    /// Response returned after the script is exhausted
    pub fn with_fallback(mut self, response: LLMResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Number of times the provider was asked for a reply
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_step(&self) -> Option<ScriptStep> {
        let mut steps = self.steps.lock().unwrap_or_else(|e| e.into_inner());
        steps
            .pop_front()
            .or_else(|| self.fallback.clone().map(ScriptStep::Reply))
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(messages.to_vec());

        match self.next_step() {
            Some(ScriptStep::Reply(response)) => Ok(response),
            Some(ScriptStep::Fail(reason)) => Err(ColloquyError::backend(reason)),
            Some(ScriptStep::Hang) => std::future::pending().await,
            None => Err(ColloquyError::backend("Script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
