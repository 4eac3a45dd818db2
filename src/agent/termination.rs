//! Termination detection
//!
//! A session stops as soon as an appended message carries one of the
//! completion signals.

use serde::{Deserialize, Serialize};

use crate::core::Message;

/// Signals used by the content team
pub const DEFAULT_SIGNALS: [&str; 3] = [
    "TASK_COMPLETE",
    "APPROVED - CONTENT MEETS QUALITY STANDARDS",
    "WORKFLOW COMPLETE",
];

/// How a signal has to appear in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Anywhere in the content, ignoring case
    #[default]
    Substring,
    /// The trimmed content must be the signal itself, ignoring case
    WholeMessage,
}

#[derive(Debug, Clone)]
pub struct TerminationDetector {
    /// Lowercased signals, checked in order
    signals: Vec<String>,
    mode: MatchMode,
}

impl TerminationDetector {
    pub fn new<I, S>(signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            signals: signals
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            mode: MatchMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// First signal found in the message, lowercased
    pub fn matching_signal(&self, message: &Message) -> Option<&str> {
        let content = message.content.to_lowercase();
        let content = content.trim();

        self.signals
            .iter()
            .find(|signal| match self.mode {
                MatchMode::Substring => content.contains(signal.as_str()),
                MatchMode::WholeMessage => content == signal.as_str(),
            })
            .map(String::as_str)
    }

    pub fn is_terminal(&self, message: &Message) -> bool {
        self.matching_signal(message).is_some()
    }
}

impl Default for TerminationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNALS)
    }
}
