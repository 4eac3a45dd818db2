//! Session state management
//!
//! Tracks a running group chat: the history, rounds used, and how the
//! session ended.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::agent::conversation::Conversation;
use crate::core::Message;

/// Lifecycle of a session; every state but `Running` is final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Running,
    TerminatedBySignal,
    TerminatedByRoundLimit,
    TerminatedByFailure,
}

impl SessionState {
    pub fn is_final(&self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

/// What a session was waiting on when it was cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suspension {
    /// Agent name
    AwaitingReply(String),
    /// Tool name
    AwaitingTool(String),
}

/// Why a session ended in `TerminatedByFailure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    Generation { agent: String, reason: String },
    Cancelled { during: Suspension },
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCause::Generation { agent, reason } => {
                write!(f, "{agent} failed to generate a reply: {reason}")
            }
            FailureCause::Cancelled {
                during: Suspension::AwaitingReply(agent),
            } => write!(f, "cancelled while waiting for {agent}"),
            FailureCause::Cancelled {
                during: Suspension::AwaitingTool(tool),
            } => write!(f, "cancelled while running {tool}"),
        }
    }
}

/// Result of a finished session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub final_state: SessionState,
    pub history: Vec<Message>,
    pub round_count: usize,
    pub failure: Option<FailureCause>,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        self.final_state == SessionState::TerminatedBySignal
    }

    pub fn was_cancelled(&self) -> bool {
        matches!(self.failure, Some(FailureCause::Cancelled { .. }))
    }
}

/// Requests cancellation of a running session
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observed by a session at every suspension point
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Dropping the sender leaves the value at false for good.
        drop(tx);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a linked cancel handle and token
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Mutable state of a running session
#[derive(Debug)]
pub(crate) struct Session {
    pub conversation: Conversation,
    pub round_count: usize,
    pub max_rounds: usize,
    state: SessionState,
    failure: Option<FailureCause>,
}

impl Session {
    pub fn new(initiating: Message, max_rounds: usize) -> Self {
        Self {
            conversation: Conversation::new(initiating),
            round_count: 0,
            max_rounds,
            state: SessionState::Running,
            failure: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn append(&mut self, message: Message) {
        self.conversation.push(message);
    }

    /// Count a completed round; hitting the limit ends the session
    pub fn complete_round(&mut self) {
        self.round_count += 1;
        if self.round_count >= self.max_rounds {
            self.finish(SessionState::TerminatedByRoundLimit);
        }
    }

    pub fn finish(&mut self, state: SessionState) {
        if self.is_running() {
            self.state = state;
        }
    }

    pub fn fail(&mut self, cause: FailureCause) {
        if self.is_running() {
            self.state = SessionState::TerminatedByFailure;
            self.failure = Some(cause);
        }
    }

    pub fn into_outcome(self) -> SessionOutcome {
        SessionOutcome {
            final_state: self.state,
            history: self.conversation.into_messages(),
            round_count: self.round_count,
            failure: self.failure,
        }
    }
}
