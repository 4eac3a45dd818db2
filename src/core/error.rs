//! Error types for Colloquy
//!
//! Session-level failures live in [`ColloquyError`]. Tool dispatch failures are
//! kept apart in [`ToolError`] because they never end a session: they are
//! written back into the conversation for the requesting agent to see.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Colloquy operations
#[derive(Error, Debug)]
pub enum ColloquyError {
    /// The generation backend failed to produce a reply for an agent
    #[error("Generation failed for {agent}: {reason}")]
    Generation { agent: String, reason: String },

    /// The session was cancelled from outside
    #[error("Session cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Colloquy operations
pub type Result<T> = std::result::Result<T, ColloquyError>;

impl ColloquyError {
    /// Create a generation error
    pub fn generation(agent: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Generation {
            agent: agent.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend error that is not yet attributed to an agent
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Classification of a failed tool dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    UnknownTool,
    InvalidArguments,
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolErrorKind::UnknownTool => write!(f, "unknown_tool"),
            ToolErrorKind::InvalidArguments => write!(f, "invalid_arguments"),
        }
    }
}

/// A tool call the registry refused to run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

impl ToolError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn invalid(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::UnknownTool { .. } => ToolErrorKind::UnknownTool,
            ToolError::InvalidArguments { .. } => ToolErrorKind::InvalidArguments,
        }
    }
}
