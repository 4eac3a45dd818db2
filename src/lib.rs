//! Colloquy - Multi-Agent Group Chat Orchestration
//!
//! Several specialised agents (planner, researcher, writer, critic) take
//! turns in one shared conversation, coordinated by a controller that owns
//! the tool registry, until one of them signals the work is done.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Generation backend abstraction with an OpenAI-compatible client
//! - **Tools**: Closed tool registry with the knowledge base and writing guidelines
//! - **Agent**: Agents, speaker selection, termination and the group chat loop
//! - **Pipeline**: The content team and its opening request
//! - **CLI**: Transcript rendering
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use colloquy::llm::OpenAiClient;
//! use colloquy::{pipeline, Config};
//!
//! #[tokio::main]
//! async fn main() -> colloquy::Result<()> {
//!     let config = Config::load();
//!     let provider = Arc::new(OpenAiClient::from_config(&config.llm)?);
//!     let team = pipeline::build_team(&config, provider)?;
//!
//!     let outcome = colloquy::run_session(
//!         pipeline::initial_message("Python asyncio basics", "technical_blog"),
//!         team,
//!         config.session.max_rounds,
//!     )
//!     .await;
//!     println!("{:?} after {} rounds", outcome.final_state, outcome.round_count);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod tools;

// Re-export commonly used items
pub use agent::{run_session, Agent, GroupChat, SessionOutcome, SessionState, Team};
pub use core::{ColloquyError, Config, Message, Result};
pub use tools::ToolRegistry;
