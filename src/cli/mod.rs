//! CLI module - terminal output
//!
//! Contains the transcript and outcome rendering used by the binary.

pub mod transcript;

pub use transcript::{render_header, render_message, render_outcome, render_topics, render_transcript};
