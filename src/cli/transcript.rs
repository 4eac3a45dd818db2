//! Transcript rendering
//!
//! Turns session messages and outcomes into plain text for the terminal.

use crate::agent::{SessionOutcome, SessionState};
use crate::core::{Config, Message};
use crate::tools::{guidelines, knowledge};

const RULE: &str = "──────────────────────────────────────────────────────────────────────";

/// Header printed before a session starts
pub fn render_header(config: &Config, topic: &str, content_type: &str) -> String {
    format!(
        "{RULE}\n  Colloquy content pipeline\n{RULE}\n\
         Topic:        {topic}\n\
         Content type: {content_type}\n\
         Model:        {}\n\
         Max rounds:   {}\n",
        config.llm.model, config.session.max_rounds
    )
}

/// One message as it appears in the transcript
pub fn render_message(message: &Message) -> String {
    if let Some(ref result) = message.tool_result {
        let status = if result.is_error() { "failed" } else { "ok" };
        return format!(
            "[{}] tool result: {} ({})\n{}\n",
            message.sender, result.tool_name, status, message.content
        );
    }

    let mut out = format!("[{}]\n", message.sender);
    if !message.content.trim().is_empty() {
        out.push_str(message.content.trim_end());
        out.push('\n');
    }
    if let Some(ref call) = message.tool_call {
        out.push_str(&format!("-> calls {}({})\n", call.name, call.arguments));
    }
    out
}

/// The whole history, messages separated by blank lines
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Closing summary of a session
pub fn render_outcome(outcome: &SessionOutcome) -> String {
    let state = match outcome.final_state {
        SessionState::Running => "still running",
        SessionState::TerminatedBySignal => "completed",
        SessionState::TerminatedByRoundLimit => "stopped at the round limit",
        SessionState::TerminatedByFailure => "failed",
    };

    let mut out = format!(
        "{RULE}\n  Session {state}\n{RULE}\nRounds:   {}\nMessages: {}\n",
        outcome.round_count,
        outcome.history.len()
    );
    if let Some(ref cause) = outcome.failure {
        out.push_str(&format!("Reason:   {cause}\n"));
    }
    out
}

/// Knowledge base topics and content types, for `--list-topics`
pub fn render_topics() -> String {
    let mut out = String::from("Knowledge base topics:\n");
    for topic in knowledge::available_topics() {
        out.push_str(&format!("  - {topic}\n"));
    }
    out.push_str("\nContent types:\n");
    for content_type in guidelines::available_types() {
        out.push_str(&format!("  - {content_type}\n"));
    }
    out
}
