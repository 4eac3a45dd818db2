//! Conversation history management
//!
//! Append-only message log shared by every participant of a session.

use crate::core::Message;

/// Ordered history; append order is temporal order
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation seeded with its initiating message
    pub fn new(initiating: Message) -> Self {
        Self {
            messages: vec![initiating],
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Latest message that is a speaking turn (tool results are skipped)
    pub fn last_turn(&self) -> Option<&Message> {
        last_turn(&self.messages)
    }

    /// Number of trailing turns taken by `name` in a row
    pub fn consecutive_turns(&self, name: &str) -> usize {
        consecutive_turns(&self.messages, name)
    }
}

/// Latest speaking turn in a slice of history
pub fn last_turn(history: &[Message]) -> Option<&Message> {
    history.iter().rev().find(|m| !m.is_tool_result())
}

/// Trailing streak of turns by `name`
///
/// Tool-result messages are authored by the controller on the caller's
/// behalf; they neither count toward nor break a streak.
pub fn consecutive_turns(history: &[Message], name: &str) -> usize {
    history
        .iter()
        .rev()
        .filter(|m| !m.is_tool_result())
        .take_while(|m| m.sender == name)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ToolCall, ToolResult};
    use serde_json::json;

    fn call_and_result(sender: &str) -> (Message, Message) {
        let call = ToolCall::new("search_knowledge_base", json!({"topic": "ml"}));
        (
            Message::with_tool_call(sender, "", call.clone()),
            Message::tool_result("Admin", ToolResult::success(&call, json!({}))),
        )
    }

    #[test]
    fn test_conversation_basic() {
        let mut conv = Conversation::new(Message::text("Admin", "Hello"));
        conv.push(Message::text("Planner", "Hi there!"));

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].content, "Hello");
        assert_eq!(conv.last().unwrap().sender, "Planner");
    }

    #[test]
    fn test_streak_skips_tool_results() {
        let mut conv = Conversation::new(Message::text("Admin", "go"));
        let (call, result) = call_and_result("Researcher");
        conv.push(call);
        conv.push(result);
        conv.push(Message::text("Researcher", "Summary"));

        assert_eq!(conv.consecutive_turns("Researcher"), 2);
        assert_eq!(conv.consecutive_turns("Admin"), 0);
        assert_eq!(conv.last_turn().unwrap().content, "Summary");
    }

    #[test]
    fn test_streak_broken_by_other_speaker() {
        let mut conv = Conversation::new(Message::text("Admin", "go"));
        conv.push(Message::text("Writer", "draft"));
        conv.push(Message::text("Critic", "revise"));
        conv.push(Message::text("Writer", "draft 2"));
        assert_eq!(conv.consecutive_turns("Writer"), 1);
    }

    #[test]
    fn test_last_turn_ignores_trailing_result() {
        let mut conv = Conversation::new(Message::text("Admin", "go"));
        let (call, result) = call_and_result("Researcher");
        conv.push(call);
        conv.push(result);
        assert!(conv.last_turn().unwrap().is_tool_call());
        assert!(conv.last().unwrap().is_tool_result());
    }
}
