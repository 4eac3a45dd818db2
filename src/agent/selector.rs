//! Speaker selection
//!
//! A pure function of the history and the team. Tiers, in order:
//!
//! 1. **Hand-off**: the last turn addresses another participant by name
//!    ("Researcher, please ...", "over to the Critic").
//! 2. **Tool follow-up**: with no hand-off, the author of a tool call speaks
//!    again to digest the result.
//! 3. **Sequence**: the member after the last speaker in team order,
//!    wrapping around; the controller hands to the first member.
//! 4. **Deadlock**: everyone eligible is at their cap, so the uncapped
//!    controller speaks.
//!
//! No tier ever picks an agent whose consecutive-turn cap is reached.

use regex::Regex;

use crate::agent::agent::Agent;
use crate::agent::conversation::{consecutive_turns, last_turn};
use crate::agent::team::Team;
use crate::core::Message;

/// Why a speaker was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    ToolFollowUp,
    Handoff,
    Sequence,
    Deadlock,
}

#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub speaker: &'a Agent,
    pub reason: SelectionReason,
}

/// Finds participants addressed in a message
#[derive(Debug, Clone)]
pub struct HandoffParser {
    pattern: Option<Regex>,
}

impl HandoffParser {
    pub fn new<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let alternatives: Vec<String> = names
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        let names = alternatives.join("|");
        // Direct address at the start of a line or sentence, or a "hand/pass/over to" phrase.
        let source = format!(
            r"(?im)(?:(?:^|[.!?]\s+)\s*@?[*_]*(?P<addr>{names})[*_]*\s*[,:])|(?:\b(?:over|hand(?:s|ing)?(?:\s+(?:it|this))?(?:\s+(?:off|over|back))?|pass(?:es|ing)?(?:\s+(?:it|this))?(?:\s+(?:along|over|back))?)\s+to\s+(?:the\s+)?[*_]*(?P<to>{names})\b)"
        );

        match Regex::new(&source) {
            Ok(pattern) => Self {
                pattern: Some(pattern),
            },
            Err(e) => {
                tracing::warn!(error = %e, "hand-off pattern rejected, hand-offs disabled");
                Self { pattern: None }
            }
        }
    }

    /// Addressed names in order of appearance, as written in the text
    pub fn addressed<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let Some(ref pattern) = self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.name("addr").or_else(|| caps.name("to")))
            .map(|m| m.as_str())
            .collect()
    }
}

/// Picks the next speaker for a team
#[derive(Debug, Clone)]
pub struct SpeakerSelector {
    handoffs: HandoffParser,
}

impl SpeakerSelector {
    pub fn new(team: &Team) -> Self {
        Self {
            handoffs: HandoffParser::new(team.participants().map(Agent::name)),
        }
    }

    /// Choose who speaks next
    pub fn select_next<'a>(&self, history: &[Message], team: &'a Team) -> Selection<'a> {
        let turn = last_turn(history);
        let last_speaker = turn.map(|m| m.sender.as_str());

        let can_speak = |agent: &Agent| match agent.max_consecutive_auto_replies() {
            None => true,
            Some(cap) => consecutive_turns(history, agent.name()) < cap,
        };

        if let Some(turn) = turn {
            let target = self
                .handoffs
                .addressed(&turn.content)
                .into_iter()
                .filter_map(|name| team.find(name))
                .find(|&agent| agent.name() != turn.sender && can_speak(agent));

            if let Some(agent) = target {
                return Selection {
                    speaker: agent,
                    reason: SelectionReason::Handoff,
                };
            }
        }

        if let Some(turn) = turn.filter(|m| m.is_tool_call()) {
            if let Some(caller) = team.find(&turn.sender) {
                if !team.is_controller(caller.name()) && can_speak(caller) {
                    return Selection {
                        speaker: caller,
                        reason: SelectionReason::ToolFollowUp,
                    };
                }
            }
        }

        let members = team.members();
        let start = last_speaker
            .and_then(|name| team.member_index(name))
            .map_or(0, |i| (i + 1) % members.len());

        for offset in 0..members.len() {
            let candidate = &members[(start + offset) % members.len()];
            if can_speak(candidate) {
                return Selection {
                    speaker: candidate,
                    reason: SelectionReason::Sequence,
                };
            }
        }

        Selection {
            speaker: team.controller(),
            reason: SelectionReason::Deadlock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::agent::ModelBinding;
    use crate::core::{ToolCall, ToolResult};
    use crate::llm::ScriptedProvider;
    use crate::tools::ToolRegistry;
    use serde_json::json;
    use std::sync::Arc;

    fn member(name: &str, cap: usize) -> Agent {
        Agent::builder(name)
            .max_consecutive_auto_replies(cap)
            .model(ModelBinding::new(Arc::new(ScriptedProvider::always("ok")), "m"))
            .build()
            .unwrap()
    }

    fn team_with_caps(caps: [usize; 4]) -> Team {
        Team::new(
            Agent::controller("Admin", "admin", "continue"),
            vec![
                member("Planner", caps[0]),
                member("Researcher", caps[1]),
                member("Writer", caps[2]),
                member("Critic", caps[3]),
            ],
            Arc::new(ToolRegistry::with_content_tools()),
        )
        .unwrap()
    }

    fn team() -> Team {
        team_with_caps([10, 5, 3, 3])
    }

    fn pick<'a>(team: &'a Team, history: &[Message]) -> (&'a str, SelectionReason) {
        let selection = SpeakerSelector::new(team).select_next(history, team);
        (selection.speaker.name(), selection.reason)
    }

    #[test]
    fn test_sequence_from_controller() {
        let team = team();
        let history = vec![Message::text("Admin", "Write a blog post")];
        assert_eq!(pick(&team, &history), ("Planner", SelectionReason::Sequence));
    }

    #[test]
    fn test_sequence_wraps_to_planner() {
        let team = team();
        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Critic", "Some notes."),
        ];
        assert_eq!(pick(&team, &history), ("Planner", SelectionReason::Sequence));
    }

    #[test]
    fn test_handoff_parsing() {
        let parser = HandoffParser::new(["Admin", "Planner", "Researcher", "Writer", "Critic"]);
        assert_eq!(parser.addressed("Researcher, please gather information."), vec!["Researcher"]);
        assert_eq!(parser.addressed("Thanks! writer: start drafting"), vec!["writer"]);
        assert_eq!(parser.addressed("Handing it over to the Critic now."), vec!["Critic"]);
        assert_eq!(parser.addressed("**Critic**, your turn"), vec!["Critic"]);
        assert!(parser.addressed("The Researcher found good material").is_empty());
    }

    #[test]
    fn test_handoff_overrides_sequence() {
        let team = team();
        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Critic", "Two issues found.\nWriter, please revise the intro."),
        ];
        assert_eq!(pick(&team, &history), ("Writer", SelectionReason::Handoff));
    }

    #[test]
    fn test_self_handoff_ignored() {
        let team = team();
        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Planner", "Planner: noted. Writer, you are up."),
        ];
        assert_eq!(pick(&team, &history), ("Writer", SelectionReason::Handoff));
    }

    #[test]
    fn test_tool_follow_up() {
        let team = team();
        let call = ToolCall::new("search_knowledge_base", json!({"topic": "python asyncio"}));
        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Planner", "Researcher, please look this up."),
            Message::with_tool_call("Researcher", "", call.clone()),
            Message::tool_result("Admin", ToolResult::success(&call, json!({"success": true}))),
        ];
        assert_eq!(pick(&team, &history), ("Researcher", SelectionReason::ToolFollowUp));
    }

    #[test]
    fn test_handoff_in_tool_call_wins_over_follow_up() {
        let team = team();
        let call = ToolCall::new("search_knowledge_base", json!({"topic": "python asyncio"}));
        let history = vec![
            Message::text("Admin", "go"),
            Message::with_tool_call(
                "Researcher",
                "Looking it up now. Writer, please draft from these results.",
                call.clone(),
            ),
            Message::tool_result("Admin", ToolResult::success(&call, json!({"success": true}))),
        ];
        assert_eq!(pick(&team, &history), ("Writer", SelectionReason::Handoff));
    }

    #[test]
    fn test_cap_blocks_tool_follow_up() {
        let team = team_with_caps([10, 1, 3, 3]);
        let call = ToolCall::new("search_knowledge_base", json!({"topic": "docker"}));
        let history = vec![
            Message::text("Admin", "go"),
            Message::with_tool_call("Researcher", "", call.clone()),
            Message::tool_result("Admin", ToolResult::success(&call, json!({}))),
        ];
        assert_eq!(pick(&team, &history), ("Writer", SelectionReason::Sequence));
    }

    #[test]
    fn test_cap_blocks_handoff() {
        let team = team_with_caps([10, 5, 1, 3]);
        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Writer", "Draft done."),
            Message::text("Critic", "Writer, please revise."),
        ];
        // Writer's streak was broken by the critic, so the cap does not apply yet.
        assert_eq!(pick(&team, &history), ("Writer", SelectionReason::Handoff));

        let history = vec![
            Message::text("Admin", "go"),
            Message::text("Writer", "Writer, I will continue myself. Over to Writer."),
        ];
        assert_eq!(pick(&team, &history), ("Critic", SelectionReason::Sequence));
    }

    #[test]
    fn test_deadlock_falls_back_to_controller() {
        let team = team_with_caps([0, 0, 0, 0]);
        let history = vec![Message::text("Admin", "go")];
        assert_eq!(pick(&team, &history), ("Admin", SelectionReason::Deadlock));
    }

    #[test]
    fn test_never_exceeds_cap_in_sequence() {
        let team = Team::new(
            Agent::controller("Admin", "admin", "continue"),
            vec![member("Solo", 2)],
            Arc::new(ToolRegistry::new()),
        )
        .unwrap();

        let mut history = vec![Message::text("Admin", "go")];
        let mut picks = Vec::new();
        for _ in 0..6 {
            let name = pick(&team, &history).0.to_string();
            history.push(Message::text(&name, "..."));
            picks.push(name);
        }
        assert_eq!(picks, vec!["Solo", "Solo", "Admin", "Solo", "Solo", "Admin"]);
    }
}
