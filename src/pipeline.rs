//! Content pipeline
//!
//! Assembles the content team from a [`Config`] and one generation backend,
//! and runs a session for a topic.

use std::sync::Arc;

use crate::agent::roles;
use crate::agent::{
    CancelToken, GroupChat, ModelBinding, SessionOutcome, Team, TerminationDetector,
};
use crate::core::{Config, Result};
use crate::llm::{GenerateOptions, LLMProvider};
use crate::tools::ToolRegistry;

/// Build Admin, Planner, Researcher, Writer and Critic around one provider
pub fn build_team(config: &Config, provider: Arc<dyn LLMProvider>) -> Result<Team> {
    let binding = ModelBinding::new(provider, &config.llm.model).with_options(GenerateOptions {
        temperature: config.llm.temperature,
        max_tokens: None,
    });

    let members = vec![
        roles::planner(binding.clone())?,
        roles::researcher(binding.clone())?,
        roles::writer(binding.clone())?,
        roles::critic(binding)?,
    ];

    Team::new(
        roles::admin(&config.session.admin_name),
        members,
        Arc::new(ToolRegistry::with_content_tools()),
    )
}

/// The opening request the controller posts
pub fn initial_message(topic: &str, content_type: &str) -> String {
    format!(
        "We need to create a {content_type} about: {topic}\n\n\
         Please coordinate the team to:\n\
         1. Research the topic thoroughly using available tools\n\
         2. Create well-structured, engaging content\n\
         3. Review and ensure quality standards are met\n\n\
         Let's begin!"
    )
}

/// Run one content session
pub async fn run_content_pipeline(
    config: &Config,
    provider: Arc<dyn LLMProvider>,
    topic: &str,
    content_type: &str,
    cancel: CancelToken,
) -> Result<SessionOutcome> {
    let team = build_team(config, provider)?;
    tracing::info!(topic, content_type, model = %config.llm.model, "running content pipeline");

    let termination = TerminationDetector::default().with_mode(config.session.termination_match);
    let chat = GroupChat::new(team, config.session.max_rounds).with_termination(termination);
    Ok(chat
        .run_with_cancel(initial_message(topic, content_type), cancel)
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{MatchMode, SessionState};
    use crate::llm::ScriptedProvider;

    #[test]
    fn test_initial_message() {
        let msg = initial_message("Python asyncio basics", "technical_blog");
        assert!(msg.starts_with("We need to create a technical_blog about: Python asyncio basics"));
        assert!(msg.contains("1. Research the topic thoroughly using available tools"));
        assert!(msg.ends_with("Let's begin!"));
    }

    #[test]
    fn test_build_team() {
        let mut config = Config::default();
        config.session.admin_name = "Boss".into();
        let team = build_team(&config, Arc::new(ScriptedProvider::always("ok"))).unwrap();

        let names: Vec<&str> = team.participants().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Boss", "Planner", "Researcher", "Writer", "Critic"]);
        assert_eq!(team.find("Writer").unwrap().model(), Some("gpt-4"));
        assert_eq!(team.registry().len(), 2);
    }

    #[tokio::test]
    async fn test_pipeline_round_limit() {
        let mut config = Config::default();
        config.session.max_rounds = 2;
        let outcome = run_content_pipeline(
            &config,
            Arc::new(ScriptedProvider::always("Working on it.")),
            "docker",
            "tutorial",
            CancelToken::never(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.final_state, SessionState::TerminatedByRoundLimit);
        assert_eq!(outcome.round_count, 2);
        assert_eq!(outcome.history[1].sender, "Planner");
        assert_eq!(outcome.history[2].sender, "Researcher");
    }

    #[tokio::test]
    async fn test_termination_match_from_config() {
        let quoting = "Not at TASK_COMPLETE yet, keep going.";

        let mut config = Config::default();
        config.session.max_rounds = 3;
        let outcome = run_content_pipeline(
            &config,
            Arc::new(ScriptedProvider::always(quoting)),
            "docker",
            "tutorial",
            CancelToken::never(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.final_state, SessionState::TerminatedBySignal);

        config.session.termination_match = MatchMode::WholeMessage;
        let outcome = run_content_pipeline(
            &config,
            Arc::new(ScriptedProvider::always(quoting)),
            "docker",
            "tutorial",
            CancelToken::never(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.final_state, SessionState::TerminatedByRoundLimit);
        assert_eq!(outcome.round_count, 3);
    }
}
