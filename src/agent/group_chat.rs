//! Group chat orchestration
//!
//! Drives a session round by round: pick a speaker, get its reply, dispatch
//! any tool call through the registry, append, check for completion. One
//! round is one successful generation step. The session is single-threaded;
//! the only suspension points are the backend call and the tool dispatch,
//! and both race against the cancel token.

use tracing::{debug, info, warn};

use crate::agent::selector::SpeakerSelector;
use crate::agent::session::{
    CancelToken, FailureCause, Session, SessionOutcome, SessionState, Suspension,
};
use crate::agent::team::Team;
use crate::agent::termination::TerminationDetector;
use crate::core::{ColloquyError, Message, ToolResult};

/// Runs sessions for one team
#[derive(Debug, Clone)]
pub struct GroupChat {
    team: Team,
    max_rounds: usize,
    termination: TerminationDetector,
    selector: SpeakerSelector,
}

impl GroupChat {
    pub fn new(team: Team, max_rounds: usize) -> Self {
        let selector = SpeakerSelector::new(&team);
        Self {
            team,
            max_rounds,
            termination: TerminationDetector::default(),
            selector,
        }
    }

    /// Replace the completion signals
    pub fn with_termination(mut self, termination: TerminationDetector) -> Self {
        self.termination = termination;
        self
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Run a session to completion
    pub async fn run(&self, initiating_message: impl Into<String>) -> SessionOutcome {
        self.run_with_cancel(initiating_message, CancelToken::never())
            .await
    }

    /// Run a session that stops at the next suspension point once `cancel` fires
    pub async fn run_with_cancel(
        &self,
        initiating_message: impl Into<String>,
        cancel: CancelToken,
    ) -> SessionOutcome {
        let controller = self.team.controller().name();
        let opening = Message::text(controller, initiating_message);
        let opening_is_terminal = self.termination.is_terminal(&opening);
        let mut session = Session::new(opening, self.max_rounds);

        info!(
            participants = self.team.len(),
            max_rounds = self.max_rounds,
            "starting group chat"
        );

        if opening_is_terminal {
            session.finish(SessionState::TerminatedBySignal);
        } else if self.max_rounds == 0 {
            session.finish(SessionState::TerminatedByRoundLimit);
        }

        while session.is_running() {
            self.step(&mut session, &cancel).await;
        }

        let outcome = session.into_outcome();
        info!(
            state = ?outcome.final_state,
            rounds = outcome.round_count,
            messages = outcome.history.len(),
            "group chat finished"
        );
        outcome
    }

    /// One round. Nothing is appended unless the round completes.
    async fn step(&self, session: &mut Session, cancel: &CancelToken) {
        let round = session.round_count + 1;
        let selection = self
            .selector
            .select_next(session.conversation.messages(), &self.team);
        let speaker = selection.speaker;

        debug!(
            round,
            speaker = speaker.name(),
            reason = ?selection.reason,
            "selected speaker"
        );

        let generated = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            reply = speaker.generate_reply(session.conversation.messages()) => Some(reply),
        };

        let Some(generated) = generated else {
            warn!(round, speaker = speaker.name(), "cancelled while awaiting reply");
            session.fail(FailureCause::Cancelled {
                during: Suspension::AwaitingReply(speaker.name().to_string()),
            });
            return;
        };

        let reply = match generated {
            Ok(reply) => reply,
            Err(ColloquyError::Generation { agent, reason }) => {
                warn!(round, %agent, %reason, "generation failed");
                session.fail(FailureCause::Generation { agent, reason });
                return;
            }
            Err(e) => {
                warn!(round, speaker = speaker.name(), error = %e, "generation failed");
                session.fail(FailureCause::Generation {
                    agent: speaker.name().to_string(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        if let Some(signal) = self.termination.matching_signal(&reply) {
            info!(round, speaker = speaker.name(), signal, "completion signal received");
            session.append(reply);
            session.finish(SessionState::TerminatedBySignal);
            return;
        }

        let Some(call) = reply.tool_call.clone() else {
            debug!(round, speaker = speaker.name(), "reply appended");
            session.append(reply);
            session.complete_round();
            return;
        };

        info!(round, speaker = speaker.name(), tool = %call.name, "dispatching tool call");

        let dispatched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.team.registry().invoke(&call) => Some(result),
        };

        let Some(dispatched) = dispatched else {
            warn!(round, tool = %call.name, "cancelled while running tool");
            session.fail(FailureCause::Cancelled {
                during: Suspension::AwaitingTool(call.name),
            });
            return;
        };

        let result = dispatched.unwrap_or_else(|e| {
            warn!(round, tool = %call.name, error = %e, "tool dispatch failed");
            ToolResult::from_error(&call, &e)
        });

        let result_message = Message::tool_result(self.team.controller().name(), result);
        let result_is_terminal = self.termination.is_terminal(&result_message);

        session.append(reply);
        session.append(result_message);

        if result_is_terminal {
            session.finish(SessionState::TerminatedBySignal);
        } else {
            session.complete_round();
        }
    }
}

/// Run one session with a fresh group chat and no cancellation
pub async fn run_session(
    initiating_message: impl Into<String>,
    team: Team,
    max_rounds: usize,
) -> SessionOutcome {
    GroupChat::new(team, max_rounds).run(initiating_message).await
}
