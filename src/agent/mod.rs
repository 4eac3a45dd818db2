//! Agent module - participants and group chat orchestration
//!
//! Contains the agents, the shared history, speaker selection, termination
//! detection and the session loop that ties them together.

pub mod agent;
pub mod conversation;
pub mod group_chat;
pub mod roles;
pub mod selector;
pub mod session;
pub mod team;
pub mod termination;

pub use agent::{Agent, AgentBuilder, ModelBinding};
pub use conversation::Conversation;
pub use group_chat::{run_session, GroupChat};
pub use selector::{HandoffParser, Selection, SelectionReason, SpeakerSelector};
pub use session::{
    cancellation, CancelHandle, CancelToken, FailureCause, SessionOutcome, SessionState,
    Suspension,
};
pub use team::Team;
pub use termination::{MatchMode, TerminationDetector, DEFAULT_SIGNALS};
