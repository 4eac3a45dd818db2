//! Session participants
//!
//! A team is the controller plus the specialist members, in speaking order,
//! together with the tool registry the controller dispatches calls to.

use std::collections::HashSet;
use std::sync::Arc;

use crate::agent::agent::Agent;
use crate::core::{ColloquyError, Result};
use crate::tools::ToolRegistry;

#[derive(Debug, Clone)]
pub struct Team {
    controller: Agent,
    members: Vec<Agent>,
    registry: Arc<ToolRegistry>,
}

impl Team {
    /// Assemble a team; names must be non-empty and unique ignoring case
    pub fn new(controller: Agent, members: Vec<Agent>, registry: Arc<ToolRegistry>) -> Result<Self> {
        if members.is_empty() {
            return Err(ColloquyError::config("A team needs at least one member"));
        }

        let mut seen = HashSet::new();
        for agent in std::iter::once(&controller).chain(members.iter()) {
            if !seen.insert(name_key(agent.name())) {
                return Err(ColloquyError::config(format!(
                    "Duplicate participant name: {}",
                    agent.name()
                )));
            }
        }

        Ok(Self {
            controller,
            members,
            registry,
        })
    }

    pub fn controller(&self) -> &Agent {
        &self.controller
    }

    /// Members in role-sequence order
    pub fn members(&self) -> &[Agent] {
        &self.members
    }

    /// Every participant, controller first
    pub fn participants(&self) -> impl Iterator<Item = &Agent> {
        std::iter::once(&self.controller).chain(self.members.iter())
    }

    /// Find a participant by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&Agent> {
        let key = name_key(name);
        self.participants().find(|agent| name_key(agent.name()) == key)
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|agent| agent.name() == name)
    }

    pub fn is_controller(&self, name: &str) -> bool {
        self.controller.name() == name
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.members.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Unicode-aware folding shared by lookup and the duplicate check
fn name_key(name: &str) -> String {
    name.to_lowercase()
}
