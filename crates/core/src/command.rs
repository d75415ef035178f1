// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unit of work routed through relayd.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::agent::{AgentId, AgentRole};

/// Opaque, externally-supplied command identifier.
///
/// Unlike ids relayd mints for itself (which use the teacher's fixed-width,
/// prefixed id scheme), a `CommandId` comes from API clients verbatim and
/// must not be truncated or reshaped, so it's a plain owned `String`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub String);

impl CommandId {
    /// Mint a fresh id for a command synthesized by the scheduler, matching
    /// `original_source/schedule.go`'s `job.Cmd["id"] = uuid.New()`.
    pub fn new_synthesized() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CommandId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommandId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Sub-command selector for internal (`cmd == "controller"`) commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs {
    #[serde(default)]
    pub name: String,
}

/// A unit of work queued to `cmds.queue`, to be routed to one or more
/// agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    #[serde(default)]
    pub grid: u64,
    #[serde(default)]
    pub node: u64,
    pub cmd: String,
    #[serde(default)]
    pub roles: Vec<AgentRole>,
    #[serde(default)]
    pub fanout: bool,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub args: CommandArgs,
}

/// The sentinel `cmd` value that routes a command to the InternalCommand
/// handler instead of an agent.
pub const INTERNAL_TARGET: &str = "controller";

/// Which of the two mutually-exclusive dispatch modes a command selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    /// `roles` is empty: target exactly `(grid, node)`.
    Direct(AgentId),
    /// `roles` is non-empty: resolve via [`crate::RoleSet`] filtering.
    RoleBased,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("command id must not be empty")]
    EmptyId,
    #[error("fanout requires a non-empty roles list")]
    FanoutWithoutRoles,
}

impl Command {
    pub fn is_internal(&self) -> bool {
        self.cmd == INTERNAL_TARGET
    }

    pub fn target_agent(&self) -> AgentId {
        AgentId::new(self.grid, self.node)
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        if self.roles.is_empty() {
            DispatchMode::Direct(self.target_agent())
        } else {
            DispatchMode::RoleBased
        }
    }

    /// Validates the invariants from spec §3: non-empty id, and
    /// `fanout=true` paired with empty `roles` is rejected outright.
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.id.is_empty() {
            return Err(CommandError::EmptyId);
        }
        if self.fanout && self.roles.is_empty() {
            return Err(CommandError::FanoutWithoutRoles);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
