// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-`(command, agent)` lifecycle state and its terminal payload.

use serde::{Deserialize, Serialize};

use crate::command::CommandId;

/// `QUEUED -> RUNNING -> (SUCCESS | ERROR | UNKNOWN_CMD)`.
///
/// Transitions are forward-only (spec §3): a write that would move a
/// `(command, agent)` pair backwards in this ordering is a bug in the
/// caller, not something this type corrects for on its own — callers that
/// need the guard use [`CommandState::can_advance_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandState {
    Queued,
    Running,
    Success,
    Error,
    UnknownCmd,
}

impl CommandState {
    fn rank(self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Running => 1,
            Self::Success | Self::Error | Self::UnknownCmd => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Whether moving from `self` to `next` respects the forward-only
    /// lifecycle ordering. Terminal states never advance further (a second
    /// terminal write for the same pair is last-writer-wins per spec §5,
    /// not a forward transition).
    pub fn can_advance_to(self, next: CommandState) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }
}

/// `{id, grid, node, state, data, level, startTime}` as posted by agents and
/// written by the controller. Field names match the wire JSON exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub id: CommandId,
    #[serde(default)]
    pub grid: u64,
    #[serde(default)]
    pub node: u64,
    pub state: CommandState,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub level: i32,
    #[serde(rename = "startTime", default)]
    pub start_time: i64,
}

impl CommandResult {
    pub fn queued(id: CommandId, grid: u64, node: u64, start_time_ms: i64) -> Self {
        Self { id, grid, node, state: CommandState::Queued, data: String::new(), level: 0, start_time: start_time_ms }
    }

    pub fn running(id: CommandId, grid: u64, node: u64, start_time_ms: i64) -> Self {
        Self { id, grid, node, state: CommandState::Running, data: String::new(), level: 0, start_time: start_time_ms }
    }

    pub fn error(id: CommandId, grid: u64, node: u64, message: impl Into<String>, start_time_ms: i64) -> Self {
        Self { id, grid, node, state: CommandState::Error, data: message.into(), level: 40, start_time: start_time_ms }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
