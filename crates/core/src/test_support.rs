// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test builders, available to other crates via the `test-support`
//! feature (mirrors the teacher's own `test-support` feature convention).

use crate::agent::AgentRole;
use crate::command::{Command, CommandArgs, CommandId};

/// A minimal valid direct-dispatch command, for tests that don't care about
/// the payload.
pub fn direct_command(id: &str, grid: u64, node: u64) -> Command {
    Command {
        id: CommandId::from(id),
        grid,
        node,
        cmd: "noop".to_string(),
        roles: Vec::new(),
        fanout: false,
        data: String::new(),
        args: CommandArgs::default(),
    }
}

/// A minimal valid role-based command.
pub fn role_command(id: &str, roles: &[&str], fanout: bool) -> Command {
    Command {
        id: CommandId::from(id),
        grid: 0,
        node: 0,
        cmd: "noop".to_string(),
        roles: roles.iter().map(|r| AgentRole::from(*r)).collect(),
        fanout,
        data: String::new(),
        args: CommandArgs::default(),
    }
}

/// An internal command with the given sub-command name.
pub fn internal_command(id: &str, sub: &str) -> Command {
    Command {
        id: CommandId::from(id),
        grid: 0,
        node: 0,
        cmd: crate::command::INTERNAL_TARGET.to_string(),
        roles: Vec::new(),
        fanout: false,
        data: String::new(),
        args: CommandArgs { name: sub.to_string() },
    }
}
