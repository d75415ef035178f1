// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rl-core: domain types for the relayd agent controller.
//!
//! An [`AgentId`] names a remote worker. A [`Command`] is a unit of work
//! routed either directly at an agent or at a set of declared [`AgentRole`]s.
//! A [`CommandResult`] carries the one current [`CommandState`] for a given
//! `(command, agent)` pair through its lifecycle.

pub mod agent;
pub mod clock;
pub mod command;
pub mod result;
pub mod schedule;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{AgentId, AgentRole, RoleSet};
pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{Command, CommandArgs, CommandError, CommandId, DispatchMode};
pub use result::{CommandResult, CommandState};
pub use schedule::ScheduledJob;
