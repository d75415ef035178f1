// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identity and declared roles.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity key for a remote agent: a `(grid, node)` pair. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId {
    pub grid: u64,
    pub node: u64,
}

impl AgentId {
    pub fn new(grid: u64, node: u64) -> Self {
        Self { grid, node }
    }

    /// The broker queue name this agent's commands are pushed to:
    /// `cmds:<grid>:<node>`.
    pub fn queue_name(&self) -> String {
        format!("cmds:{}:{}", self.grid, self.node)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.grid, self.node)
    }
}

/// An opaque, agent-declared role tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentRole(pub String);

impl AgentRole {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentRole {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentRole {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An agent's currently-declared roles. Ordering and multiplicity from the
/// wire never matter once the roles land here (§4.B: "Equality is
/// set-equality"), so this is a `BTreeSet`, not a `Vec`.
pub type RoleSet = BTreeSet<AgentRole>;

/// Builds a [`RoleSet`] from an iterator of role-like items, deduplicating.
pub fn role_set<I, S>(roles: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: Into<AgentRole>,
{
    roles.into_iter().map(Into::into).collect()
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
