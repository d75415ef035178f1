// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rl-registry: the in-memory map of connected agents to their declared
//! roles.
//!
//! An entry is created on an agent's first poll and replaced on every
//! subsequent one; it's removed when that agent's [`rl_session`] poll
//! session terminates. A readers-writer lock protects the whole map — reads
//! never block on each other, and every value handed back to a caller is a
//! defensive copy, so a caller can't mutate registry state by holding onto
//! what it got back from `get_roles`.

use std::collections::HashMap;

use parking_lot::RwLock;
use rl_core::{AgentId, AgentRole, RoleSet};

/// In-memory map of connected agents to their declared roles.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<AgentId, RoleSet>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the role set for `id`, creating the entry if absent.
    pub fn set_roles(&self, id: AgentId, roles: RoleSet) {
        self.agents.write().insert(id, roles);
    }

    /// Returns a defensive copy of `id`'s current role set.
    pub fn get_roles(&self, id: &AgentId) -> Option<RoleSet> {
        self.agents.read().get(id).cloned()
    }

    pub fn has_role(&self, id: &AgentId, role: &AgentRole) -> bool {
        self.agents
            .read()
            .get(id)
            .is_some_and(|roles| roles.contains(role))
    }

    pub fn is_connected(&self, id: &AgentId) -> bool {
        self.agents.read().contains_key(id)
    }

    pub fn drop_agent(&self, id: &AgentId) {
        self.agents.write().remove(id);
    }

    /// Every currently-connected agent id, in no particular order.
    pub fn connected_agents(&self) -> Vec<AgentId> {
        self.agents.read().keys().copied().collect()
    }

    /// Agents whose grid equals `grid` (if given) and whose declared role
    /// set is a **superset** of `required_roles` (if given).
    ///
    /// `required_roles = None` matches every agent regardless of its roles.
    /// An agent with an empty declared role set only matches when
    /// `required_roles` is `None` or empty.
    pub fn filter(&self, grid: Option<u64>, required_roles: Option<&RoleSet>) -> Vec<AgentId> {
        self.agents
            .read()
            .iter()
            .filter(|(id, roles)| {
                grid.map_or(true, |g| id.grid == g)
                    && required_roles.map_or(true, |required| required.is_subset(roles))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
