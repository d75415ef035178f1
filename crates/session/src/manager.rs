// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lazy, per-agent session table: one [`PollSession`](crate::session)
//! task per agent that has ever polled, started on first contact and
//! restarted on first contact after eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rl_broker::{BrokerStore, LifecycleTracker};
use rl_core::{AgentId, Clock, RoleSet};
use rl_registry::AgentRegistry;
use tokio::sync::oneshot;

use crate::gate::{PollData, RequestGate};
use crate::session::{self, SessionHandle, AGENT_INACTIVE_TIMEOUT};

pub struct SessionManager<C: Clock> {
    sessions: Mutex<HashMap<AgentId, SessionHandle>>,
    registry: Arc<AgentRegistry>,
    broker: Arc<dyn BrokerStore>,
    lifecycle: Arc<LifecycleTracker>,
    clock: C,
    inactivity_timeout: Duration,
}

impl<C: Clock> SessionManager<C> {
    pub fn new(
        registry: Arc<AgentRegistry>,
        broker: Arc<dyn BrokerStore>,
        lifecycle: Arc<LifecycleTracker>,
        clock: C,
    ) -> Self {
        Self::with_inactivity_timeout(registry, broker, lifecycle, clock, AGENT_INACTIVE_TIMEOUT)
    }

    /// Same as [`Self::new`], with an overridable inactivity timeout so
    /// tests don't need a real 30-second wait to see eviction happen.
    pub fn with_inactivity_timeout(
        registry: Arc<AgentRegistry>,
        broker: Arc<dyn BrokerStore>,
        lifecycle: Arc<LifecycleTracker>,
        clock: C,
        inactivity_timeout: Duration,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            registry,
            broker,
            lifecycle,
            clock,
            inactivity_timeout,
        }
    }

    /// Submits one long-poll request for `agent_id`, lazily spawning its
    /// session (or replacing a dead one) if needed. Returns once the
    /// session has accepted the poll, handing back the receiver the caller
    /// awaits for a command.
    pub async fn poll(&self, agent_id: AgentId, roles: RoleSet) -> oneshot::Receiver<rl_core::Command> {
        let gate = self.gate_for(agent_id);
        let (command_out, command_in) = oneshot::channel();
        gate.send(PollData { roles, command_out }).await;
        command_in
    }

    /// How many sessions are currently tracked, live or not — mostly useful
    /// for tests and diagnostics.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    fn gate_for(&self, agent_id: AgentId) -> Arc<RequestGate> {
        let mut sessions = self.sessions.lock();
        if let Some(handle) = sessions.get(&agent_id) {
            if !handle.is_dead() {
                return handle.gate.clone();
            }
        }
        let handle = session::spawn_with_timeout(
            agent_id,
            self.registry.clone(),
            self.broker.clone(),
            self.lifecycle.clone(),
            self.clock.clone(),
            self.inactivity_timeout,
        );
        let gate = handle.gate.clone();
        sessions.insert(agent_id, handle);
        gate
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
