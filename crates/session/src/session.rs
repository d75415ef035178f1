// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-agent long-poll session: `Idle -> AwaitingCommand -> Handoff ->
//! Idle`, terminal `Dead` on inactivity.

use std::sync::Arc;
use std::time::Duration;

use rl_broker::{agent_queue, BrokerStore, LifecycleTracker, BLOCK_FOREVER};
use rl_core::{AgentId, Clock};
use rl_registry::AgentRegistry;
use rl_wire::decode_command;
use tokio::task::JoinHandle;

use crate::gate::{PollData, RequestGate};

/// A session with no poll in `AGENT_INACTIVE_TIMEOUT` transitions to `Dead`.
pub const AGENT_INACTIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `AwaitingCommand` backs off after a broker transport error
/// before retrying the same dequeue, without leaving the state (spec §7).
const BROKER_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// A running session task plus the gate used to hand it poll requests.
pub struct SessionHandle {
    pub gate: Arc<RequestGate>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Whether the session task has reached `Dead` and exited.
    pub fn is_dead(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a new session task for `agent_id` and returns its handle.
pub fn spawn<C: Clock>(
    agent_id: AgentId,
    registry: Arc<AgentRegistry>,
    broker: Arc<dyn BrokerStore>,
    lifecycle: Arc<LifecycleTracker>,
    clock: C,
) -> SessionHandle {
    spawn_with_timeout(agent_id, registry, broker, lifecycle, clock, AGENT_INACTIVE_TIMEOUT)
}

/// Same as [`spawn`], with an overridable inactivity timeout — production
/// code always gets [`AGENT_INACTIVE_TIMEOUT`] via [`spawn`]; tests use a
/// short one here so eviction doesn't need a real 30-second wait.
pub(crate) fn spawn_with_timeout<C: Clock>(
    agent_id: AgentId,
    registry: Arc<AgentRegistry>,
    broker: Arc<dyn BrokerStore>,
    lifecycle: Arc<LifecycleTracker>,
    clock: C,
    inactivity_timeout: Duration,
) -> SessionHandle {
    let gate = Arc::new(RequestGate::new());
    let task = tokio::spawn(run(
        agent_id,
        gate.clone(),
        registry,
        broker,
        lifecycle,
        clock,
        inactivity_timeout,
    ));
    SessionHandle { gate, task }
}

async fn run<C: Clock>(
    agent_id: AgentId,
    gate: Arc<RequestGate>,
    registry: Arc<AgentRegistry>,
    broker: Arc<dyn BrokerStore>,
    lifecycle: Arc<LifecycleTracker>,
    clock: C,
    inactivity_timeout: Duration,
) {
    let queue = agent_queue(&agent_id);

    loop {
        // Idle
        let poll_data = match gate.recv(inactivity_timeout).await {
            Some(poll_data) => poll_data,
            None => break,
        };
        registry.set_roles(agent_id, poll_data.roles);

        // AwaitingCommand
        let (raw, command) = dequeue_one(&*broker, &queue).await;
        let command_id = command.id.clone();

        // Handoff: a non-blocking send, since `oneshot::Sender::send` never
        // awaits — it either finds a live receiver or hands the value
        // straight back.
        match poll_data.command_out.send(command) {
            Ok(()) => {
                let now_ms = clock.epoch_ms() as i64;
                if let Err(err) = lifecycle.record_running(&command_id, agent_id, now_ms).await {
                    tracing::warn!(%agent_id, error = %err, "failed to record RUNNING");
                }
            }
            Err(_undelivered) => {
                if let Err(err) = broker.enqueue_front(&queue, &raw).await {
                    tracing::warn!(%agent_id, error = %err, "failed to requeue undelivered command");
                }
            }
        }
        // `PollData::command_out` is consumed above either way, closing the
        // channel and completing the handoff attempt.
    }

    registry.drop_agent(&agent_id);
}

/// Blocks until a well-formed command is available on `queue`, dropping
/// malformed payloads (logged) and backing off on transport errors without
/// leaving `AwaitingCommand`.
async fn dequeue_one(broker: &dyn BrokerStore, queue: &str) -> (String, rl_core::Command) {
    loop {
        match broker.blocking_dequeue(queue, BLOCK_FOREVER).await {
            Ok(Some(raw)) => match decode_command(&raw) {
                Ok(command) => return (raw, command),
                Err(err) => {
                    tracing::warn!(queue, error = %err, "dropping malformed command payload");
                    continue;
                }
            },
            Ok(None) => continue,
            Err(err) if err.is_format_error() => {
                tracing::warn!(queue, error = %err, "dropping malformed broker reply");
                continue;
            }
            Err(err) => {
                tracing::warn!(queue, error = %err, "broker dequeue failed, retrying");
                tokio::time::sleep(BROKER_RETRY_BACKOFF).await;
                continue;
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
