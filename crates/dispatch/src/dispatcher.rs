// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ingress loop: dequeues one command at a time from `cmds.queue`,
//! runs interceptors, routes internal commands to the [`InternalCommandHandler`]
//! and everything else to its resolved destinations (spec §4.E).

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rl_broker::{agent_queue, ingress_queue, job_log, BrokerStore, LifecycleTracker, BLOCK_FOREVER};
use rl_core::{role_set, AgentId, Clock, Command, CommandResult, DispatchMode};
use rl_registry::AgentRegistry;
use rl_wire::{decode_command, encode_command};

use crate::interceptor::InterceptorRegistry;
use crate::internal::InternalCommandHandler;

/// How long the ingress loop backs off after a broker transport error
/// before retrying the same dequeue (spec §7).
const BROKER_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// The single long-running ingress task.
pub struct Dispatcher<C: Clock> {
    broker: Arc<dyn BrokerStore>,
    registry: Arc<AgentRegistry>,
    lifecycle: Arc<LifecycleTracker>,
    interceptors: Arc<InterceptorRegistry>,
    internal: Arc<InternalCommandHandler>,
    clock: C,
}

impl<C: Clock> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            broker: self.broker.clone(),
            registry: self.registry.clone(),
            lifecycle: self.lifecycle.clone(),
            interceptors: self.interceptors.clone(),
            internal: self.internal.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(
        broker: Arc<dyn BrokerStore>,
        registry: Arc<AgentRegistry>,
        lifecycle: Arc<LifecycleTracker>,
        interceptors: Arc<InterceptorRegistry>,
        internal: Arc<InternalCommandHandler>,
        clock: C,
    ) -> Self {
        Self { broker, registry, lifecycle, interceptors, internal, clock }
    }

    /// Runs the ingress loop forever.
    pub async fn run(&self) {
        loop {
            self.dispatch_next().await;
        }
    }

    /// Processes exactly one command: dequeue, intercept, route. Exposed
    /// separately from [`Self::run`] so tests can drive it one step at a
    /// time.
    pub async fn dispatch_next(&self) {
        let command = self.dequeue_next().await;
        self.dispatch(command).await;
    }

    async fn dequeue_next(&self) -> Command {
        loop {
            match self.broker.blocking_dequeue(ingress_queue(), BLOCK_FOREVER).await {
                Ok(Some(raw)) => match decode_command(&raw) {
                    Ok(command) => match command.validate() {
                        Ok(()) => return command,
                        Err(err) => {
                            tracing::warn!(cmd_id = %command.id, error = %err, "dropping command that fails validation");
                            continue;
                        }
                    },
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping malformed command payload");
                        continue;
                    }
                },
                Ok(None) => continue,
                Err(err) if err.is_format_error() => {
                    tracing::warn!(error = %err, "dropping malformed broker reply");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ingress dequeue failed, retrying");
                    tokio::time::sleep(BROKER_RETRY_BACKOFF).await;
                    continue;
                }
            }
        }
    }

    async fn dispatch(&self, mut command: Command) {
        self.interceptors.apply(&mut command).await;

        if command.is_internal() {
            let this = self.clone();
            tokio::spawn(async move { this.handle_internal(command).await });
            return;
        }

        self.route(command).await;
    }

    async fn handle_internal(&self, command: Command) {
        let now_ms = self.clock.epoch_ms() as i64;
        let result = self.internal.handle(&command, now_ms).await;
        if let Err(err) = self.lifecycle.publish_result(&result).await {
            tracing::warn!(cmd_id = %command.id, error = %err, "failed to publish internal command result");
        }
    }

    async fn route(&self, command: Command) {
        self.append_to_log(&command).await;

        match self.resolve_destinations(&command) {
            Ok(destinations) => self.deliver(&command, &destinations).await,
            Err(terminal) => self.finish_with_terminal(&command, terminal).await,
        }
    }

    /// Resolves a command's destination agents, or the terminal `ERROR`
    /// result to publish when none are reachable (spec §4.E steps 4a/4b).
    fn resolve_destinations(&self, command: &Command) -> Result<Vec<AgentId>, CommandResult> {
        let now_ms = self.clock.epoch_ms() as i64;
        match command.dispatch_mode() {
            DispatchMode::Direct(agent) => {
                if self.registry.is_connected(&agent) {
                    Ok(vec![agent])
                } else {
                    Err(CommandResult::error(command.id.clone(), agent.grid, agent.node, "agent not alive", now_ms))
                }
            }
            DispatchMode::RoleBased => {
                // `grid == 0` means "any grid" in role mode; the Dispatcher
                // resolves that wildcard here, not inside `Filter` (spec §9,
                // Resolved Open Question 3).
                let grid = if command.grid > 0 { Some(command.grid) } else { None };
                let required = role_set(command.roles.iter().map(|r| r.as_str()));
                let active = self.registry.filter(grid, Some(&required));

                if active.is_empty() {
                    let roles = command
                        .roles
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    return Err(CommandResult::error(
                        command.id.clone(),
                        command.grid,
                        command.node,
                        format!("no agents with role {roles} alive"),
                        now_ms,
                    ));
                }

                if command.fanout {
                    Ok(active)
                } else {
                    let index = rand::rng().random_range(0..active.len());
                    Ok(vec![active[index]])
                }
            }
        }
    }

    async fn deliver(&self, command: &Command, destinations: &[AgentId]) {
        let now_ms = self.clock.epoch_ms() as i64;
        for agent in destinations {
            let encoded = match encode_command(command) {
                Ok(encoded) => encoded,
                Err(err) => {
                    tracing::warn!(cmd_id = %command.id, error = %err, "failed to encode command for delivery");
                    continue;
                }
            };
            if let Err(err) = self.broker.enqueue(&agent_queue(agent), &encoded).await {
                tracing::warn!(%agent, cmd_id = %command.id, error = %err, "failed to enqueue command for agent");
                continue;
            }
            if let Err(err) = self.lifecycle.record_queued(&command.id, *agent, now_ms).await {
                tracing::warn!(%agent, cmd_id = %command.id, error = %err, "failed to record QUEUED state");
            }
        }
        self.signal_queued(command).await;
    }

    async fn finish_with_terminal(&self, command: &Command, terminal: CommandResult) {
        if let Err(err) = self.lifecycle.publish_result(&terminal).await {
            tracing::warn!(cmd_id = %command.id, error = %err, "failed to publish terminal result");
        }
        self.signal_queued(command).await;
    }

    /// `LPUSH joblog <command>`, grounded in
    /// `original_source/redisdata/commandlogger.go`.
    async fn append_to_log(&self, command: &Command) {
        let entry = encode_command(command).unwrap_or_else(|_| format!("{command:?}"));
        if let Err(err) = self.broker.enqueue(job_log(), &entry).await {
            tracing::warn!(cmd_id = %command.id, error = %err, "failed to append command to log sink");
        }
    }

    async fn signal_queued(&self, command: &Command) {
        if let Err(err) = self.lifecycle.signal_queued(&command.id).await {
            tracing::warn!(cmd_id = %command.id, error = %err, "failed to signal queued");
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
