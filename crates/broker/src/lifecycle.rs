// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin wrapper over [`BrokerStore`] that knows the lifecycle hash/queue
//! shapes so callers write `RecordQueued`/`RecordRunning`/`PublishResult`/
//! `SignalQueued` instead of hand-building keys and payloads.

use std::sync::Arc;

use rl_core::{AgentId, CommandId, CommandResult};
use rl_wire::{encode_result, WireError};

use crate::error::BrokerError;
use crate::keys::{lifecycle_map, queued_signal, result_fan_in, scheduler_field};
use crate::store::BrokerStore;

/// Either layer this tracker sits on can fail a write: the broker itself
/// (`BrokerError`) or the payload it was asked to encode (`WireError`,
/// which can't actually happen for `CommandResult` but is threaded through
/// so the type stays honest about what `encode_result` returns).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error(transparent)]
    Wire(#[from] WireError),
}

pub struct LifecycleTracker {
    broker: Arc<dyn BrokerStore>,
}

impl LifecycleTracker {
    pub fn new(broker: Arc<dyn BrokerStore>) -> Self {
        Self { broker }
    }

    /// Writes a `QUEUED` placeholder into `jobresult:<id>` field `<grid:node>`.
    pub async fn record_queued(
        &self,
        id: &CommandId,
        agent: AgentId,
        now_ms: i64,
    ) -> Result<(), LifecycleError> {
        let result = CommandResult::queued(id.clone(), agent.grid, agent.node, now_ms);
        self.write(id, agent, &result).await
    }

    /// Overwrites the field to `RUNNING`.
    pub async fn record_running(
        &self,
        id: &CommandId,
        agent: AgentId,
        now_ms: i64,
    ) -> Result<(), LifecycleError> {
        let result = CommandResult::running(id.clone(), agent.grid, agent.node, now_ms);
        self.write(id, agent, &result).await
    }

    /// Overwrites the field to the terminal state carried by `result`, and
    /// pushes the same payload onto the per-destination fan-in queue so an
    /// external waiter watching this one command can pop it.
    pub async fn publish_result(&self, result: &CommandResult) -> Result<(), LifecycleError> {
        let agent = AgentId::new(result.grid, result.node);
        let encoded = encode_result(result)?;
        self.broker
            .hash_set(&lifecycle_map(result.id.as_str()), &scheduler_field(&agent), &encoded)
            .await?;
        self.broker
            .enqueue(&result_fan_in(result.id.as_str(), &agent), &encoded)
            .await?;
        Ok(())
    }

    /// Pushes a sentinel to `cmd.<id>.queued`, signaling that every
    /// destination of this command has a `QUEUED` placeholder written.
    pub async fn signal_queued(&self, id: &CommandId) -> Result<(), LifecycleError> {
        self.broker
            .enqueue(&queued_signal(id.as_str()), id.as_str())
            .await?;
        Ok(())
    }

    async fn write(
        &self,
        id: &CommandId,
        agent: AgentId,
        result: &CommandResult,
    ) -> Result<(), LifecycleError> {
        let encoded = encode_result(result)?;
        self.broker
            .hash_set(&lifecycle_map(id.as_str()), &scheduler_field(&agent), &encoded)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
