// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handles commands addressed to the controller itself
//! (`cmd.cmd == "controller"`), dispatched on `cmd.args.name`.
//!
//! Grounded in `schedule.go`'s `Add`/`List`/`Remove` (the sub-commands a
//! client drives the scheduler with) and `core/agents.go`'s
//! `ConnectedAgents`/`GetRoles` (the `list_agents` read). The containing
//! command's own id doubles as the scheduled-job id for `scheduler_add` /
//! `scheduler_remove`, matching the original's `job.ID = cmd.ID`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rl_core::{AgentId, Command, CommandResult, CommandState};
use rl_registry::AgentRegistry;
use rl_wire::decode_scheduled_job;
use serde_json::Value;

use crate::error::InternalError;
use crate::scheduler::Scheduler;

/// One registered internal sub-command.
#[async_trait]
pub trait InternalHandler: Send + Sync {
    async fn handle(&self, command: &Command) -> Result<Value, InternalError>;
}

/// Looks up `cmd.args.name` in a registered table and produces the
/// terminal [`CommandResult`] to publish (spec §4.H): `SUCCESS`/`level=20`
/// on success, `ERROR` on handler failure, `UNKNOWN_CMD` when the
/// sub-command isn't registered.
pub struct InternalCommandHandler {
    handlers: HashMap<&'static str, Arc<dyn InternalHandler>>,
}

impl InternalCommandHandler {
    pub fn new(registry: Arc<AgentRegistry>, scheduler: Arc<Scheduler>) -> Self {
        let mut handlers: HashMap<&'static str, Arc<dyn InternalHandler>> = HashMap::new();
        handlers.insert("list_agents", Arc::new(ListAgents { registry }));
        handlers.insert("scheduler_add", Arc::new(SchedulerAdd { scheduler: scheduler.clone() }));
        handlers.insert("scheduler_list", Arc::new(SchedulerList { scheduler: scheduler.clone() }));
        handlers.insert("scheduler_remove", Arc::new(SchedulerRemove { scheduler }));
        Self { handlers }
    }

    pub async fn handle(&self, command: &Command, now_ms: i64) -> CommandResult {
        let AgentId { grid, node } = command.target_agent();

        let Some(handler) = self.handlers.get(command.args.name.as_str()) else {
            return CommandResult {
                id: command.id.clone(),
                grid,
                node,
                state: CommandState::UnknownCmd,
                data: format!("unknown internal command: {}", command.args.name),
                level: 40,
                start_time: now_ms,
            };
        };

        match handler.handle(command).await {
            Ok(value) => CommandResult {
                id: command.id.clone(),
                grid,
                node,
                state: CommandState::Success,
                data: value.to_string(),
                level: 20,
                start_time: now_ms,
            },
            Err(err) => CommandResult {
                id: command.id.clone(),
                grid,
                node,
                state: CommandState::Error,
                data: err.to_string(),
                level: 40,
                start_time: now_ms,
            },
        }
    }
}

struct ListAgents {
    registry: Arc<AgentRegistry>,
}

#[async_trait]
impl InternalHandler for ListAgents {
    async fn handle(&self, _command: &Command) -> Result<Value, InternalError> {
        let agents: Vec<Value> = self
            .registry
            .connected_agents()
            .into_iter()
            .map(|id| {
                let roles = self.registry.get_roles(&id).unwrap_or_default();
                serde_json::json!({
                    "grid": id.grid,
                    "node": id.node,
                    "roles": roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        Ok(Value::Array(agents))
    }
}

struct SchedulerAdd {
    scheduler: Arc<Scheduler>,
}

#[async_trait]
impl InternalHandler for SchedulerAdd {
    async fn handle(&self, command: &Command) -> Result<Value, InternalError> {
        let parsed = decode_scheduled_job(&command.data)?;
        self.scheduler
            .add(command.id.to_string(), parsed.cron_expr, parsed.cmd_template)
            .await?;
        Ok(Value::Bool(true))
    }
}

struct SchedulerList {
    scheduler: Arc<Scheduler>,
}

#[async_trait]
impl InternalHandler for SchedulerList {
    async fn handle(&self, _command: &Command) -> Result<Value, InternalError> {
        let jobs = self.scheduler.list().await?;
        Ok(serde_json::to_value(jobs)?)
    }
}

struct SchedulerRemove {
    scheduler: Arc<Scheduler>,
}

#[async_trait]
impl InternalHandler for SchedulerRemove {
    async fn handle(&self, command: &Command) -> Result<Value, InternalError> {
        let removed = self.scheduler.remove(command.id.as_str()).await?;
        Ok(Value::Bool(removed))
    }
}

#[cfg(test)]
#[path = "internal_tests.rs"]
mod tests;
