// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-handler shell-out: `original_source/rest/event.go` execs
//! `<handlers.binary> <name>.py <gid> <nid>` with the configured `cwd`/`env`
//! and pipes stdout/stderr to the log on completion. Out of scope per the
//! spec's "shell-out to event-handler scripts is an external collaborator"
//! exclusion — this crate defines the [`EventHandler`] trait at that
//! boundary and ships [`ProcessEventHandler`], the one real implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use rl_core::AgentId;
use tokio::process::Command as ProcessCommand;

use crate::config::HandlerSettings;

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, agent: AgentId, name: &str);
}

/// No handler binary configured: the event is acknowledged and dropped.
pub struct NoopEventHandler;

#[async_trait]
impl EventHandler for NoopEventHandler {
    async fn handle(&self, _agent: AgentId, _name: &str) {}
}

/// Shells out to `<binary> <name>.py <gid> <nid>`, grounded in
/// `event.go`'s `exec.Command` usage.
pub struct ProcessEventHandler {
    binary: String,
    cwd: String,
    env: HashMap<String, String>,
}

impl ProcessEventHandler {
    pub fn new(settings: &HandlerSettings) -> Self {
        Self { binary: settings.binary.clone(), cwd: settings.cwd.clone(), env: settings.env.clone() }
    }
}

#[async_trait]
impl EventHandler for ProcessEventHandler {
    async fn handle(&self, agent: AgentId, name: &str) {
        let mut command = ProcessCommand::new(&self.binary);
        command
            .arg(format!("{name}.py"))
            .arg(agent.grid.to_string())
            .arg(agent.node.to_string())
            .env_clear()
            .envs(&self.env);
        if !self.cwd.is_empty() {
            command.current_dir(&self.cwd);
        }

        match command.output().await {
            Ok(output) => {
                if !output.status.success() {
                    tracing::warn!(
                        %agent,
                        name,
                        status = %output.status,
                        stderr = %String::from_utf8_lossy(&output.stderr),
                        "event handler exited non-zero"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(%agent, name, error = %err, "failed to spawn event handler");
            }
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
