// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Literal queue/key names, matching `original_source/redisdata/redisdata.go`.

use rl_core::AgentId;

/// Ingress queue: external clients push commands here.
pub const INGRESS_QUEUE: &str = "cmds.queue";

/// Log sink: every dispatched command is appended here (`LPUSH joblog ...`).
pub const JOB_LOG: &str = "joblog";

/// Scheduler hash: recurring job definitions, keyed by job id.
pub const CONTROLLER_SCHEDULE: &str = "controller.schedule";

pub fn ingress_queue() -> &'static str {
    INGRESS_QUEUE
}

pub fn job_log() -> &'static str {
    JOB_LOG
}

pub fn controller_schedule() -> &'static str {
    CONTROLLER_SCHEDULE
}

/// Per-agent command queue: `cmds:<grid>:<node>`.
pub fn agent_queue(agent: &AgentId) -> String {
    agent.queue_name()
}

/// Lifecycle hash for a command: `jobresult:<id>`.
pub fn lifecycle_map(id: &str) -> String {
    format!("jobresult:{id}")
}

/// Lifecycle hash field for one destination agent: `"<grid>:<node>"`.
pub fn scheduler_field(agent: &AgentId) -> String {
    format!("{}:{}", agent.grid, agent.node)
}

/// Per-destination result fan-in queue: `cmd.<id>.<grid>.<node>`.
pub fn result_fan_in(id: &str, agent: &AgentId) -> String {
    format!("cmd.{}.{}.{}", id, agent.grid, agent.node)
}

/// Sentinel queue signaling every destination of a command has been queued:
/// `cmd.<id>.queued`.
pub fn queued_signal(id: &str) -> String {
    format!("cmd.{id}.queued")
}

/// Per-agent raw log sink, distinct from [`JOB_LOG`]: `<grid>:<node>:log`.
pub fn agent_log_queue(agent: &AgentId) -> String {
    format!("{}:{}:log", agent.grid, agent.node)
}
