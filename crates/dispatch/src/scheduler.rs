// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron-like recurring commands, materialised into the ingress queue.
//!
//! Grounded in `original_source/schedule.go`: a job's `Run()` deep-copies
//! its template and stamps a fresh id before `RPUSH`-ing to `cmds.queue`;
//! `Add`/`Remove` persist to the `controller.schedule` hash and then
//! `restart()` the whole cron runner rather than editing a live job in
//! place — "the only source of truth for the running set, so a
//! crash/restart cycle reproduces the state" (spec §4.G).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rl_broker::{controller_schedule, ingress_queue, BrokerStore};
use rl_core::{Command, CommandId, ScheduledJob};
use rl_wire::{decode_scheduled_job, encode_command, encode_scheduled_job};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::SchedulerError;

struct Runner {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self { token: CancellationToken::new(), handles: Vec::new() }
    }
}

/// Cron runner plus mutation operations over the `controller.schedule`
/// broker hash.
pub struct Scheduler {
    broker: Arc<dyn BrokerStore>,
    runner: Mutex<Runner>,
}

impl Scheduler {
    pub fn new(broker: Arc<dyn BrokerStore>) -> Self {
        Self { broker, runner: Mutex::new(Runner::default()) }
    }

    /// Scans the persisted schedule and starts the cron runner. Call once
    /// at startup.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        self.restart().await
    }

    /// Validates the cron expression, stores the template under `id`
    /// (overwriting any existing job with that id), and restarts the
    /// runner so the new job takes effect.
    pub async fn add(&self, id: String, cron_expr: String, cmd_template: Command) -> Result<(), SchedulerError> {
        parse_cron(&cron_expr).map_err(|reason| SchedulerError::InvalidCron(cron_expr.clone(), reason))?;
        let job = ScheduledJob { id: id.clone(), cron_expr, cmd_template };
        let encoded = encode_scheduled_job(&job)?;
        self.broker.hash_set(controller_schedule(), &id, &encoded).await?;
        self.restart().await
    }

    /// Deletes the job with the given id, restarting the runner only if a
    /// job actually existed.
    pub async fn remove(&self, id: &str) -> Result<bool, SchedulerError> {
        let existed = self
            .broker
            .hash_get_all(controller_schedule())
            .await?
            .iter()
            .any(|(field, _)| field == id);
        if existed {
            self.broker.hash_delete(controller_schedule(), id).await?;
            self.restart().await?;
        }
        Ok(existed)
    }

    /// Every persisted scheduled job.
    pub async fn list(&self) -> Result<Vec<ScheduledJob>, SchedulerError> {
        load_jobs(&*self.broker).await
    }

    async fn restart(&self) -> Result<(), SchedulerError> {
        let jobs = load_jobs(&*self.broker).await?;
        let token = CancellationToken::new();
        let handles = jobs
            .into_iter()
            .map(|job| tokio::spawn(run_job(self.broker.clone(), job, token.clone())))
            .collect();

        let mut runner = self.runner.lock();
        runner.token.cancel();
        for handle in runner.handles.drain(..) {
            handle.abort();
        }
        runner.token = token;
        runner.handles = handles;
        Ok(())
    }
}

async fn load_jobs(broker: &dyn BrokerStore) -> Result<Vec<ScheduledJob>, SchedulerError> {
    let mut jobs = Vec::new();
    let mut cursor = 0;
    loop {
        let page = broker.hash_scan(controller_schedule(), cursor).await?;
        for (field, payload) in page.items {
            match decode_scheduled_job(&payload) {
                Ok(mut job) => {
                    // The hash field is the authoritative id, matching the
                    // original's `job.ID = key` on load.
                    job.id = field;
                    jobs.push(job);
                }
                Err(err) => {
                    tracing::warn!(field, error = %err, "dropping malformed scheduled job");
                }
            }
        }
        cursor = page.next_cursor;
        if cursor == 0 {
            break;
        }
    }
    Ok(jobs)
}

/// One cron entry's firing loop: sleep until the next occurrence, fire,
/// repeat, until cancelled by a runner restart.
async fn run_job(broker: Arc<dyn BrokerStore>, job: ScheduledJob, token: CancellationToken) {
    let schedule = match parse_cron(&job.cron_expr) {
        Ok(schedule) => schedule,
        Err(reason) => {
            tracing::warn!(job_id = %job.id, %reason, "invalid cron expression, not scheduling job");
            return;
        }
    };

    loop {
        let now = chrono::Utc::now();
        let Some(next) = schedule.after(&now).next() else {
            return;
        };
        let sleep_for = (next - now).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(sleep_for) => {}
        }

        fire(&*broker, &job).await;
    }
}

async fn fire(broker: &dyn BrokerStore, job: &ScheduledJob) {
    let mut synthesized = job.cmd_template.clone();
    synthesized.id = CommandId::new_synthesized();
    match encode_command(&synthesized) {
        Ok(payload) => {
            if let Err(err) = broker.enqueue(ingress_queue(), &payload).await {
                tracing::warn!(job_id = %job.id, error = %err, "failed to enqueue synthesized command");
            }
        }
        Err(err) => {
            tracing::warn!(job_id = %job.id, error = %err, "failed to encode synthesized command");
        }
    }
}

/// `cron` requires a seconds field; the spec accepts standard 5-field
/// crontab syntax too, so a bare 5-field expression gets `0` seconds
/// prepended (same normalization the pack's cron-expression parsers use).
fn parse_cron(expr: &str) -> Result<cron::Schedule, String> {
    let normalized = normalize_cron_expr(expr)?;
    cron::Schedule::from_str(&normalized).map_err(|err| err.to_string())
}

fn normalize_cron_expr(expr: &str) -> Result<String, String> {
    let trimmed = expr.trim();
    match trimmed.split_whitespace().count() {
        5 => Ok(format!("0 {trimmed}")),
        6 | 7 => Ok(trimmed.to_string()),
        n => Err(format!("expected a 5- or 6-field cron expression, got {n} fields")),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
