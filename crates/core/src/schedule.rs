// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron-like recurring command templates.

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// A recurring job persisted in the broker's `controller.schedule` hash,
/// keyed by `id`. Each firing synthesizes a fresh [`Command`] from
/// `cmd_template` with a new [`crate::CommandId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: String,
    #[serde(rename = "cronExpr")]
    pub cron_expr: String,
    #[serde(rename = "cmdTemplate")]
    pub cmd_template: Command,
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
