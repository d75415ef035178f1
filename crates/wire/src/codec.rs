// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rl_core::{Command, CommandResult, ScheduledJob};
use thiserror::Error;

/// Errors surfaced while encoding or decoding wire payloads.
#[derive(Debug, Error)]
pub enum WireError {
    /// The payload could not be decoded. Per spec §7 this is fatal only to
    /// the single payload it came from: log it, drop it, move on.
    #[error("command format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl WireError {
    pub fn is_format_error(&self) -> bool {
        matches!(self, WireError::Format(_))
    }
}

pub fn decode_command(raw: &str) -> Result<Command, WireError> {
    serde_json::from_str(raw).map_err(WireError::Format)
}

pub fn encode_command(command: &Command) -> Result<String, WireError> {
    serde_json::to_string(command).map_err(WireError::Format)
}

pub fn decode_result(raw: &str) -> Result<CommandResult, WireError> {
    serde_json::from_str(raw).map_err(WireError::Format)
}

pub fn encode_result(result: &CommandResult) -> Result<String, WireError> {
    serde_json::to_string(result).map_err(WireError::Format)
}

pub fn decode_scheduled_job(raw: &str) -> Result<ScheduledJob, WireError> {
    serde_json::from_str(raw).map_err(WireError::Format)
}

pub fn encode_scheduled_job(job: &ScheduledJob) -> Result<String, WireError> {
    serde_json::to_string(job).map_err(WireError::Format)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
