// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use rl_broker::BrokerError;
use rl_wire::WireError;

/// Errors surfaced while routing a command (spec §7's `NoEligibleAgents` /
/// `AgentNotAlive` taxonomy entries).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Errors an [`crate::interceptor::Interceptor`] can raise. An interceptor
/// failure never aborts dispatch (see `interceptor.go`'s `InterceptCommand`):
/// the command is forwarded unmodified and the failure is logged.
#[derive(Debug, Error)]
pub enum InterceptorError {
    #[error("command data is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("command data has no '{0}' field")]
    MissingField(&'static str),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Errors an internal-command [`crate::internal::InternalHandler`] can
/// raise. Surfaced to the caller as a terminal `ERROR` lifecycle state.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("invalid cron expression: {0}")]
    InvalidCron(String),

    #[error("scheduled job data is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors surfaced by [`crate::scheduler::Scheduler`] mutation operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("invalid cron expression '{0}': {1}")]
    InvalidCron(String, String),
}

impl From<SchedulerError> for InternalError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Broker(e) => InternalError::Broker(e),
            SchedulerError::Wire(e) => InternalError::Wire(e),
            SchedulerError::InvalidCron(expr, reason) => {
                InternalError::InvalidCron(format!("{expr}: {reason}"))
            }
        }
    }
}
