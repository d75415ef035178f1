// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by a [`crate::BrokerStore`] implementation.
///
/// The dispatcher treats these two variants very differently (spec §7):
/// a `Transport` error means the broker itself is unreachable and the
/// caller should back off and retry the same operation; a `Format` error
/// means the broker answered but the payload it handed back doesn't parse,
/// which is fatal only to that one payload.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker transport error: {0}")]
    Transport(String),

    #[error("broker payload format error: {0}")]
    Format(String),
}

impl BrokerError {
    pub fn is_transport_error(&self) -> bool {
        matches!(self, BrokerError::Transport(_))
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, BrokerError::Format(_))
    }
}

impl From<redis::RedisError> for BrokerError {
    fn from(err: redis::RedisError) -> Self {
        // `TypeError`/`ResponseError` mean the broker answered but the reply
        // shape didn't match what we asked for (e.g. a value that isn't the
        // bulk string we requested) — a format problem with that one reply,
        // not an unreachable broker. Everything else (I/O, connection
        // refused/dropped, timeout) is transport.
        match err.kind() {
            redis::ErrorKind::TypeError | redis::ErrorKind::ResponseError => {
                BrokerError::Format(err.to_string())
            }
            _ => BrokerError::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
