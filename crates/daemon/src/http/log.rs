// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /:grid/:node/log`: raw body bytes appended to the agent's own log
//! queue. Grounded in `original_source/rest/rest.go`'s `logs` handler — this
//! is a **distinct** sink from the dispatcher's `joblog`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use rl_broker::agent_log_queue;
use rl_core::{AgentId, Clock};

use super::AppState;

pub async fn append_log<C: Clock>(
    Path((grid, node)): Path<(u64, u64)>,
    State(state): State<AppState<C>>,
    body: Bytes,
) -> impl IntoResponse {
    let agent = AgentId::new(grid, node);
    let payload = String::from_utf8_lossy(&body);

    if let Err(err) = state.broker.enqueue(&agent_log_queue(&agent), &payload).await {
        tracing::warn!(%agent, error = %err, "failed to append agent log");
    }

    Json("ok")
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
