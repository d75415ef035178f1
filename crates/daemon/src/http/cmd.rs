// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /:grid/:node/cmd`: the agent long-poll. Grounded in
//! `original_source/rest/rest.go`'s `cmd` handler — it blocks the HTTP
//! response on the session rendezvous, capped at [`HTTP_REQUEST_TIMEOUT`].

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum_extra::extract::Query;
use rl_core::{role_set, AgentId, Clock};
use rl_wire::encode_command;
use serde::Deserialize;

use super::{AppState, HTTP_REQUEST_TIMEOUT};

#[derive(Debug, Deserialize)]
pub struct CmdQuery {
    #[serde(default)]
    pub role: Vec<String>,
}

pub async fn poll_command<C: Clock>(
    Path((grid, node)): Path<(u64, u64)>,
    Query(query): Query<CmdQuery>,
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    let agent = AgentId::new(grid, node);
    let roles = role_set(query.role);

    let outcome = tokio::time::timeout(HTTP_REQUEST_TIMEOUT, async {
        let receiver = state.sessions.poll(agent, roles).await;
        receiver.await
    })
    .await;

    match outcome {
        Ok(Ok(command)) => match encode_command(&command) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(%agent, error = %err, "failed to encode command for delivery");
                String::new()
            }
        },
        // Timed out waiting for a command, or the session dropped the
        // handoff channel without sending: nothing to deliver this poll.
        Ok(Err(_)) | Err(_) => String::new(),
    }
}

#[cfg(test)]
#[path = "cmd_tests.rs"]
mod tests;
