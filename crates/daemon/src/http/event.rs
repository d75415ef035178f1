// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /:grid/:node/event`: an agent-reported named event, dispatched to
//! the configured event-handler script. Grounded in
//! `original_source/rest/rest.go`'s `event` handler — the shell-out runs in
//! a detached goroutine there, so the HTTP response doesn't wait on it; the
//! same shape here is a spawned task.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rl_core::{AgentId, Clock};
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
struct EventRequest {
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    data: String,
}

pub async fn announce_event<C: Clock>(
    Path((grid, node)): Path<(u64, u64)>,
    State(state): State<AppState<C>>,
    body: Bytes,
) -> impl IntoResponse {
    let agent = AgentId::new(grid, node);
    let event: EventRequest = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(%agent, error = %err, "malformed event payload");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json("Error"));
        }
    };

    let handler = state.events.clone();
    tokio::spawn(async move {
        handler.handle(agent, &event.name).await;
    });

    (StatusCode::OK, Json("ok"))
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
