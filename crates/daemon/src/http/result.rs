// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /:grid/:node/result`: a terminal (or `RUNNING`) result posted by an
//! agent. Grounded in `original_source/rest/rest.go`'s `result` handler,
//! whose `HSET`-then-`RPUSH` sequence is exactly what
//! [`rl_broker::LifecycleTracker::publish_result`] already does, so this
//! handler is a thin decode-and-delegate.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rl_core::Clock;
use rl_wire::decode_result;

use super::AppState;

pub async fn submit_result<C: Clock>(
    Path((_grid, _node)): Path<(u64, u64)>,
    State(state): State<AppState<C>>,
    body: Bytes,
) -> impl IntoResponse {
    let raw = String::from_utf8_lossy(&body);
    let result = match decode_result(&raw) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(error = %err, "malformed result payload");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json("json error"));
        }
    };

    if let Err(err) = state.lifecycle.publish_result(&result).await {
        tracing::warn!(id = %result.id, error = %err, "failed to publish result");
        return (StatusCode::INTERNAL_SERVER_ERROR, Json("body error"));
    }

    (StatusCode::OK, Json("ok"))
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
