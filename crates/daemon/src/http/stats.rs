// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /:grid/:node/stats`: a batch of agent-reported metric series.
//! Grounded in `original_source/rest/stats.go` — each series entry is a
//! `[key, value]` pair whose key gets split into the
//! [`crate::metrics::TAG_NAMES`] tags.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rl_core::Clock;
use serde::Deserialize;
use serde_json::Value;

use crate::metrics::{split_tags, MetricPoint};

use super::AppState;

#[derive(Debug, Deserialize)]
struct StatsRequest {
    timestamp: i64,
    series: Vec<Vec<Value>>,
}

pub async fn submit_stats<C: Clock>(
    Path((_grid, _node)): Path<(u64, u64)>,
    State(state): State<AppState<C>>,
    body: Bytes,
) -> impl IntoResponse {
    let batches: Vec<StatsRequest> = match serde_json::from_slice(&body) {
        Ok(batches) => batches,
        Err(err) => {
            tracing::warn!(error = %err, "malformed stats payload");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json("json error"));
        }
    };

    let mut points = Vec::new();
    for batch in &batches {
        for series in &batch.series {
            let Some(key) = series.first().and_then(Value::as_str) else {
                tracing::warn!("stats series entry missing a string key, dropping");
                continue;
            };
            let Some(value) = series.get(1).and_then(Value::as_f64) else {
                tracing::warn!(key, "invalid stats value, dropping");
                continue;
            };
            points.push(MetricPoint {
                timestamp: batch.timestamp,
                key: key.to_string(),
                tags: split_tags(key),
                value,
            });
        }
    }

    state.metrics.write(&points).await;
    (StatusCode::OK, Json("ok"))
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
