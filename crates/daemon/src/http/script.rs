// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /:grid/:node/script?hash=`: fetches a content-addressed script body
//! previously stored by the jumpscript-content interceptor. Grounded in
//! `original_source/rest/rest.go`'s `script` handler.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::Query;
use rl_core::Clock;
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ScriptQuery {
    pub(crate) hash: Option<String>,
}

pub async fn fetch_script<C: Clock>(
    Path((_grid, _node)): Path<(u64, u64)>,
    Query(query): Query<ScriptQuery>,
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    let Some(hash) = query.hash else {
        return (StatusCode::BAD_REQUEST, "Missing 'hash' param".to_string());
    };

    match state.broker.get(&hash).await {
        Ok(Some(payload)) => (StatusCode::OK, payload),
        Ok(None) => (StatusCode::NOT_FOUND, format!("Script with hash '{hash}' not found")),
        Err(err) => {
            tracing::warn!(hash, error = %err, "script lookup failed");
            (StatusCode::NOT_FOUND, format!("Script with hash '{hash}' not found"))
        }
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
