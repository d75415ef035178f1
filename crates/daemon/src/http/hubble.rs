// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /:grid/:node/hubble`: a reverse proxy to an agent-side diagnostics
//! UI in the original implementation. Out of scope per the spec's external
//! collaborator exclusions — this route exists only to answer `501` instead
//! of `404`, so callers can tell "unimplemented" from "unknown route".

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn hubble_stub(Path((_grid, _node)): Path<(u64, u64)>) -> impl IntoResponse {
    (StatusCode::NOT_IMPLEMENTED, "hubble proxying is not implemented")
}

#[cfg(test)]
#[path = "hubble_tests.rs"]
mod tests;
