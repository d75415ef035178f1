// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The axum HTTP surface agents talk to (spec §6). Routes are parameterized
//! by `<grid>/<node>`; the 60s per-request timeout lives inside the `/cmd`
//! handler itself rather than as generic middleware, since it has to
//! interact with the poll-session rendezvous (SPEC_FULL §6).

mod cmd;
mod event;
mod hubble;
mod log;
mod result;
mod script;
mod stats;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use rl_broker::{BrokerStore, LifecycleTracker};
use rl_core::Clock;
use rl_registry::AgentRegistry;
use rl_session::SessionManager;
use tower_http::trace::TraceLayer;

use crate::handler::EventHandler;
use crate::metrics::MetricsSink;

/// Total budget for one `/cmd` long-poll request: handshake + command wait.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AppState<C: Clock> {
    pub broker: Arc<dyn BrokerStore>,
    pub registry: Arc<AgentRegistry>,
    pub lifecycle: Arc<LifecycleTracker>,
    pub sessions: Arc<SessionManager<C>>,
    pub metrics: Arc<dyn MetricsSink>,
    pub events: Arc<dyn EventHandler>,
}

impl<C: Clock> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            broker: self.broker.clone(),
            registry: self.registry.clone(),
            lifecycle: self.lifecycle.clone(),
            sessions: self.sessions.clone(),
            metrics: self.metrics.clone(),
            events: self.events.clone(),
        }
    }
}

pub fn build_router<C: Clock>(state: AppState<C>) -> Router {
    Router::new()
        .route("/:grid/:node/cmd", get(cmd::poll_command::<C>))
        .route("/:grid/:node/log", post(log::append_log::<C>))
        .route("/:grid/:node/result", post(result::submit_result::<C>))
        .route("/:grid/:node/stats", post(stats::submit_stats::<C>))
        .route("/:grid/:node/event", post(event::announce_event::<C>))
        .route("/:grid/:node/hubble", get(hubble::hubble_stub))
        .route("/:grid/:node/script", get(script::fetch_script::<C>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
