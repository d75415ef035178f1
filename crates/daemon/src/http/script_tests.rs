use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum_extra::extract::Query;
use rl_broker::{InMemoryBroker, LifecycleTracker};
use rl_core::FakeClock;
use rl_registry::AgentRegistry;
use rl_session::SessionManager;

use super::*;
use crate::handler::NoopEventHandler;
use crate::metrics::LoggingMetricsSink;

fn test_state() -> AppState<FakeClock> {
    let broker: Arc<dyn rl_broker::BrokerStore> = Arc::new(InMemoryBroker::new());
    let registry = Arc::new(AgentRegistry::new());
    let lifecycle = Arc::new(LifecycleTracker::new(broker.clone()));
    let sessions = Arc::new(SessionManager::new(registry.clone(), broker.clone(), lifecycle.clone(), FakeClock::new()));
    AppState {
        broker,
        registry,
        lifecycle,
        sessions,
        metrics: Arc::new(LoggingMetricsSink),
        events: Arc::new(NoopEventHandler),
    }
}

#[tokio::test]
async fn returns_a_stored_script_body() {
    let state = test_state();
    state.broker.set_with_ttl("abc123", "print('hi')", 3600).await.unwrap();

    let response = fetch_script(Path((0, 0)), Query(ScriptQuery { hash: Some("abc123".to_string()) }), State(state))
        .await
        .into_response();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

#[tokio::test]
async fn missing_hash_is_not_found() {
    let state = test_state();
    let response = fetch_script(Path((0, 0)), Query(ScriptQuery { hash: Some("nope".to_string()) }), State(state))
        .await
        .into_response();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_query_param_is_a_bad_request() {
    let state = test_state();
    let response = fetch_script(Path((0, 0)), Query(ScriptQuery { hash: None }), State(state))
        .await
        .into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}
