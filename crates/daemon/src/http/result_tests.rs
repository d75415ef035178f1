use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use rl_broker::{lifecycle_map, result_fan_in, scheduler_field, InMemoryBroker, LifecycleTracker};
use rl_core::{AgentId, CommandId, CommandResult, FakeClock};
use rl_registry::AgentRegistry;
use rl_session::SessionManager;
use rl_wire::encode_result;

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
async fn publishes_a_decoded_result_into_the_lifecycle_hash_and_fan_in_queue() {
    let state = test_state();
    let agent = AgentId::new(0, 5);
    let result = CommandResult::running(CommandId::from("c9"), agent.grid, agent.node, 1_000);
    let body = Bytes::from(encode_result(&result).unwrap());

    let response = submit_result(Path((0, 5)), State(state.clone()), body).await.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let hash = state.broker.hash_get_all(&lifecycle_map("c9")).await.unwrap();
    assert!(hash.iter().any(|(field, _)| field == &scheduler_field(&agent)));

    let fanned = state.broker.blocking_dequeue(&result_fan_in("c9", &agent), std::time::Duration::from_millis(10)).await.unwrap();
    assert!(fanned.is_some());
}

#[tokio::test]
async fn malformed_body_is_rejected_without_touching_the_broker() {
    let state = test_state();
    let response = submit_result(Path((0, 0)), State(state), Bytes::from_static(b"not json")).await.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
