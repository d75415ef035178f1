use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use rl_broker::{agent_log_queue, InMemoryBroker, LifecycleTracker};
use rl_core::{AgentId, FakeClock};
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
async fn appends_raw_body_to_the_agents_log_queue() {
    let state = test_state();
    let agent = AgentId::new(3, 9);

    append_log(Path((3, 9)), State(state.clone()), Bytes::from_static(b"hello from agent")).await;

    let stored = state.broker.blocking_dequeue(&agent_log_queue(&agent), std::time::Duration::from_millis(10)).await.unwrap();
    assert_eq!(stored, Some("hello from agent".to_string()));
}
