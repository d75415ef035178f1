// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use rl_broker::{agent_queue, job_log, lifecycle_map, queued_signal, InMemoryBroker};
use rl_core::test_support::{direct_command, internal_command, role_command};
use rl_core::{role_set, AgentId, FakeClock};
use rl_wire::decode_result;

use super::*;

fn dispatcher() -> (Dispatcher<FakeClock>, Arc<dyn BrokerStore>, Arc<AgentRegistry>) {
    let broker: Arc<dyn BrokerStore> = Arc::new(InMemoryBroker::new());
    let registry = Arc::new(AgentRegistry::new());
    let lifecycle = Arc::new(LifecycleTracker::new(broker.clone()));
    let interceptors = Arc::new(InterceptorRegistry::new());
    let scheduler = Arc::new(crate::scheduler::Scheduler::new(broker.clone()));
    let internal = Arc::new(InternalCommandHandler::new(registry.clone(), scheduler));
    let clock = FakeClock::new();
    let dispatcher = Dispatcher::new(broker.clone(), registry.clone(), lifecycle, interceptors, internal, clock);
    (dispatcher, broker, registry)
}

async fn push_command(broker: &dyn BrokerStore, command: &rl_core::Command) {
    let encoded = encode_command(command).unwrap();
    broker.enqueue(ingress_queue(), &encoded).await.unwrap();
}

async fn wait_for_hash_field(broker: &dyn BrokerStore, map: &str, field: &str) -> String {
    for _ in 0..200 {
        if let Some(value) = broker
            .hash_get_all(map)
            .await
            .unwrap()
            .into_iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
        {
            return value;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("field {field} in {map} never appeared");
}

#[tokio::test]
async fn direct_dispatch_queues_then_reports_running_once_delivered() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 42), role_set(["node"]));

    let cmd = direct_command("c1", 0, 42);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let raw = broker.blocking_dequeue("cmds:0:42", Duration::from_millis(10)).await.unwrap().unwrap();
    let delivered = decode_command(&raw).unwrap();
    assert_eq!(delivered.id.as_str(), "c1");

    let result_raw = wait_for_hash_field(&*broker, &lifecycle_map("c1"), "0:42").await;
    let result = decode_result(&result_raw).unwrap();
    assert_eq!(result.state, rl_core::CommandState::Queued);

    broker.blocking_dequeue(&queued_signal("c1"), Duration::from_millis(10)).await.unwrap().expect("queued signal");
}

#[tokio::test]
async fn role_based_fanout_delivers_to_every_matching_agent() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 1), role_set(["node", "cpu"]));
    registry.set_roles(AgentId::new(0, 2), role_set(["node", "cpu"]));

    let cmd = role_command("c2", &["node", "cpu"], true);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    assert!(broker.blocking_dequeue(&agent_queue(&AgentId::new(0, 1)), Duration::from_millis(10)).await.unwrap().is_some());
    assert!(broker.blocking_dequeue(&agent_queue(&AgentId::new(0, 2)), Duration::from_millis(10)).await.unwrap().is_some());
}

#[tokio::test]
async fn role_based_non_fanout_delivers_to_exactly_one_agent() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 1), role_set(["node", "cpu"]));
    registry.set_roles(AgentId::new(0, 2), role_set(["node", "cpu"]));

    let cmd = role_command("c3", &["node", "cpu"], false);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let first = broker.blocking_dequeue(&agent_queue(&AgentId::new(0, 1)), Duration::from_millis(10)).await.unwrap();
    let second = broker.blocking_dequeue(&agent_queue(&AgentId::new(0, 2)), Duration::from_millis(10)).await.unwrap();
    assert_eq!(first.is_some() as u8 + second.is_some() as u8, 1, "exactly one agent should receive the command");
}

#[tokio::test]
async fn role_based_with_no_eligible_agents_records_terminal_error() {
    let (dispatcher, broker, _registry) = dispatcher();

    let cmd = role_command("c4", &["gpu"], false);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let result_raw = wait_for_hash_field(&*broker, &lifecycle_map("c4"), "0:0").await;
    let result = decode_result(&result_raw).unwrap();
    assert_eq!(result.state, rl_core::CommandState::Error);
    assert!(result.data.contains("gpu"));
}

#[tokio::test]
async fn direct_dispatch_to_disconnected_agent_records_terminal_error() {
    let (dispatcher, broker, _registry) = dispatcher();

    let cmd = direct_command("c5", 0, 99);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let result_raw = wait_for_hash_field(&*broker, &lifecycle_map("c5"), "0:99").await;
    let result = decode_result(&result_raw).unwrap();
    assert_eq!(result.state, rl_core::CommandState::Error);
    assert!(result.data.contains("not alive"));
}

#[tokio::test]
async fn internal_commands_are_handled_without_touching_any_agent_queue() {
    let (dispatcher, broker, _registry) = dispatcher();

    let cmd = internal_command("c6", "list_agents");
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let result_raw = wait_for_hash_field(&*broker, &lifecycle_map("c6"), "0:0").await;
    let result = decode_result(&result_raw).unwrap();
    assert_eq!(result.state, rl_core::CommandState::Success);
}

#[tokio::test]
async fn every_dispatched_command_is_appended_to_the_job_log() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 42), role_set(["node"]));

    let cmd = direct_command("c7", 0, 42);
    push_command(&*broker, &cmd).await;
    dispatcher.dispatch_next().await;

    let logged = broker.blocking_dequeue(job_log(), Duration::from_millis(10)).await.unwrap();
    assert!(logged.is_some());
}

#[tokio::test]
async fn command_failing_validation_is_dropped_without_blocking_the_loop() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 42), role_set(["node"]));

    // fanout=true with empty roles is rejected by `Command::validate` (spec
    // §3); it must never reach `dispatch_mode`/`resolve_destinations`.
    let mut invalid = direct_command("bad", 0, 42);
    invalid.fanout = true;
    push_command(&*broker, &invalid).await;

    let valid = direct_command("c8b", 0, 42);
    push_command(&*broker, &valid).await;

    dispatcher.dispatch_next().await;

    let delivered_raw = broker
        .blocking_dequeue(&agent_queue(&AgentId::new(0, 42)), Duration::from_millis(10))
        .await
        .unwrap()
        .expect("the valid command should have been delivered");
    let delivered = decode_command(&delivered_raw).unwrap();
    assert_eq!(delivered.id.as_str(), "c8b");

    assert!(broker
        .hash_get_all(&lifecycle_map("bad"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn malformed_ingress_payload_is_dropped_without_blocking_the_loop() {
    let (dispatcher, broker, registry) = dispatcher();
    registry.set_roles(AgentId::new(0, 42), role_set(["node"]));

    broker.enqueue(ingress_queue(), "not json").await.unwrap();
    let cmd = direct_command("c8", 0, 42);
    push_command(&*broker, &cmd).await;

    // The malformed payload is dropped internally; the next well-formed
    // command still gets processed by the same `dispatch_next` call.
    dispatcher.dispatch_next().await;

    let delivered = broker
        .blocking_dequeue(&agent_queue(&AgentId::new(0, 42)), Duration::from_millis(10))
        .await
        .unwrap();
    assert!(delivered.is_some());
}
