// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use rl_broker::InMemoryBroker;
use rl_core::test_support::{direct_command, internal_command};
use rl_core::{role_set, AgentId};

use super::*;

fn handler() -> (InternalCommandHandler, Arc<AgentRegistry>, Arc<Scheduler>) {
    let registry = Arc::new(AgentRegistry::new());
    let broker: Arc<dyn rl_broker::BrokerStore> = Arc::new(InMemoryBroker::new());
    let scheduler = Arc::new(Scheduler::new(broker));
    let handler = InternalCommandHandler::new(registry.clone(), scheduler.clone());
    (handler, registry, scheduler)
}

#[tokio::test]
async fn unregistered_sub_command_is_unknown_cmd() {
    let (handler, _registry, _scheduler) = handler();
    let cmd = internal_command("c1", "nonexistent");
    let result = handler.handle(&cmd, 1000).await;
    assert_eq!(result.state, CommandState::UnknownCmd);
}

#[tokio::test]
async fn list_agents_reports_connected_agents_and_roles() {
    let (handler, registry, _scheduler) = handler();
    registry.set_roles(AgentId::new(0, 1), role_set(["node", "cpu"]));

    let cmd = internal_command("c1", "list_agents");
    let result = handler.handle(&cmd, 1000).await;
    assert_eq!(result.state, CommandState::Success);
    assert_eq!(result.level, 20);

    let parsed: serde_json::Value = serde_json::from_str(&result.data).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["grid"], 0);
    assert_eq!(parsed[0]["node"], 1);
}

#[tokio::test]
async fn scheduler_add_then_list_round_trips_through_internal_commands() {
    let (handler, _registry, _scheduler) = handler();

    let mut add_cmd = internal_command("job-42", "scheduler_add");
    add_cmd.data = serde_json::json!({
        "cronExpr": "* * * * * *",
        "cmdTemplate": direct_command("template", 0, 9),
    })
    .to_string();
    let add_result = handler.handle(&add_cmd, 1000).await;
    assert_eq!(add_result.state, CommandState::Success);

    let list_cmd = internal_command("c2", "scheduler_list");
    let list_result = handler.handle(&list_cmd, 1000).await;
    assert_eq!(list_result.state, CommandState::Success);
    let jobs: serde_json::Value = serde_json::from_str(&list_result.data).unwrap();
    assert_eq!(jobs[0]["id"], "job-42");
}

#[tokio::test]
async fn scheduler_add_rejects_invalid_cron_as_terminal_error() {
    let (handler, _registry, _scheduler) = handler();
    let mut add_cmd = internal_command("job-1", "scheduler_add");
    add_cmd.data = serde_json::json!({
        "cronExpr": "nonsense",
        "cmdTemplate": direct_command("template", 0, 9),
    })
    .to_string();

    let result = handler.handle(&add_cmd, 1000).await;
    assert_eq!(result.state, CommandState::Error);
}

#[tokio::test]
async fn scheduler_remove_reports_whether_job_existed() {
    let (handler, _registry, scheduler) = handler();
    scheduler
        .add("job-1".to_string(), "* * * * * *".to_string(), direct_command("t", 0, 1))
        .await
        .unwrap();

    let remove_cmd = internal_command("job-1", "scheduler_remove");
    let result = handler.handle(&remove_cmd, 1000).await;
    assert_eq!(result.state, CommandState::Success);
    assert_eq!(result.data, "true");
}
