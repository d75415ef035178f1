// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn agent_id_queue_name_matches_broker_naming() {
    let id = AgentId::new(0, 42);
    assert_eq!(id.queue_name(), "cmds:0:42");
}

#[test]
fn agent_id_display_is_grid_colon_node() {
    assert_eq!(AgentId::new(3, 7).to_string(), "3:7");
}

#[test]
fn role_set_dedupes_and_ignores_order() {
    let a = role_set(["node", "cpu", "node"]);
    let b = role_set(["cpu", "node"]);
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}
