// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rl-broker: the [`BrokerStore`] abstraction every other crate dispatches
//! commands through, plus an in-memory test double and a `redis`-backed
//! adapter.
//!
//! Queue and key names are part of the wire contract between relayd and the
//! agents polling it, so they live here as constants rather than being
//! assembled ad hoc at call sites.

mod error;
mod keys;
mod lifecycle;
mod memory;
mod redis_store;
mod store;

pub use error::BrokerError;
pub use keys::{
    agent_log_queue, agent_queue, controller_schedule, ingress_queue, job_log, lifecycle_map,
    queued_signal, result_fan_in, scheduler_field,
};
pub use lifecycle::LifecycleTracker;
pub use memory::InMemoryBroker;
pub use redis_store::RedisBroker;
pub use store::{BrokerStore, ScanResult, BLOCK_FOREVER};
