// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use std::time::Duration;

use crate::error::BrokerError;

/// A [`BrokerStore::blocking_dequeue`] timeout large enough that every
/// implementation treats it as "block forever" — the spec's `∞` (e.g.
/// Redis's `BLPOP` encodes an actual infinite wait as a literal `0`, not a
/// real Rust `Duration`, so call sites pass this instead).
pub const BLOCK_FOREVER: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// One page of a [`BrokerStore::hash_scan`] walk: the `(field, value)` pairs
/// seen so far, and the cursor to resume from (`0` means the scan is done).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub items: Vec<(String, String)>,
    pub next_cursor: u64,
}

/// Abstract interface over the external broker store.
///
/// Every operation named in spec §4.A has a method here. relayd never talks
/// to Redis directly outside of [`crate::RedisBroker`] — everything else
/// goes through this trait so it can run against [`crate::InMemoryBroker`]
/// in tests.
#[async_trait]
pub trait BrokerStore: Send + Sync {
    /// Push a payload to the tail of `queue`.
    async fn enqueue(&self, queue: &str, payload: &str) -> Result<(), BrokerError>;

    /// Push a payload to the head of `queue`, for requeue-on-miss (spec §4.D).
    async fn enqueue_front(&self, queue: &str, payload: &str) -> Result<(), BrokerError>;

    /// Atomic head pop, blocking until a payload is available or `timeout`
    /// elapses. `None` means the wait timed out with nothing available.
    /// Multiple callers on the same queue each receive distinct payloads.
    async fn blocking_dequeue(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, BrokerError>;

    /// Set one field of a hash.
    async fn hash_set(&self, map: &str, field: &str, payload: &str) -> Result<(), BrokerError>;

    /// Fetch every field of a hash.
    async fn hash_get_all(&self, map: &str) -> Result<Vec<(String, String)>, BrokerError>;

    /// Delete one field of a hash.
    async fn hash_delete(&self, map: &str, field: &str) -> Result<(), BrokerError>;

    /// Cursor-based iteration over a hash's fields.
    async fn hash_scan(&self, map: &str, cursor: u64) -> Result<ScanResult, BrokerError>;

    /// Fetch a simple key's value, if set and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>, BrokerError>;

    /// Set a simple key with a TTL in seconds.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), BrokerError>;
}
