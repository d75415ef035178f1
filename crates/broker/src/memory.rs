// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`BrokerStore`], used by every crate's test suite and
//! runnable standalone for local/dev use without an external Redis.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::error::BrokerError;
use crate::store::{BrokerStore, ScanResult};

#[derive(Default)]
struct State {
    queues: HashMap<String, VecDeque<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
    kv: HashMap<String, (String, Instant)>,
}

/// An in-memory broker store. Every queue/hash/key lives behind one
/// `tokio::sync::Mutex`; a [`Notify`] wakes blocked dequeuers when any
/// queue receives a push.
pub struct InMemoryBroker {
    state: Mutex<State>,
    pushed: Notify,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            pushed: Notify::new(),
        }
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerStore for InMemoryBroker {
    async fn enqueue(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        state
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(payload.to_string());
        drop(state);
        self.pushed.notify_waiters();
        Ok(())
    }

    async fn enqueue_front(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        state
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_front(payload.to_string());
        drop(state);
        self.pushed.notify_waiters();
        Ok(())
    }

    async fn blocking_dequeue(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, BrokerError> {
        let deadline = Instant::now() + timeout;
        loop {
            // Register for the next notification before checking the queue,
            // so a push racing with this check is never missed.
            let notified = self.pushed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock().await;
                if let Some(item) = state.queues.get_mut(queue).and_then(VecDeque::pop_front) {
                    return Ok(Some(item));
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            if tokio::time::timeout(remaining, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn hash_set(&self, map: &str, field: &str, payload: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        state
            .hashes
            .entry(map.to_string())
            .or_default()
            .insert(field.to_string(), payload.to_string());
        Ok(())
    }

    async fn hash_get_all(&self, map: &str) -> Result<Vec<(String, String)>, BrokerError> {
        let state = self.state.lock().await;
        Ok(state
            .hashes
            .get(map)
            .map(|fields| fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn hash_delete(&self, map: &str, field: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        if let Some(fields) = state.hashes.get_mut(map) {
            fields.remove(field);
        }
        Ok(())
    }

    async fn hash_scan(&self, map: &str, cursor: u64) -> Result<ScanResult, BrokerError> {
        // No real backing store to page against; return everything on the
        // first call and signal completion with a 0 cursor, same contract a
        // single-page Redis HSCAN reply would have.
        if cursor != 0 {
            return Ok(ScanResult {
                items: Vec::new(),
                next_cursor: 0,
            });
        }
        Ok(ScanResult {
            items: self.hash_get_all(map).await?,
            next_cursor: 0,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BrokerError> {
        let mut state = self.state.lock().await;
        match state.kv.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                state.kv.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        state.kv.insert(
            key.to_string(),
            (value.to_string(), Instant::now() + Duration::from_secs(ttl_seconds)),
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
