// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `redis`-backed [`BrokerStore`], talking to the external broker with
//! `BLPOP`/`RPUSH`/`LPUSH`/`HSET`/`HGETALL`/`HDEL`/`HSCAN`/`GET`/`SETEX`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::BrokerError;
use crate::store::{BrokerStore, ScanResult};

/// A [`BrokerStore`] backed by an external Redis (or Redis-compatible)
/// instance. [`ConnectionManager`] handles reconnection internally and is
/// cheap to clone, so one lives per call rather than behind a lock.
#[derive(Clone)]
pub struct RedisBroker {
    manager: ConnectionManager,
}

impl RedisBroker {
    /// Connects to `redis_url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(redis_url: &str) -> Result<Self, BrokerError> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        tracing::info!(url = redis_url, "connected to broker");
        Ok(Self { manager })
    }
}

fn blpop_timeout_secs(timeout: Duration) -> f64 {
    if timeout >= crate::BLOCK_FOREVER {
        0.0
    } else {
        timeout.as_secs_f64()
    }
}

#[async_trait]
impl BrokerStore for RedisBroker {
    async fn enqueue(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
        let mut conn = self.manager.clone();
        let _: () = conn.rpush(queue, payload).await?;
        Ok(())
    }

    async fn enqueue_front(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
        let mut conn = self.manager.clone();
        let _: () = conn.lpush(queue, payload).await?;
        Ok(())
    }

    async fn blocking_dequeue(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, BrokerError> {
        let mut conn = self.manager.clone();
        let reply: Option<(String, String)> = conn
            .blpop(queue, blpop_timeout_secs(timeout))
            .await?;
        Ok(reply.map(|(_key, value)| value))
    }

    async fn hash_set(&self, map: &str, field: &str, payload: &str) -> Result<(), BrokerError> {
        let mut conn = self.manager.clone();
        let _: () = conn.hset(map, field, payload).await?;
        Ok(())
    }

    async fn hash_get_all(&self, map: &str) -> Result<Vec<(String, String)>, BrokerError> {
        let mut conn = self.manager.clone();
        let fields: HashMap<String, String> = conn.hgetall(map).await?;
        Ok(fields.into_iter().collect())
    }

    async fn hash_delete(&self, map: &str, field: &str) -> Result<(), BrokerError> {
        let mut conn = self.manager.clone();
        let _: () = conn.hdel(map, field).await?;
        Ok(())
    }

    async fn hash_scan(&self, map: &str, cursor: u64) -> Result<ScanResult, BrokerError> {
        let mut conn = self.manager.clone();
        let (next_cursor, flat): (u64, Vec<String>) = redis::cmd("HSCAN")
            .arg(map)
            .arg(cursor)
            .query_async(&mut conn)
            .await?;
        let items = flat
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        Ok(ScanResult { items, next_cursor })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BrokerError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), BrokerError> {
        let mut conn = self.manager.clone();
        let _: () = conn.set_ex(key, value, ttl_seconds).await?;
        Ok(())
    }
}
