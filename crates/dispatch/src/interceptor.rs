// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-dispatch command rewrites, keyed by `cmd.cmd`.
//!
//! Grounded in `original_source/interceptor.go`: `InterceptCommand` looks up
//! an interceptor by command name and, on success, replaces the command
//! with whatever the interceptor produced; on failure it logs and forwards
//! the command unmodified. Side effects are confined to the broker's
//! key-value area (spec §4.I), so an interceptor is handed a `BrokerStore`
//! handle rather than owning one of its own.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rl_broker::BrokerStore;
use rl_core::Command;
use serde_json::Value;

use crate::error::InterceptorError;

/// The stock `jumpscript_content` interceptor's stash TTL: 24 hours.
const CONTENT_STASH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A pure-ish rewrite of one command, with side effects confined to the
/// broker's key-value area.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, command: &mut Command) -> Result<(), InterceptorError>;
}

/// Registry of interceptors keyed by the command name that triggers them.
#[derive(Default)]
pub struct InterceptorRegistry {
    interceptors: HashMap<String, Arc<dyn Interceptor>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry carrying the one stock interceptor spec §4.I names.
    pub fn with_stock(broker: Arc<dyn BrokerStore>) -> Self {
        let mut registry = Self::new();
        registry.register("jumpscript_content", Arc::new(JumpscriptContentInterceptor::new(broker)));
        registry
    }

    pub fn register(&mut self, cmd: impl Into<String>, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.insert(cmd.into(), interceptor);
    }

    /// Runs the interceptor registered for `command.cmd`, if any. A failed
    /// interceptor leaves `command` as it found it — only the failure is
    /// logged, dispatch always continues (matches the original's
    /// `InterceptCommand`, which returns the untouched `command` string on
    /// any error along the way).
    pub async fn apply(&self, command: &mut Command) {
        let Some(interceptor) = self.interceptors.get(command.cmd.as_str()) else {
            return;
        };
        if let Err(err) = interceptor.intercept(command).await {
            tracing::warn!(cmd = %command.cmd, error = %err, "interceptor failed, forwarding command unmodified");
        }
    }
}

/// Offloads a large `content` payload under its MD5 hash so recurring
/// commands don't repeat it verbatim. Extracts `data.content`, stores it in
/// the broker under its hash with a 24h TTL, and replaces the field with
/// `data.hash`.
pub struct JumpscriptContentInterceptor {
    broker: Arc<dyn BrokerStore>,
}

impl JumpscriptContentInterceptor {
    pub fn new(broker: Arc<dyn BrokerStore>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl Interceptor for JumpscriptContentInterceptor {
    async fn intercept(&self, command: &mut Command) -> Result<(), InterceptorError> {
        let mut data: Value = serde_json::from_str(&command.data)?;
        let content = data
            .get("content")
            .and_then(Value::as_str)
            .ok_or(InterceptorError::MissingField("content"))?
            .to_string();

        let hash = format!("{:x}", md5::compute(content.as_bytes()));
        self.broker
            .set_with_ttl(&hash, &content, CONTENT_STASH_TTL.as_secs())
            .await?;

        let obj = data
            .as_object_mut()
            .ok_or(InterceptorError::MissingField("content"))?;
        obj.remove("content");
        obj.insert("hash".to_string(), Value::String(hash));
        command.data = serde_json::to_string(&data)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "interceptor_tests.rs"]
mod tests;
