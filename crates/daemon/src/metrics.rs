// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics sink abstraction over agent-posted stat batches.
//!
//! Grounded in `original_source/rest/stats.go`: a posted series key is
//! dotted as `gid.nid.cmd.domain.name.measurement` (6 parts); the original
//! splits it into InfluxDB tags before writing a point. The actual
//! time-series store is out of scope, so this crate defines the split and
//! the [`MetricsSink`] trait it hands rows to, plus a logging fallback.

use async_trait::async_trait;

/// The six dotted-key components `stats.go` tags every point with.
pub const TAG_NAMES: [&str; 6] = ["gid", "nid", "command", "domain", "name", "measurement"];

/// One metric point after its dotted key has been split into tags.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub timestamp: i64,
    pub key: String,
    pub tags: Vec<(&'static str, String)>,
    pub value: f64,
}

/// Splits a `gid.nid.cmd.domain.name.measurement` key into its tag values,
/// matching `stats.go`'s `strings.SplitN(key, ".", 6)`. Fewer than 6 parts
/// are left unfilled; only tags present in the key are returned.
pub fn split_tags(key: &str) -> Vec<(&'static str, String)> {
    key.splitn(6, '.')
        .zip(TAG_NAMES)
        .map(|(value, tag)| (tag, value.to_string()))
        .collect()
}

/// Where a decoded batch of stats gets delivered. Out of scope per the
/// spec's "external time-series sink" exclusion — this crate only defines
/// the interface and a logging fallback.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn write(&self, points: &[MetricPoint]);
}

/// Fallback sink used whenever `[metrics]` isn't configured: logs each
/// point at debug level instead of dropping it silently.
pub struct LoggingMetricsSink;

#[async_trait]
impl MetricsSink for LoggingMetricsSink {
    async fn write(&self, points: &[MetricPoint]) {
        for point in points {
            tracing::debug!(key = %point.key, value = point.value, timestamp = point.timestamp, "metric point");
        }
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
