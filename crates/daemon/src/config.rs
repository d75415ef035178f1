// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration, shaped after `original_source/settings.go`'s
//! `[main]`/`[tls]`/`[metrics]`/`[handlers]` sections.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: Box<toml::de::Error>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub main: MainSettings,
    #[serde(default)]
    pub tls: TlsSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub handlers: HandlerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainSettings {
    pub listen: SocketAddr,
    pub broker: BrokerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerSettings {
    pub host: String,
    #[serde(default)]
    pub password: String,
}

impl BrokerSettings {
    /// Builds the `redis://` connection URL `RedisBroker::connect` expects.
    pub fn redis_url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}", self.host)
        } else {
            format!("redis://:{}@{}", self.password, self.host)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsSettings {
    #[serde(default)]
    pub cert: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub client_ca: String,
}

impl TlsSettings {
    pub fn is_enabled(&self) -> bool {
        !self.cert.is_empty() && !self.key.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub db: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl MetricsSettings {
    pub fn is_enabled(&self) -> bool {
        !self.host.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerSettings {
    #[serde(default)]
    pub binary: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl HandlerSettings {
    pub fn is_enabled(&self) -> bool {
        !self.binary.is_empty()
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        toml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source: Box::new(source) })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
