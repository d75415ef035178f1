// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relayd`: wires the broker, registry, lifecycle tracker, dispatcher,
//! scheduler, and session manager together behind the HTTP surface agents
//! poll.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use rl_broker::{BrokerStore, LifecycleTracker, RedisBroker};
use rl_core::SystemClock;
use rl_daemon::handler::{EventHandler, NoopEventHandler, ProcessEventHandler};
use rl_daemon::metrics::LoggingMetricsSink;
use rl_daemon::{build_router, AppState, Settings};
use rl_dispatch::{Dispatcher, InterceptorRegistry, InternalCommandHandler, Scheduler};
use rl_registry::AgentRegistry;
use rl_session::SessionManager;
use tracing_subscriber::EnvFilter;

/// Default config path, overridable with `RELAYD_CONFIG`.
const DEFAULT_CONFIG_PATH: &str = "/etc/relayd/relayd.toml";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "relayd exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<()> {
    let config_path = env::var("RELAYD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::load(&PathBuf::from(&config_path))
        .with_context(|| format!("loading config from {config_path}"))?;

    let broker = connect_broker(&settings).await?;
    let registry = Arc::new(AgentRegistry::new());
    let lifecycle = Arc::new(LifecycleTracker::new(broker.clone()));
    let clock = SystemClock;

    let interceptors = Arc::new(InterceptorRegistry::with_stock(broker.clone()));
    let scheduler = Arc::new(Scheduler::new(broker.clone()));
    scheduler.start().await.context("starting scheduler from persisted schedule")?;

    let internal = Arc::new(InternalCommandHandler::new(registry.clone(), scheduler.clone()));
    let dispatcher =
        Dispatcher::new(broker.clone(), registry.clone(), lifecycle.clone(), interceptors, internal, clock.clone());
    tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move { dispatcher.run().await }
    });

    let sessions = Arc::new(SessionManager::new(registry.clone(), broker.clone(), lifecycle.clone(), clock));

    let metrics = Arc::new(LoggingMetricsSink);
    let events: Arc<dyn EventHandler> = if settings.handlers.is_enabled() {
        Arc::new(ProcessEventHandler::new(&settings.handlers))
    } else {
        Arc::new(NoopEventHandler)
    };

    let state = AppState { broker, registry, lifecycle, sessions, metrics, events };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.main.listen)
        .await
        .with_context(|| format!("binding listener on {}", settings.main.listen))?;

    tracing::info!(addr = %settings.main.listen, "relayd listening");

    if settings.tls.is_enabled() {
        serve_tls(listener, app, &settings).await
    } else {
        axum::serve(listener, app).await.context("serving HTTP")
    }
}

async fn serve_tls(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    settings: &Settings,
) -> Result<()> {
    let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&settings.tls.cert, &settings.tls.key)
        .await
        .context("loading TLS certificate/key")?;
    let addr = listener.local_addr().context("reading bound listener address")?;
    drop(listener);
    axum_server::bind_rustls(addr, tls_config)
        .serve(app.into_make_service())
        .await
        .context("serving HTTPS")
}

async fn connect_broker(settings: &Settings) -> Result<Arc<dyn BrokerStore>> {
    let broker = RedisBroker::connect(&settings.main.broker.redis_url())
        .await
        .context("connecting to the configured broker")?;
    Ok(Arc::new(broker))
}
