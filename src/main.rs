// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, future::IntoFuture, net::SocketAddr, process};

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use labeler_server::api::{internal_router, public_router};
use labeler_server::config::{Config, LOG_FORMAT_ENV};
use labeler_server::providers::{IdentityResolverClient, LabelLedgerClient};
use labeler_server::registry::LabelRegistry;
use labeler_server::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            process::exit(1);
        }
    };

    let registry = match LabelRegistry::load(&config.labels_path) {
        Ok(registry) => registry,
        Err(e) => {
            error!("failed to load label registry: {e}");
            process::exit(1);
        }
    };
    info!(
        count = registry.len(),
        labels = registry.identifiers().join(", "),
        "loaded label registry"
    );

    let resolver = match IdentityResolverClient::new(&config.resolver_url) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build resolver client: {e}");
            process::exit(1);
        }
    };
    let ledger = match LabelLedgerClient::new(&config.ledger_url) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build ledger client: {e}");
            process::exit(1);
        }
    };

    let state = AppState::new(&config, registry, resolver, ledger);

    // Two-phase startup: bind both listeners before serving either, so a
    // port conflict on one surfaces as a single startup failure instead of
    // a half-running service.
    let public_listener = bind(config.public_addr, "public").await;
    let internal_listener = bind(config.internal_addr, "internal").await;

    info!(
        labeler_did = %config.labeler_did,
        public = %config.public_addr,
        internal = %config.internal_addr,
        "labeler server ready"
    );

    let public = axum::serve(public_listener, public_router())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let internal = axum::serve(internal_listener, internal_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    if let Err(e) = tokio::try_join!(public, internal) {
        error!("server failed: {e}");
        process::exit(1);
    }

    info!("labeler server stopped");
}

async fn bind(addr: SocketAddr, name: &str) -> TcpListener {
    match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {name} listener on {addr}: {e}");
            process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        return;
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
