// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once at startup and
//! assembled into an immutable [`Config`] that is passed explicitly to each
//! component's constructor. Components never read the process environment
//! themselves.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LABELER_DID` | The service's own DID, recorded as label source | Required |
//! | `LEDGER_URL` | Base URL of the external label ledger service | Required |
//! | `RESOLVER_URL` | Base URL of the identity resolver XRPC host | `https://public.api.bsky.app` |
//! | `LABELS_PATH` | Path to the label definition JSON file | `./labels.json` |
//! | `HOST` | Public listener bind address | `0.0.0.0` |
//! | `PORT` | Public listener port | `8080` |
//! | `INTERNAL_HOST` | Private listener bind address | `::1` |
//! | `INTERNAL_API_PORT` | Private listener port | Required |
//! | `ALLOW_DEFAULT_LABEL` | Lenient mode: substitute the registry default when `val` is omitted | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! Signing material and the label database location belong to the external
//! label ledger process and are deliberately never read here.

use std::env;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_RESOLVER_URL: &str = "https://public.api.bsky.app";
const DEFAULT_LABELS_PATH: &str = "./labels.json";
const DEFAULT_PUBLIC_HOST: &str = "0.0.0.0";
const DEFAULT_PUBLIC_PORT: u16 = 8080;
const DEFAULT_INTERNAL_HOST: &str = "::1";

/// Environment variable name for the logging format switch.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("failed to read label definitions from {path}: {message}")]
    LabelSource { path: String, message: String },

    #[error("label definition source {path} is empty")]
    EmptyLabelSource { path: String },
}

/// Immutable service configuration, assembled once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// The service's own DID, stamped on every label record as its source.
    pub labeler_did: String,
    /// Base URL of the external label ledger service.
    pub ledger_url: String,
    /// Base URL of the identity resolver XRPC host.
    pub resolver_url: String,
    /// Path to the label definition JSON file.
    pub labels_path: String,
    /// Public listener address (health only, all interfaces).
    pub public_addr: SocketAddr,
    /// Private listener address (labeling surface, private network only).
    pub internal_addr: SocketAddr,
    /// Legacy lenient mode: substitute the registry's first label when the
    /// `val` parameter is omitted instead of rejecting the request.
    pub allow_default_label: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let labeler_did = env_required("LABELER_DID")?;
        let ledger_url = trim_trailing_slash(env_required("LEDGER_URL")?);
        let resolver_url =
            trim_trailing_slash(env_or_default("RESOLVER_URL", DEFAULT_RESOLVER_URL));
        let labels_path = env_or_default("LABELS_PATH", DEFAULT_LABELS_PATH);

        let public_host = env_or_default("HOST", DEFAULT_PUBLIC_HOST);
        let public_port = match env::var("PORT") {
            Ok(raw) => parse_port("PORT", &raw)?,
            Err(_) => DEFAULT_PUBLIC_PORT,
        };

        let internal_host = env_or_default("INTERNAL_HOST", DEFAULT_INTERNAL_HOST);
        let internal_port = parse_port("INTERNAL_API_PORT", &env_required("INTERNAL_API_PORT")?)?;

        let allow_default_label = match env::var("ALLOW_DEFAULT_LABEL") {
            Ok(raw) => parse_bool("ALLOW_DEFAULT_LABEL", &raw)?,
            Err(_) => false,
        };

        Ok(Self {
            labeler_did,
            ledger_url,
            resolver_url,
            labels_path,
            public_addr: parse_addr("HOST", &public_host, public_port)?,
            internal_addr: parse_addr("INTERNAL_HOST", &internal_host, internal_port)?,
            allow_default_label,
        })
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_port(name: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        message: format!("expected a port number, got {raw:?}"),
    })
}

fn parse_addr(name: &'static str, host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let ip: IpAddr = host.parse().map_err(|_| ConfigError::Invalid {
        name,
        message: format!("expected an IP address, got {host:?}"),
    })?;
    Ok(SocketAddr::new(ip, port))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            message: format!("expected true/false, got {other:?}"),
        }),
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
