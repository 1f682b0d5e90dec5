// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolver client: handle → DID lookups against a public XRPC host.
//!
//! Speaks `com.atproto.identity.resolveHandle`. No caching and no retry; a
//! failed resolution is surfaced to the caller, who may re-issue the whole
//! labeling request.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const RESOLVE_HANDLE_PATH: &str = "/xrpc/com.atproto.identity.resolveHandle";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("could not resolve handle: {0}")]
    HandleNotFound(String),

    #[error("resolver request failed: {0}")]
    Request(String),

    #[error("resolver returned status {0}")]
    Status(StatusCode),

    #[error("resolver response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct ResolveHandleResponse {
    did: String,
}

/// HTTP client for the external identity resolver directory.
#[derive(Debug, Clone)]
pub struct IdentityResolverClient {
    base_url: String,
    http: Client,
}

impl IdentityResolverClient {
    pub fn new(base_url: &str) -> Result<Self, ResolverError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ResolverError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Resolve a handle to its stable DID.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String, ResolverError> {
        let url = format!("{}{RESOLVE_HANDLE_PATH}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("handle", handle)])
            .send()
            .await
            .map_err(|e| ResolverError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            // The directory answers 400 for handles it does not know.
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(ResolverError::HandleNotFound(handle.to_string()));
            }
            status => return Err(ResolverError::Status(status)),
        }

        let body: ResolveHandleResponse = response
            .json()
            .await
            .map_err(|e| ResolverError::InvalidResponse(e.to_string()))?;

        if body.did.is_empty() {
            return Err(ResolverError::InvalidResponse(
                "resolver returned an empty DID".to_string(),
            ));
        }

        debug!(handle, did = %body.did, "resolved handle");
        Ok(body.did)
    }
}
