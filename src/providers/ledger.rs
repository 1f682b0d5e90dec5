// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Label ledger client.
//!
//! The ledger is the external append-only store of label records; it assigns
//! sequence ids, authoritative timestamps, and signatures. This client is a
//! thin HTTP wrapper: submission is at-most-once per request and never
//! retried locally. A duplicate record from an operator retry is tolerated
//! by the ledger's append-only model.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::{LabelRecord, PersistedLabel};

const LABELS_PATH: &str = "/labels";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger request failed: {0}")]
    Request(String),

    #[error("ledger rejected the record: status {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("ledger response was invalid: {0}")]
    InvalidResponse(String),
}

/// Error body returned by the ledger on rejection.
#[derive(Debug, Deserialize)]
struct LedgerErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the external label ledger service.
#[derive(Debug, Clone)]
pub struct LabelLedgerClient {
    base_url: String,
    http: Client,
}

impl LabelLedgerClient {
    pub fn new(base_url: &str) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Submit a label record for signing and persistence.
    pub async fn create_label(&self, record: &LabelRecord) -> Result<PersistedLabel, LedgerError> {
        let url = format!("{}{LABELS_PATH}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| LedgerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<LedgerErrorBody>().await {
                Ok(body) => body.message.unwrap_or(body.error),
                Err(_) => String::from("no further detail"),
            };
            return Err(LedgerError::Rejected { status, message });
        }

        let persisted: PersistedLabel = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        debug!(id = persisted.id, uri = %persisted.uri, val = %persisted.val, "label persisted");
        Ok(persisted)
    }

    /// Query persisted labels for a canonical URI.
    pub async fn query_labels(&self, uri: &str) -> Result<Vec<PersistedLabel>, LedgerError> {
        let url = format!("{}{LABELS_PATH}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("uri", uri)])
            .send()
            .await
            .map_err(|e| LedgerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Rejected {
                status,
                message: String::from("query failed"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }
}
